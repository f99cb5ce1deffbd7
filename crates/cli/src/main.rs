//! Round Robin scheduling simulator CLI.
//!
//! This binary drives the engine from the terminal. It performs:
//! 1. **Run:** Build a workload (explicit `--process` flags and/or random processes),
//!    run it to completion and print the table, a Gantt chart and statistics.
//! 2. **Stepped run:** Same, but one dispatch cycle at a time with per-cycle events.
//! 3. **Check:** Parse and validate a JSON configuration file.

use std::{fs, process};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rrsim_core::config::Config;
use rrsim_core::sim::WorkloadGenerator;
use rrsim_core::stats::SchedStats;
use rrsim_core::trace::{TableLayout, TableRow};
use rrsim_core::{GanttBar, ProcessSnapshot, SchedulingKey, SimResult, Simulation, Tick};

/// Widest Gantt chart in columns before time is scaled down.
const GANTT_WIDTH: u64 = 100;

#[derive(Parser, Debug)]
#[command(
    name = "rrsim",
    author,
    version,
    about = "Round Robin CPU scheduling simulator",
    long_about = "Simulate Round Robin scheduling with random blocking, optional priorities and a single-CPU semaphore.\n\nExamples:\n  rrsim run -n 5 --seed 42\n  rrsim run -p 7 -p 3 --block-probability 0\n  rrsim run -p 4@0:3 -p 2@0:1 --priority --step\n  rrsim check sim.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a simulation to completion (or one cycle at a time with --step).
    Run(RunArgs),

    /// Validate a JSON configuration file and print the resolved values.
    Check {
        /// Configuration file path.
        path: String,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// JSON configuration file; flags below override its values.
    #[arg(short, long)]
    config: Option<String>,

    /// Explicit process as BURST[@ARRIVAL][:PRIORITY]. Repeatable.
    #[arg(short, long = "process", value_parser = parse_process)]
    processes: Vec<ProcessArg>,

    /// Number of random processes to generate.
    #[arg(short = 'n', long, default_value = "0")]
    random: usize,

    /// Seed for blocking decisions and random processes.
    #[arg(long)]
    seed: Option<u64>,

    /// Time units per quantum.
    #[arg(short, long)]
    quantum: Option<u64>,

    /// Order dispatch by priority instead of admission order.
    #[arg(long)]
    priority: bool,

    /// Probability that an executed unit blocks the process (0.0-1.0).
    #[arg(long)]
    block_probability: Option<f64>,

    /// Blocked-checks a blocked process waits before becoming ready.
    #[arg(long)]
    block_duration: Option<u64>,

    /// Print one dispatch cycle at a time.
    #[arg(long)]
    step: bool,

    /// Add one table row per executed interval.
    #[arg(long)]
    intervals: bool,

    /// Statistics sections to print (summary, dispatch, processes). Default: all.
    #[arg(long, value_delimiter = ',')]
    stats: Vec<String>,

    /// Emit the final state as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug)]
struct ProcessArg {
    burst: u64,
    arrival: Option<u64>,
    priority: Option<u32>,
}

fn parse_process(s: &str) -> Result<ProcessArg, String> {
    let (rest, priority) = match s.split_once(':') {
        Some((rest, p)) => (rest, Some(p.parse().map_err(|e| format!("priority `{p}`: {e}"))?)),
        None => (s, None),
    };
    let (burst, arrival) = match rest.split_once('@') {
        Some((b, a)) => (b, Some(a.parse().map_err(|e| format!("arrival `{a}`: {e}"))?)),
        None => (rest, None),
    };
    let burst = burst
        .parse()
        .map_err(|e| format!("burst `{burst}`: {e}"))?;
    Ok(ProcessArg {
        burst,
        arrival,
        priority,
    })
}

#[derive(Serialize)]
struct Report<'a> {
    time: u64,
    processes: Vec<ProcessSnapshot>,
    gantt: Vec<GanttBar>,
    table: Vec<TableRow>,
    stats: &'a SchedStats,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,rrsim_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run(args)) => {
            if let Err(e) = cmd_run(&args) {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
        Some(Commands::Check { path }) => cmd_check(&path),
        None => {
            eprintln!("Round Robin Scheduling Simulator: pass a subcommand");
            eprintln!();
            eprintln!("  rrsim run -n <count>            Random workload");
            eprintln!("  rrsim run -p 7 -p 3@2           Explicit processes");
            eprintln!("  rrsim run ... --step            One cycle at a time");
            eprintln!("  rrsim check <config.json>       Validate a configuration");
            eprintln!();
            eprintln!("  rrsim --help  for full options");
            process::exit(1);
        }
    }
}

fn load_config(path: &str) -> Config {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config {path}: {e}");
        process::exit(1);
    });
    Config::from_json(&json).unwrap_or_else(|e| {
        eprintln!("Error in config {path}: {e}");
        process::exit(1);
    })
}

/// Parses and validates a configuration file, then prints it.
fn cmd_check(path: &str) {
    let config = load_config(path);
    println!("{path}: ok");
    println!("{config:#?}");
}

/// Resolves configuration from the file and flags.
fn resolve_config(args: &RunArgs) -> Config {
    let mut config = args.config.as_deref().map(load_config).unwrap_or_default();
    if let Some(q) = args.quantum {
        config.quantum = q;
    }
    if let Some(p) = args.block_probability {
        config.block_probability = p;
    }
    if let Some(d) = args.block_duration {
        config.block_duration = d;
    }
    if args.priority {
        config.scheduling_key = SchedulingKey::Priority;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config
}

/// Builds the workload, runs it and prints the report.
fn cmd_run(args: &RunArgs) -> SimResult<()> {
    let config = resolve_config(args);
    info!(
        quantum = config.quantum,
        block_probability = config.block_probability,
        block_duration = config.block_duration,
        key = ?config.scheduling_key,
        seed = ?config.seed,
        "starting simulation"
    );
    let mut sim = Simulation::new(config)?;

    for arg in &args.processes {
        let arrival = arg.arrival.unwrap_or_else(|| sim.registry().len() as u64);
        let _ = sim.admit_process(arg.burst, arrival, arg.priority)?;
    }
    if args.random > 0 {
        let mut generator = WorkloadGenerator::for_simulation(&sim)?;
        let _ = generator.admit_many(&mut sim, args.random)?;
    }
    if sim.registry().is_empty() {
        eprintln!("Nothing to simulate: pass --process and/or --random");
        process::exit(1);
    }

    if args.step {
        run_stepped(&mut sim, args.json)?;
    } else {
        let cycles = sim.run_to_completion()?;
        info!(cycles, "simulation complete");
    }

    let layout = if args.intervals {
        TableLayout::WithIntervals
    } else {
        TableLayout::Summary
    };
    if args.json {
        let report = Report {
            time: sim.now(),
            processes: sim.snapshot(),
            gantt: sim.gantt_bars(),
            table: sim.table(layout),
            stats: sim.stats(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                process::exit(1);
            }
        }
        return Ok(());
    }

    println!("{}", TableRow::HEADER);
    for row in sim.table(layout) {
        println!("{row}");
    }
    println!();
    print_gantt(&sim);
    println!();
    sim.stats().print_sections(sim.registry(), &args.stats);
    Ok(())
}

/// Runs one cycle per iteration and prints what happened in it.
fn run_stepped(sim: &mut Simulation, quiet: bool) -> SimResult<()> {
    let mut stepper = sim.stepper();
    let mut cycle = 0_u64;
    while let Tick::Advanced(result) = stepper.tick()? {
        cycle += 1;
        if quiet {
            continue;
        }
        println!("-- cycle {cycle} (t={}) --", result.advanced_to);
        if result.idle_units > 0 {
            println!("   idle {} units", result.idle_units);
        }
        for id in &result.unblocked {
            println!("   {id} unblocked");
        }
        for e in &result.events {
            println!("   {} ran ({}-{}) -> {}", e.process, e.start, e.end, e.state);
        }
    }
    if !quiet {
        println!();
    }
    Ok(())
}

/// Prints one row per process, `#` where it held the CPU.
fn print_gantt(sim: &Simulation) {
    let end = sim.now();
    let scale = end.div_ceil(GANTT_WIDTH).max(1);
    let width = usize::try_from(end.div_ceil(scale)).unwrap_or(0);
    let bars = sim.gantt_bars();

    println!("Gantt (1 column = {scale} unit{})", if scale == 1 { "" } else { "s" });
    for p in sim.registry() {
        let mut line = vec!['.'; width];
        for bar in bars.iter().filter(|b| b.process == p.id()) {
            let from = bar.start / scale;
            let to = (bar.start + bar.duration).div_ceil(scale);
            for col in from..to {
                if let Some(c) = usize::try_from(col).ok().and_then(|i| line.get_mut(i)) {
                    *c = '#';
                }
            }
        }
        println!("{:<4} |{}|", p.id().to_string(), line.into_iter().collect::<String>());
    }
    println!("     0{:>w$}", end, w = width);
}
