//! Mock implementations of engine traits, one file per trait.
