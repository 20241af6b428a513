//! Stream Triage math utilities.

pub mod stats;

pub use stats::*;
