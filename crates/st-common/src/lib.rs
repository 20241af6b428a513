//! Stream Triage common types and errors.
//!
//! This crate provides the foundational pieces shared across st-* crates:
//! - The unified error type with stable category codes
//! - The workspace-wide `Result` alias

pub mod columns;
pub mod error;

pub use error::{Error, Result};
