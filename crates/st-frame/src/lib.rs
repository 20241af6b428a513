//! Stream Triage tabular data model.
//!
//! A batch delivered by a streaming source is a `DataFrame`: a table of
//! rows with named, typed columns. Classifier stages annotate frames with
//! new columns; the flag convention for classification output columns is
//! `Double > 0.0 == anomalous`.

pub mod frame;
pub mod schema;

pub use frame::{Column, DataFrame};
pub use schema::{ColType, Schema};
