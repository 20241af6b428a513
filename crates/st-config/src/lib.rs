//! Stream Triage pipeline configuration.
//!
//! This crate provides:
//! - Typed structs for the YAML/JSON pipeline config
//! - Post-construction finalization (default output columns, shared
//!   time-column propagation into every stage config)
//! - Construction-time validation: a bad config fails before any batch
//!   is pulled from the source
//! - Derivation of the column schema a source must deliver

pub mod pipeline;
pub mod validate;

pub use pipeline::{
    ClassifierKind, ClassifierStageConfig, InputConfig, PipelineConfig, PredicateOp,
    PredicateValue, PreprocessConfig, SummarizerConfig,
};
