//! Classifier stages and their sequential chaining.
//!
//! A stage annotates a batch with one new `Double` column under its output
//! name (`> 0.0` flags the row). Stages are built from
//! [`st_config::ClassifierStageConfig`] entries; a later stage may name an
//! earlier stage's output column among its metrics, which is how a chain
//! narrows candidates.

pub mod chain;
pub mod mad;
pub mod predicate;
pub mod quantile;

pub use chain::ClassifierChain;
pub use mad::MadClassifier;
pub use predicate::PredicateClassifier;
pub use quantile::QuantileClassifier;

use st_common::Result;
use st_frame::DataFrame;

/// One classification stage.
pub trait ClassifierStage: Send {
    /// Stage kind name used in logs and error context.
    fn name(&self) -> &'static str;

    /// Name of the `Double` column this stage writes.
    fn output_column(&self) -> &str;

    /// Annotate the batch with this stage's output column. The input frame
    /// is not mutated; stages return the extended frame.
    fn process(&mut self, frame: &DataFrame) -> Result<DataFrame>;
}
