//! Batch summarization: ranked attribute combinations correlated with the
//! outlier column.

pub mod attrset;

pub use attrset::AttributeSetSummarizer;

use serde::{Deserialize, Serialize};
use st_common::Result;
use st_frame::DataFrame;

/// One attribute/value pair of a combination matcher.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeValue {
    pub attribute: String,
    pub value: String,
}

/// One ranked attribute combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationItem {
    /// The attribute/value pairs a row must match.
    pub matcher: Vec<AttributeValue>,

    /// Fraction of the batch's outliers this combination matches.
    pub support: f64,

    /// Outlier rate among matched rows relative to unmatched rows.
    pub ratio: f64,

    /// Total rows (outlier or not) matching the combination.
    pub num_records: usize,
}

/// Result artifact of summarizing one classified batch. Produced fresh per
/// batch, never accumulated across batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// Combinations ranked by ratio, then support, then ascending order.
    pub items: Vec<ExplanationItem>,

    pub num_outliers: usize,

    pub num_inliers: usize,
}

/// Consumes a classified batch and produces an [`Explanation`].
pub trait Summarizer: Send {
    fn summarize(
        &mut self,
        frame: &DataFrame,
        outlier_column: &str,
        attributes: &[String],
    ) -> Result<Explanation>;
}
