//! Result sinks: named per-batch artifacts.
//!
//! Artifact names follow the fixed convention `outliersN` /
//! `explanationN`, where `N` is the 1-based batch index in arrival order.
//! Sinks are synchronous; a write failure aborts the batch at that step.

pub mod json_dir;
pub mod memory;

pub use json_dir::JsonDirSink;
pub use memory::MemorySink;

use serde_json::{json, Value};
use st_common::Result;
use st_frame::DataFrame;

use crate::summarize::Explanation;

/// Name of the outlier-rows artifact for a batch.
pub fn outliers_artifact_name(batch_index: u64) -> String {
    format!("outliers{batch_index}")
}

/// Name of the explanation artifact for a batch.
pub fn explanation_artifact_name(batch_index: u64) -> String {
    format!("explanation{batch_index}")
}

/// A per-batch payload handed to a sink.
pub enum Artifact<'a> {
    /// The rows the chain flagged, already filtered down.
    Outliers {
        rows: &'a DataFrame,
        outlier_column: &'a str,
    },

    /// The ranked explanation, together with the classified batch and its
    /// output column so consumers can cross-reference rows to groups.
    Explanation {
        explanation: &'a Explanation,
        batch: &'a DataFrame,
        outlier_column: &'a str,
    },
}

impl Artifact<'_> {
    /// JSON form shared by all sinks.
    pub fn to_json(&self) -> Value {
        match self {
            Artifact::Outliers {
                rows,
                outlier_column,
            } => json!({
                "kind": "outliers",
                "outlierColumn": outlier_column,
                "numRows": rows.num_rows(),
                "rows": rows.to_json_rows(),
            }),
            Artifact::Explanation {
                explanation,
                batch,
                outlier_column,
            } => json!({
                "kind": "explanation",
                "outlierColumn": outlier_column,
                "batchRows": batch.num_rows(),
                "explanation": explanation,
            }),
        }
    }
}

/// Receives named artifacts for each batch.
pub trait ResultSink {
    fn save(&mut self, name: &str, artifact: &Artifact<'_>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use st_frame::Column;

    #[test]
    fn artifact_names_match_convention() {
        assert_eq!(outliers_artifact_name(1), "outliers1");
        assert_eq!(explanation_artifact_name(42), "explanation42");
    }

    #[test]
    fn outliers_json_shape() {
        let mut rows = DataFrame::new();
        rows.add_column("v", Column::Double(vec![9.0])).unwrap();
        let value = Artifact::Outliers {
            rows: &rows,
            outlier_column: "_OUTLIER",
        }
        .to_json();
        assert_eq!(value["kind"], "outliers");
        assert_eq!(value["numRows"], 1);
        assert_eq!(value["rows"][0]["v"], 9.0);
    }

    #[test]
    fn explanation_json_embeds_items() {
        let explanation = Explanation {
            items: vec![],
            num_outliers: 2,
            num_inliers: 8,
        };
        let batch = DataFrame::new();
        let value = Artifact::Explanation {
            explanation: &explanation,
            batch: &batch,
            outlier_column: "_OUTLIER",
        }
        .to_json();
        assert_eq!(value["kind"], "explanation");
        assert_eq!(value["explanation"]["num_outliers"], 2);
        assert_eq!(value["outlierColumn"], "_OUTLIER");
    }
}
