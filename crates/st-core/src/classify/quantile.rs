//! Quantile (percentile-threshold) classifier stage.

use st_common::Result;
use st_frame::{Column, DataFrame};

use super::ClassifierStage;

/// Flags rows whose per-row metric maximum is at or above the configured
/// quantile of that maximum within the batch.
///
/// With several metric columns the per-row score is the largest value
/// across them, so a row is anomalous if any one metric is extreme.
pub struct QuantileClassifier {
    metric_columns: Vec<String>,
    quantile: f64,
    output_column: String,
}

impl QuantileClassifier {
    pub fn new(metric_columns: Vec<String>, quantile: f64, output_column: String) -> Self {
        Self {
            metric_columns,
            quantile,
            output_column,
        }
    }

    fn row_scores(&self, frame: &DataFrame) -> Result<Vec<f64>> {
        let mut scores = vec![f64::NAN; frame.num_rows()];
        for column in &self.metric_columns {
            let values = frame.double_column(column)?;
            for (score, value) in scores.iter_mut().zip(values) {
                if value.is_nan() {
                    continue;
                }
                if score.is_nan() || *value > *score {
                    *score = *value;
                }
            }
        }
        Ok(scores)
    }
}

impl ClassifierStage for QuantileClassifier {
    fn name(&self) -> &'static str {
        "quantile"
    }

    fn output_column(&self) -> &str {
        &self.output_column
    }

    fn process(&mut self, frame: &DataFrame) -> Result<DataFrame> {
        let scores = self.row_scores(frame)?;
        let threshold = st_math::quantile(&scores, self.quantile);
        // NaN threshold (empty or all-NaN batch) flags nothing: the
        // comparison below is false for NaN on either side.
        let flags = scores
            .iter()
            .map(|s| if *s >= threshold { 1.0 } else { 0.0 })
            .collect();

        let mut out = frame.clone();
        out.add_column(self.output_column.clone(), Column::Double(flags))?;
        Ok(out)
    }
}
