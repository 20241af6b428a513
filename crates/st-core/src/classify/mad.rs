//! Robust z-score (median absolute deviation) classifier stage.

use st_common::Result;
use st_frame::{Column, DataFrame};
use st_math::{mad, median, MAD_NORMAL_CONSISTENCY};

use super::ClassifierStage;

/// Flags rows whose MAD-based robust z-score exceeds the sensitivity on
/// any metric column.
///
/// Score per column: `|x - median| / (1.4826 * MAD)`. A zero MAD makes the
/// score infinite for any value off the median and NaN (never flagged) for
/// values on it, so constant columns flag only genuine departures.
pub struct MadClassifier {
    metric_columns: Vec<String>,
    sensitivity: f64,
    output_column: String,
}

impl MadClassifier {
    pub fn new(metric_columns: Vec<String>, sensitivity: f64, output_column: String) -> Self {
        Self {
            metric_columns,
            sensitivity,
            output_column,
        }
    }
}

impl ClassifierStage for MadClassifier {
    fn name(&self) -> &'static str {
        "mad"
    }

    fn output_column(&self) -> &str {
        &self.output_column
    }

    fn process(&mut self, frame: &DataFrame) -> Result<DataFrame> {
        let mut flags = vec![0.0; frame.num_rows()];
        for column in &self.metric_columns {
            let values = frame.double_column(column)?;
            let center = median(values);
            let spread = MAD_NORMAL_CONSISTENCY * mad(values);
            for (flag, value) in flags.iter_mut().zip(values) {
                let score = (value - center).abs() / spread;
                if score > self.sensitivity {
                    *flag = 1.0;
                }
            }
        }
        let mut out = frame.clone();
        out.add_column(self.output_column.clone(), Column::Double(flags))?;
        Ok(out)
    }
}
