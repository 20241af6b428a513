//! Predicate (fixed-cutoff) classifier stage.

use st_common::{Error, Result};
use st_config::{PredicateOp, PredicateValue};
use st_frame::{Column, DataFrame};

use super::ClassifierStage;

/// Flags rows where `column <op> value` holds.
///
/// Numeric cutoffs compare against a `Double` column, string cutoffs
/// against a `String` column (equality forms only). In a chain this is the
/// narrowing stage: point it at the previous stage's output column with
/// `== 1.0`.
pub struct PredicateClassifier {
    column: String,
    op: PredicateOp,
    value: PredicateValue,
    output_column: String,
}

impl PredicateClassifier {
    pub fn new(
        column: String,
        op: PredicateOp,
        value: PredicateValue,
        output_column: String,
    ) -> Self {
        Self {
            column,
            op,
            value,
            output_column,
        }
    }

    fn numeric_flags(&self, frame: &DataFrame, cutoff: f64) -> Result<Vec<f64>> {
        let values = frame.double_column(&self.column)?;
        Ok(values
            .iter()
            .map(|v| {
                let hit = match self.op {
                    PredicateOp::Eq => *v == cutoff,
                    PredicateOp::Ne => *v != cutoff,
                    PredicateOp::Lt => *v < cutoff,
                    PredicateOp::Gt => *v > cutoff,
                    PredicateOp::Le => *v <= cutoff,
                    PredicateOp::Ge => *v >= cutoff,
                };
                if hit {
                    1.0
                } else {
                    0.0
                }
            })
            .collect())
    }

    fn text_flags(&self, frame: &DataFrame, cutoff: &str) -> Result<Vec<f64>> {
        let values = frame.string_column(&self.column)?;
        let flags = match self.op {
            PredicateOp::Eq => values
                .iter()
                .map(|v| if v == cutoff { 1.0 } else { 0.0 })
                .collect(),
            PredicateOp::Ne => values
                .iter()
                .map(|v| if v != cutoff { 1.0 } else { 0.0 })
                .collect(),
            _ => {
                return Err(Error::Classification {
                    stage: "predicate".to_string(),
                    message: "string cutoffs support only == and !=".to_string(),
                })
            }
        };
        Ok(flags)
    }
}

impl ClassifierStage for PredicateClassifier {
    fn name(&self) -> &'static str {
        "predicate"
    }

    fn output_column(&self) -> &str {
        &self.output_column
    }

    fn process(&mut self, frame: &DataFrame) -> Result<DataFrame> {
        let flags = match &self.value {
            PredicateValue::Number(cutoff) => self.numeric_flags(frame, *cutoff)?,
            PredicateValue::Text(cutoff) => self.text_flags(frame, cutoff)?,
        };
        let mut out = frame.clone();
        out.add_column(self.output_column.clone(), Column::Double(flags))?;
        Ok(out)
    }
}
