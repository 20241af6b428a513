//! Construction-time validation of pipeline configs.
//!
//! Every rule here is fatal before the first batch: a config that fails
//! validation never opens its source.

use std::collections::HashSet;

use st_common::{Error, Result};

use crate::pipeline::{ClassifierKind, PipelineConfig, PredicateOp, PredicateValue};

impl PipelineConfig {
    /// Validate a finalized config. Returns the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self.classifiers.is_empty() {
            return Err(Error::EmptyChain);
        }
        if self.attributes.is_empty() {
            return Err(Error::Config(
                "at least one grouping attribute is required".to_string(),
            ));
        }
        if self.input.batch_size == 0 {
            return Err(Error::Config("input.batch_size must be at least 1".to_string()));
        }

        let mut outputs: HashSet<&str> = HashSet::new();
        let mut numeric_metrics: HashSet<&str> = HashSet::new();
        for (index, stage) in self.classifiers.iter().enumerate() {
            let label = format!("classifier {} ({})", index + 1, stage.kind_name());

            if stage.metric_columns.is_empty() {
                return Err(Error::Config(format!("{label}: metric_columns is empty")));
            }

            match &stage.kind {
                ClassifierKind::Quantile { quantile } => {
                    if !(*quantile > 0.0 && *quantile < 1.0) {
                        return Err(Error::Config(format!(
                            "{label}: quantile must be in (0, 1), got {quantile}"
                        )));
                    }
                }
                ClassifierKind::Predicate { op, value } => {
                    if stage.metric_columns.len() != 1 {
                        return Err(Error::Config(format!(
                            "{label}: predicate stages take exactly one metric column"
                        )));
                    }
                    if matches!(value, PredicateValue::Text(_))
                        && !matches!(op, PredicateOp::Eq | PredicateOp::Ne)
                    {
                        return Err(Error::Config(format!(
                            "{label}: string cutoffs support only == and !="
                        )));
                    }
                }
                ClassifierKind::Mad { sensitivity } => {
                    if !(*sensitivity > 0.0) {
                        return Err(Error::Config(format!(
                            "{label}: sensitivity must be positive, got {sensitivity}"
                        )));
                    }
                }
            }

            if !matches!(
                stage.kind,
                ClassifierKind::Predicate {
                    value: PredicateValue::Text(_),
                    ..
                }
            ) {
                for column in &stage.metric_columns {
                    numeric_metrics.insert(column.as_str());
                }
            }

            let output = stage.output_column.as_deref().ok_or_else(|| {
                Error::Config(format!("{label}: config was not finalized"))
            })?;
            if !outputs.insert(output) {
                return Err(Error::Config(format!(
                    "{label}: duplicate output column '{output}'"
                )));
            }
        }

        for attribute in &self.attributes {
            if numeric_metrics.contains(attribute.as_str()) {
                return Err(Error::Config(format!(
                    "attribute '{attribute}' is also a numeric metric column"
                )));
            }
        }

        if !(self.summarizer.min_support > 0.0 && self.summarizer.min_support <= 1.0) {
            return Err(Error::Config(format!(
                "summarizer.min_support must be in (0, 1], got {}",
                self.summarizer.min_support
            )));
        }
        if !(self.summarizer.min_ratio >= 0.0) {
            return Err(Error::Config(format!(
                "summarizer.min_ratio must be non-negative, got {}",
                self.summarizer.min_ratio
            )));
        }
        if self.summarizer.max_order == 0 {
            return Err(Error::Config(
                "summarizer.max_order must be at least 1".to_string(),
            ));
        }
        if self.preprocess.bucket_ms <= 0 {
            return Err(Error::Config(format!(
                "preprocess.bucket_ms must be positive, got {}",
                self.preprocess.bucket_ms
            )));
        }

        Ok(())
    }
}
