//! Ordered chain of classifier stages.

use tracing::debug;

use st_common::columns::DEFAULT_OUTPUT_COLUMN;
use st_common::{Error, Result};
use st_config::{ClassifierKind, ClassifierStageConfig};
use st_frame::DataFrame;

use super::{ClassifierStage, MadClassifier, PredicateClassifier, QuantileClassifier};

/// Ordered list of classifier stages applied sequentially.
///
/// Stage *i+1* sees every column stage *i* produced; the chain's output
/// column is the last stage's. The chain only moves data; stage
/// configuration is fixed at build time.
pub struct ClassifierChain {
    stages: Vec<Box<dyn ClassifierStage>>,
}

impl std::fmt::Debug for ClassifierChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierChain")
            .field("stages", &self.stages.len())
            .finish()
    }
}

impl ClassifierChain {
    /// Build a chain from finalized stage configs. An empty list is a
    /// configuration error: summarization needs an output column to rank.
    pub fn from_configs(configs: &[ClassifierStageConfig]) -> Result<Self> {
        if configs.is_empty() {
            return Err(Error::EmptyChain);
        }
        let stages = configs.iter().map(build_stage).collect::<Result<Vec<_>>>()?;
        Ok(Self { stages })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The chain's overall output column: the last stage's output column.
    pub fn output_column(&self) -> &str {
        self.stages
            .last()
            .map(|s| s.output_column())
            .unwrap_or(DEFAULT_OUTPUT_COLUMN)
    }

    /// Apply every stage in order. Any stage failure aborts the batch with
    /// the stage name attached; no partial-chain output is surfaced.
    pub fn apply(&mut self, frame: DataFrame) -> Result<(DataFrame, String)> {
        let mut current = frame;
        for stage in &mut self.stages {
            debug!(
                stage = stage.name(),
                output = stage.output_column(),
                rows = current.num_rows(),
                "applying classifier stage"
            );
            current = stage.process(&current).map_err(|err| match err {
                err @ Error::Classification { .. } => err,
                other => Error::Classification {
                    stage: stage.name().to_string(),
                    message: other.to_string(),
                },
            })?;
        }
        let output = self.output_column().to_string();
        Ok((current, output))
    }
}

fn build_stage(config: &ClassifierStageConfig) -> Result<Box<dyn ClassifierStage>> {
    let output = config
        .output_column
        .clone()
        .unwrap_or_else(|| DEFAULT_OUTPUT_COLUMN.to_string());
    match &config.kind {
        ClassifierKind::Quantile { quantile } => Ok(Box::new(QuantileClassifier::new(
            config.metric_columns.clone(),
            *quantile,
            output,
        ))),
        ClassifierKind::Predicate { op, value } => {
            let column = config.metric_columns.first().cloned().ok_or_else(|| {
                Error::Config("predicate stage requires a metric column".to_string())
            })?;
            Ok(Box::new(PredicateClassifier::new(
                column,
                *op,
                value.clone(),
                output,
            )))
        }
        ClassifierKind::Mad { sensitivity } => Ok(Box::new(MadClassifier::new(
            config.metric_columns.clone(),
            *sensitivity,
            output,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use st_config::PipelineConfig;
    use st_frame::Column;

    fn chain_config(yaml: &str) -> Vec<ClassifierStageConfig> {
        let mut config = PipelineConfig::from_yaml_str(yaml).unwrap();
        config.finalize();
        config.classifiers
    }

    fn two_stage_configs() -> Vec<ClassifierStageConfig> {
        chain_config(
            r#"
input:
  uri: memory
classifiers:
  - type: quantile
    quantile: 0.9
    metric_columns: [latency_ms]
    output_column: _QUANTILE
  - type: predicate
    op: "=="
    value: 1.0
    metric_columns: [_QUANTILE]
    output_column: _OUTLIER
attributes: [host]
"#,
        )
    }

    #[test]
    fn empty_chain_is_config_error() {
        let err = ClassifierChain::from_configs(&[]).unwrap_err();
        assert!(matches!(err, Error::EmptyChain));
    }

    #[test]
    fn output_column_is_last_stages() {
        let chain = ClassifierChain::from_configs(&two_stage_configs()).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.output_column(), "_OUTLIER");
    }

    #[test]
    fn second_stage_reads_first_stage_output() {
        let mut chain = ClassifierChain::from_configs(&two_stage_configs()).unwrap();
        let mut frame = DataFrame::new();
        frame
            .add_column("latency_ms", Column::Double(vec![1.0, 2.0, 3.0, 100.0]))
            .unwrap();

        let (result, output) = chain.apply(frame).unwrap();
        assert_eq!(output, "_OUTLIER");
        // Quantile 0.9 over 4 rows flags only the maximum; the predicate
        // narrows on the quantile flag.
        assert_eq!(
            result.double_column("_OUTLIER").unwrap(),
            &[0.0, 0.0, 0.0, 1.0]
        );
        assert!(result.has_column("_QUANTILE"));
    }

    #[test]
    fn stage_failure_carries_stage_name() {
        let mut chain = ClassifierChain::from_configs(&two_stage_configs()).unwrap();
        let mut frame = DataFrame::new();
        frame
            .add_column("other", Column::Double(vec![1.0]))
            .unwrap();

        let err = chain.apply(frame).unwrap_err();
        match err {
            Error::Classification { stage, message } => {
                assert_eq!(stage, "quantile");
                assert!(message.contains("latency_ms"));
            }
            other => panic!("expected classification error, got {other:?}"),
        }
    }
}
