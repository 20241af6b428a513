//! Pipeline configuration types.
//!
//! These types match the YAML pipeline files fed to the runner. A config
//! goes through three steps before a pipeline is built from it:
//! parse -> `finalize()` -> `validate()`. Finalization assigns default
//! output columns and pushes the shared time column name into every stage
//! config; after the chain is built the stage configs are never mutated
//! again.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use st_common::columns::{DEFAULT_OUTPUT_COLUMN, ROW_ID_COLUMN, TIME_BUCKET_COLUMN};
use st_common::{Error, Result};
use st_frame::{ColType, Schema};

/// Complete pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub input: InputConfig,

    pub classifiers: Vec<ClassifierStageConfig>,

    /// Grouping attributes the summarizer ranks combinations over.
    pub attributes: Vec<String>,

    #[serde(default)]
    pub time_column: Option<String>,

    #[serde(default)]
    pub id_column: Option<String>,

    #[serde(default)]
    pub summarizer: SummarizerConfig,

    #[serde(default)]
    pub preprocess: PreprocessConfig,
}

/// Streaming source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path or URI of the batch source.
    pub uri: String,

    /// Rows per delivered batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    1000
}

/// One classifier stage of the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierStageConfig {
    #[serde(flatten)]
    pub kind: ClassifierKind,

    /// Columns that are metrics for this stage. A later stage may name an
    /// earlier stage's output column here.
    pub metric_columns: Vec<String>,

    /// Output column; defaults to `_OUTLIER` at finalization.
    #[serde(default)]
    pub output_column: Option<String>,

    /// Shared time column, pushed in by `PipelineConfig::finalize`.
    #[serde(skip)]
    pub time_column: Option<String>,
}

impl ClassifierStageConfig {
    /// Stage kind name used in logs and error context.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ClassifierKind::Quantile { .. } => "quantile",
            ClassifierKind::Predicate { .. } => "predicate",
            ClassifierKind::Mad { .. } => "mad",
        }
    }
}

/// Stage algorithm selector and parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassifierKind {
    /// Flag rows at or above the given quantile of the per-row metric
    /// maximum within the batch.
    Quantile {
        #[serde(default = "default_quantile")]
        quantile: f64,
    },

    /// Flag rows where `metric <op> value` holds.
    Predicate {
        op: PredicateOp,
        value: PredicateValue,
    },

    /// Flag rows whose robust z-score (MAD-based) exceeds `sensitivity`.
    Mad {
        #[serde(default = "default_sensitivity")]
        sensitivity: f64,
    },
}

fn default_quantile() -> f64 {
    0.99
}

fn default_sensitivity() -> f64 {
    3.0
}

/// Comparison operator for predicate stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredicateOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
}

/// Predicate cutoff: numeric against Double columns, text against String
/// columns (equality forms only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredicateValue {
    Number(f64),
    Text(String),
}

/// Summarizer thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// Minimum fraction of outliers a combination must match.
    #[serde(default = "default_min_support")]
    pub min_support: f64,

    /// Minimum risk ratio versus the unmatched population.
    #[serde(default = "default_min_ratio")]
    pub min_ratio: f64,

    /// Largest attribute-combination order to enumerate.
    #[serde(default = "default_max_order")]
    pub max_order: usize,
}

fn default_min_support() -> f64 {
    0.2
}

fn default_min_ratio() -> f64 {
    3.0
}

fn default_max_order() -> usize {
    3
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            min_support: default_min_support(),
            min_ratio: default_min_ratio(),
            max_order: default_max_order(),
        }
    }
}

/// Auto-generated column parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Width of the derived time bucket, in milliseconds.
    #[serde(default = "default_bucket_ms")]
    pub bucket_ms: i64,
}

fn default_bucket_ms() -> i64 {
    60_000
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            bucket_ms: default_bucket_ms(),
        }
    }
}

impl PipelineConfig {
    /// Parse a YAML (or JSON) pipeline config.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| Error::Config(format!("invalid pipeline config: {e}")))
    }

    /// Read and parse a pipeline config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Assign default output columns and push the shared time column into
    /// every stage config. Stage configs are immutable once the chain is
    /// built from them.
    pub fn finalize(&mut self) {
        for stage in &mut self.classifiers {
            if stage.output_column.is_none() {
                stage.output_column = Some(DEFAULT_OUTPUT_COLUMN.to_string());
            }
            stage.time_column = self.time_column.clone();
        }
    }

    /// Columns the source must deliver, with the types the pipeline
    /// expects: stage metrics not produced by an earlier stage or by
    /// preprocessing, grouping attributes, and the configured time/id
    /// columns.
    pub fn source_schema(&self) -> Schema {
        let mut produced: HashSet<&str> = HashSet::new();
        produced.insert(TIME_BUCKET_COLUMN);
        produced.insert(ROW_ID_COLUMN);

        let mut schema = Schema::new();
        for stage in &self.classifiers {
            for column in &stage.metric_columns {
                if produced.contains(column.as_str()) || schema.field_type(column).is_some() {
                    continue;
                }
                let col_type = match &stage.kind {
                    ClassifierKind::Predicate {
                        value: PredicateValue::Text(_),
                        ..
                    } => ColType::String,
                    _ => ColType::Double,
                };
                schema = schema.with_field(column.clone(), col_type);
            }
            if let Some(output) = &stage.output_column {
                produced.insert(output.as_str());
            }
        }

        for attribute in &self.attributes {
            if schema.field_type(attribute).is_none() && !produced.contains(attribute.as_str()) {
                schema = schema.with_field(attribute.clone(), ColType::String);
            }
        }

        if let Some(time_column) = &self.time_column {
            if schema.field_type(time_column).is_none() {
                schema = schema.with_field(time_column.clone(), ColType::Long);
            }
        }
        if let Some(id_column) = &self.id_column {
            if schema.field_type(id_column).is_none() {
                schema = schema.with_field(id_column.clone(), ColType::Long);
            }
        }

        schema
    }

    /// Names of the externally required columns, in declaration order.
    pub fn required_columns(&self) -> Vec<String> {
        self.source_schema()
            .fields()
            .map(|(name, _)| name.to_string())
            .collect()
    }
}
