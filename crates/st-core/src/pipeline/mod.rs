//! The pipeline controller: per-batch sequencing, timing, and delivery.
//!
//! Per batch the controller runs: preprocess -> classify-chain ->
//! persist-outliers -> summarize -> persist-explanation -> callback. The
//! source's blocking callback delivery keeps at most one batch in flight;
//! no batch starts before the previous one was delivered or failed.

pub mod metrics;
pub mod preprocess;

pub use metrics::{MetricsAccumulator, MetricsSnapshot};
pub use preprocess::Preprocessor;

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use st_common::{Error, Result};
use st_config::PipelineConfig;
use st_frame::{DataFrame, Schema};

use crate::classify::ClassifierChain;
use crate::ingest::BatchSource;
use crate::sink::{explanation_artifact_name, outliers_artifact_name, Artifact, ResultSink};
use crate::summarize::{AttributeSetSummarizer, Explanation, Summarizer};

/// Error type callbacks may return; any callback error is fatal to the run.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Timings of one batch. A field stays `None` when the batch failed
/// before that phase completed.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BatchTiming {
    pub index: u64,
    pub classification_ms: Option<u64>,
    pub summarization_ms: Option<u64>,
}

/// Final report of a completed run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: String,
    pub batches_received: u64,
    pub batches_delivered: u64,
    pub batches_failed: u64,
    /// Cumulative totals; equal to the sum of `batch_timings` entries.
    pub totals: MetricsSnapshot,
    pub batch_timings: Vec<BatchTiming>,
}

/// Owns the classifier chain, the summarizer, and the run counters, and
/// drives the per-batch sequence.
///
/// Construction is where configuration errors surface: an invalid config
/// never opens its source. The batch index and the metrics accumulator are
/// per-run state, reset when `run` starts, so concurrent pipelines (and
/// repeated runs of one pipeline) stay independent.
pub struct StreamingPipeline {
    config: PipelineConfig,
    chain: ClassifierChain,
    summarizer: Box<dyn Summarizer>,
    preprocessor: Preprocessor,
    metrics: MetricsAccumulator,
    batch_index: u64,
}

impl std::fmt::Debug for StreamingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingPipeline")
            .field("config", &self.config)
            .field("batch_index", &self.batch_index)
            .finish_non_exhaustive()
    }
}

impl StreamingPipeline {
    /// Build a pipeline from a parsed config: finalizes it, validates it,
    /// and constructs the chain and the default summarizer.
    pub fn new(mut config: PipelineConfig) -> Result<Self> {
        config.finalize();
        config.validate()?;
        let chain = ClassifierChain::from_configs(&config.classifiers)?;
        let summarizer = Box::new(AttributeSetSummarizer::new(config.summarizer.clone()));
        let preprocessor = Preprocessor::new(
            config.time_column.clone(),
            config.id_column.clone(),
            &config.preprocess,
        );
        Ok(Self {
            config,
            chain,
            summarizer,
            preprocessor,
            metrics: MetricsAccumulator::new(),
            batch_index: 0,
        })
    }

    /// Replace the summarizer (the default is attribute-set
    /// summarization built from the config).
    pub fn with_summarizer(mut self, summarizer: Box<dyn Summarizer>) -> Self {
        self.summarizer = summarizer;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Columns (with types) the source must deliver; declared before the
    /// source is opened so it can validate and project immediately.
    pub fn source_schema(&self) -> Schema {
        self.config.source_schema()
    }

    /// The chain's overall output column name.
    pub fn output_column(&self) -> &str {
        self.chain.output_column()
    }

    /// Cumulative totals of the current (or last) run.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Drive the run to completion: pull every batch the source offers,
    /// process each synchronously, and invoke `on_explanation` once per
    /// delivered batch, in arrival order.
    ///
    /// A failing batch is logged and skipped; a failing callback (or the
    /// source itself failing) aborts the run.
    pub fn run<F>(
        &mut self,
        source: &mut dyn BatchSource,
        sink: &mut dyn ResultSink,
        mut on_explanation: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(Explanation) -> std::result::Result<(), CallbackError>,
    {
        let run_id = uuid::Uuid::new_v4().to_string();
        let started_at = chrono::Utc::now().to_rfc3339();
        self.batch_index = 0;
        self.metrics = MetricsAccumulator::new();
        info!(run_id = %run_id, "pipeline run started");

        let mut delivered = 0u64;
        let mut failed = 0u64;
        let mut batch_timings = Vec::new();

        source.load(&mut |frame| {
            self.batch_index += 1;
            let index = self.batch_index;
            let mut timing = BatchTiming {
                index,
                classification_ms: None,
                summarization_ms: None,
            };
            let outcome = self.process_batch(frame, index, &mut timing, sink, &mut on_explanation);
            batch_timings.push(timing);
            match outcome {
                Ok(()) => {
                    delivered += 1;
                    Ok(())
                }
                Err(err) if err.is_run_fatal() => Err(err),
                Err(err) => {
                    failed += 1;
                    warn!(batch = index, code = err.code(), error = %err, "batch aborted");
                    Ok(())
                }
            }
        })?;

        let totals = self.metrics.snapshot();
        info!(
            run_id = %run_id,
            batches = self.batch_index,
            delivered,
            failed,
            classification_ms = totals.classification_ms,
            summarization_ms = totals.summarization_ms,
            "pipeline run finished"
        );
        Ok(RunSummary {
            run_id,
            started_at,
            batches_received: self.batch_index,
            batches_delivered: delivered,
            batches_failed: failed,
            totals,
            batch_timings,
        })
    }

    fn process_batch<F>(
        &mut self,
        mut frame: DataFrame,
        index: u64,
        timing: &mut BatchTiming,
        sink: &mut dyn ResultSink,
        on_explanation: &mut F,
    ) -> Result<()>
    where
        F: FnMut(Explanation) -> std::result::Result<(), CallbackError>,
    {
        debug!(batch = index, rows = frame.num_rows(), "batch received");
        self.preprocessor.derive(&mut frame)?;

        let started = Instant::now();
        let (classified, outlier_column) = self.chain.apply(frame)?;
        let classification_ms = started.elapsed().as_millis() as u64;
        timing.classification_ms = Some(classification_ms);
        self.metrics.add_classification(classification_ms);

        let mask = classified.flag_mask(&outlier_column)?;
        let outliers = classified.filter(&mask)?;
        sink.save(
            &outliers_artifact_name(index),
            &Artifact::Outliers {
                rows: &outliers,
                outlier_column: &outlier_column,
            },
        )?;

        let started = Instant::now();
        let explanation =
            self.summarizer
                .summarize(&classified, &outlier_column, &self.config.attributes)?;
        let summarization_ms = started.elapsed().as_millis() as u64;
        timing.summarization_ms = Some(summarization_ms);
        self.metrics.add_summarization(summarization_ms);

        let totals = self.metrics.snapshot();
        info!(
            batch = index,
            classification_ms,
            total_classification_ms = totals.classification_ms,
            summarization_ms,
            total_summarization_ms = totals.summarization_ms,
            "batch timings"
        );

        sink.save(
            &explanation_artifact_name(index),
            &Artifact::Explanation {
                explanation: &explanation,
                batch: &classified,
                outlier_column: &outlier_column,
            },
        )?;

        on_explanation(explanation).map_err(|e| Error::Callback(e.to_string()))?;
        debug!(batch = index, "batch delivered");
        Ok(())
    }
}
