//! Stream Triage core: batch orchestration over streaming tabular data.
//!
//! The controller pulls batches from a [`ingest::BatchSource`], runs each
//! through an ordered [`classify::ClassifierChain`], persists flagged rows,
//! summarizes the classified batch into an [`summarize::Explanation`],
//! persists that too, and hands it to the caller's callback, one batch in
//! flight at a time, in arrival order.

pub mod classify;
pub mod ingest;
pub mod pipeline;
pub mod sink;
pub mod summarize;

pub use classify::{ClassifierChain, ClassifierStage};
pub use ingest::{BatchSource, CsvBatchSource, MemorySource};
pub use pipeline::{
    BatchTiming, MetricsAccumulator, MetricsSnapshot, Preprocessor, RunSummary, StreamingPipeline,
};
pub use sink::{Artifact, JsonDirSink, MemorySink, ResultSink};
pub use summarize::{
    AttributeSetSummarizer, AttributeValue, Explanation, ExplanationItem, Summarizer,
};
