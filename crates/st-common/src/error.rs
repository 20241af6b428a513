//! Error types for Stream Triage.

use thiserror::Error;

/// Result type alias for Stream Triage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Stream Triage.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("classifier chain is empty")]
    EmptyChain,

    #[error("required column '{column}' missing ({context})")]
    MissingColumn { column: String, context: String },

    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    // Frame errors (20-29)
    #[error("column '{column}' has type {actual}, expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("column '{column}' has {actual} rows, frame has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    // Ingest errors (30-39)
    #[error("ingest failed: {0}")]
    Ingest(String),

    #[error("cannot parse '{value}' as {expected} for column '{column}' (record {record})")]
    CellParse {
        column: String,
        expected: &'static str,
        value: String,
        record: u64,
    },

    // Classification errors (40-49)
    #[error("classifier stage '{stage}' failed: {message}")]
    Classification { stage: String, message: String },

    // Summarization errors (50-59)
    #[error("summarization failed: {0}")]
    Summarization(String),

    // Sink errors (60-69)
    #[error("failed to persist artifact '{artifact}': {message}")]
    Sink { artifact: String, message: String },

    // Callback errors (70-79)
    #[error("result callback failed: {0}")]
    Callback(String),

    // I/O errors (80-89)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::EmptyChain => 11,
            Error::MissingColumn { .. } => 12,
            Error::UnsupportedSource(_) => 13,
            Error::ColumnType { .. } => 20,
            Error::LengthMismatch { .. } => 21,
            Error::DuplicateColumn(_) => 22,
            Error::ColumnNotFound(_) => 23,
            Error::Ingest(_) => 30,
            Error::CellParse { .. } => 31,
            Error::Classification { .. } => 40,
            Error::Summarization(_) => 50,
            Error::Sink { .. } => 60,
            Error::Callback(_) => 70,
            Error::Io(_) => 80,
            Error::Json(_) => 81,
        }
    }

    /// Whether this error aborts the entire run rather than a single batch.
    ///
    /// Callback failures are consumer-side contract violations; everything
    /// else raised during batch processing aborts only that batch.
    pub fn is_run_fatal(&self) -> bool {
        matches!(self, Error::Callback(_))
    }
}
