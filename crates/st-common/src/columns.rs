//! Well-known column names shared across the workspace.

/// Default classification output column when a stage does not name one.
pub const DEFAULT_OUTPUT_COLUMN: &str = "_OUTLIER";

/// Auto-generated time-bucket column added by preprocessing.
pub const TIME_BUCKET_COLUMN: &str = "__autogen_time_bucket";

/// Auto-generated per-batch row-id column added by preprocessing when no
/// id column is configured.
pub const ROW_ID_COLUMN: &str = "__autogen_id";
