//! Auto-generated columns derived once per batch, before classification.

use st_common::columns::{ROW_ID_COLUMN, TIME_BUCKET_COLUMN};
use st_common::Result;
use st_config::PreprocessConfig;
use st_frame::{Column, DataFrame};

/// Derives the auto-generated columns for a batch: a time-bucket column
/// from the configured time column, and a synthetic per-batch row-id
/// column when no id column is configured.
///
/// Runs exactly once per batch; a failure here aborts the batch before
/// any classifier executes.
pub struct Preprocessor {
    time_column: Option<String>,
    has_id_column: bool,
    bucket_ms: i64,
}

impl Preprocessor {
    pub fn new(
        time_column: Option<String>,
        id_column: Option<String>,
        config: &PreprocessConfig,
    ) -> Self {
        Self {
            time_column,
            has_id_column: id_column.is_some(),
            bucket_ms: config.bucket_ms,
        }
    }

    pub fn derive(&self, frame: &mut DataFrame) -> Result<()> {
        if let Some(time_column) = &self.time_column {
            let buckets: Vec<i64> = frame
                .long_column(time_column)?
                .iter()
                .map(|ts| ts - ts.rem_euclid(self.bucket_ms))
                .collect();
            frame.add_column(TIME_BUCKET_COLUMN, Column::Long(buckets))?;
        }
        if !self.has_id_column {
            let ids: Vec<i64> = (0..frame.num_rows() as i64).collect();
            frame.add_column(ROW_ID_COLUMN, Column::Long(ids))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_ts(ts: Vec<i64>) -> DataFrame {
        let mut frame = DataFrame::new();
        frame.add_column("ts", Column::Long(ts)).unwrap();
        frame
    }

    #[test]
    fn buckets_floor_to_width() {
        let pre = Preprocessor::new(
            Some("ts".to_string()),
            Some("id".to_string()),
            &PreprocessConfig { bucket_ms: 60_000 },
        );
        let mut frame = frame_with_ts(vec![0, 59_999, 60_000, 119_999, 150_000]);
        pre.derive(&mut frame).unwrap();
        assert_eq!(
            frame.long_column(TIME_BUCKET_COLUMN).unwrap(),
            &[0, 0, 60_000, 60_000, 120_000]
        );
    }

    #[test]
    fn negative_timestamps_floor_downward() {
        let pre = Preprocessor::new(
            Some("ts".to_string()),
            Some("id".to_string()),
            &PreprocessConfig { bucket_ms: 100 },
        );
        let mut frame = frame_with_ts(vec![-1, -100, -101]);
        pre.derive(&mut frame).unwrap();
        assert_eq!(
            frame.long_column(TIME_BUCKET_COLUMN).unwrap(),
            &[-100, -100, -200]
        );
    }

    #[test]
    fn row_ids_added_only_without_configured_id() {
        let pre = Preprocessor::new(None, None, &PreprocessConfig::default());
        let mut frame = frame_with_ts(vec![1, 2, 3]);
        pre.derive(&mut frame).unwrap();
        assert_eq!(frame.long_column(ROW_ID_COLUMN).unwrap(), &[0, 1, 2]);
        assert!(!frame.has_column(TIME_BUCKET_COLUMN));

        let pre = Preprocessor::new(None, Some("id".to_string()), &PreprocessConfig::default());
        let mut frame = frame_with_ts(vec![1]);
        pre.derive(&mut frame).unwrap();
        assert!(!frame.has_column(ROW_ID_COLUMN));
    }

    #[test]
    fn missing_time_column_aborts_before_classification() {
        let pre = Preprocessor::new(
            Some("missing_ts".to_string()),
            None,
            &PreprocessConfig::default(),
        );
        let mut frame = frame_with_ts(vec![1]);
        assert!(pre.derive(&mut frame).is_err());
    }
}
