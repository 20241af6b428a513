//! Column-major data frames.

use serde_json::{Map, Value};
use st_common::{Error, Result};

use crate::schema::ColType;

/// A single named column's data.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Double(Vec<f64>),
    Long(Vec<i64>),
    String(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Double(v) => v.len(),
            Column::Long(v) => v.len(),
            Column::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn col_type(&self) -> ColType {
        match self {
            Column::Double(_) => ColType::Double,
            Column::Long(_) => ColType::Long,
            Column::String(_) => ColType::String,
        }
    }

    /// Rows of this column where `mask` is true. Caller checks lengths.
    fn filtered(&self, mask: &[bool]) -> Column {
        match self {
            Column::Double(v) => Column::Double(
                v.iter()
                    .zip(mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(x, _)| *x)
                    .collect(),
            ),
            Column::Long(v) => Column::Long(
                v.iter()
                    .zip(mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(x, _)| *x)
                    .collect(),
            ),
            Column::String(v) => Column::String(
                v.iter()
                    .zip(mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(x, _)| x.clone())
                    .collect(),
            ),
        }
    }

    fn json_value(&self, row: usize) -> Value {
        match self {
            Column::Double(v) => serde_json::Number::from_f64(v[row])
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Column::Long(v) => Value::Number(v[row].into()),
            Column::String(v) => Value::String(v[row].clone()),
        }
    }
}

/// A batch of rows with named, typed columns.
///
/// All columns share one length. Insertion order is preserved so artifact
/// exports are deterministic.
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    num_rows: usize,
    columns: Vec<(String, Column)>,
}

impl DataFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Add a named column. The first column fixes the row count; later
    /// columns must match it. Duplicate names are rejected.
    pub fn add_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(Error::DuplicateColumn(name));
        }
        if self.columns.is_empty() {
            self.num_rows = column.len();
        } else if column.len() != self.num_rows {
            return Err(Error::LengthMismatch {
                column: name,
                expected: self.num_rows,
                actual: column.len(),
            });
        }
        self.columns.push((name, column));
        Ok(())
    }

    pub fn double_column(&self, name: &str) -> Result<&[f64]> {
        match self.column(name) {
            Some(Column::Double(v)) => Ok(v),
            Some(other) => Err(Error::ColumnType {
                column: name.to_string(),
                expected: ColType::Double.name(),
                actual: other.col_type().name(),
            }),
            None => Err(Error::ColumnNotFound(name.to_string())),
        }
    }

    pub fn long_column(&self, name: &str) -> Result<&[i64]> {
        match self.column(name) {
            Some(Column::Long(v)) => Ok(v),
            Some(other) => Err(Error::ColumnType {
                column: name.to_string(),
                expected: ColType::Long.name(),
                actual: other.col_type().name(),
            }),
            None => Err(Error::ColumnNotFound(name.to_string())),
        }
    }

    pub fn string_column(&self, name: &str) -> Result<&[String]> {
        match self.column(name) {
            Some(Column::String(v)) => Ok(v),
            Some(other) => Err(Error::ColumnType {
                column: name.to_string(),
                expected: ColType::String.name(),
                actual: other.col_type().name(),
            }),
            None => Err(Error::ColumnNotFound(name.to_string())),
        }
    }

    /// New frame containing only the rows where `mask` is true.
    pub fn filter(&self, mask: &[bool]) -> Result<DataFrame> {
        if mask.len() != self.num_rows {
            return Err(Error::LengthMismatch {
                column: "<mask>".to_string(),
                expected: self.num_rows,
                actual: mask.len(),
            });
        }
        let kept = mask.iter().filter(|k| **k).count();
        let columns = self
            .columns
            .iter()
            .map(|(n, c)| (n.clone(), c.filtered(mask)))
            .collect();
        Ok(DataFrame {
            num_rows: kept,
            columns,
        })
    }

    /// Boolean mask over a classification output column: `> 0.0` flags a row.
    pub fn flag_mask(&self, column: &str) -> Result<Vec<bool>> {
        let flags = self.double_column(column)?;
        Ok(flags.iter().map(|f| *f > 0.0).collect())
    }

    /// Rows as JSON objects. Non-finite doubles serialize as null.
    pub fn to_json_rows(&self) -> Vec<Value> {
        (0..self.num_rows)
            .map(|row| {
                let mut obj = Map::new();
                for (name, column) in &self.columns {
                    obj.insert(name.clone(), column.json_value(row));
                }
                Value::Object(obj)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        let mut df = DataFrame::new();
        df.add_column("latency", Column::Double(vec![1.0, 9.0, 2.0]))
            .unwrap();
        df.add_column("host", Column::String(vec!["a".into(), "b".into(), "a".into()]))
            .unwrap();
        df.add_column("ts", Column::Long(vec![100, 200, 300])).unwrap();
        df
    }

    #[test]
    fn first_column_fixes_row_count() {
        let df = sample_frame();
        assert_eq!(df.num_rows(), 3);
        assert_eq!(df.num_columns(), 3);
    }

    #[test]
    fn length_mismatch_rejected() {
        let mut df = sample_frame();
        let err = df
            .add_column("short", Column::Double(vec![1.0]))
            .unwrap_err();
        assert!(matches!(err, st_common::Error::LengthMismatch { .. }));
    }

    #[test]
    fn duplicate_column_rejected() {
        let mut df = sample_frame();
        let err = df
            .add_column("latency", Column::Double(vec![0.0, 0.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, st_common::Error::DuplicateColumn(_)));
    }

    #[test]
    fn typed_access_enforces_types() {
        let df = sample_frame();
        assert_eq!(df.double_column("latency").unwrap(), &[1.0, 9.0, 2.0]);
        assert!(matches!(
            df.double_column("host").unwrap_err(),
            st_common::Error::ColumnType { .. }
        ));
        assert!(matches!(
            df.double_column("nope").unwrap_err(),
            st_common::Error::ColumnNotFound(_)
        ));
    }

    #[test]
    fn filter_keeps_masked_rows_across_all_columns() {
        let df = sample_frame();
        let out = df.filter(&[true, false, true]).unwrap();
        assert_eq!(out.num_rows(), 2);
        assert_eq!(out.double_column("latency").unwrap(), &[1.0, 2.0]);
        assert_eq!(out.long_column("ts").unwrap(), &[100, 300]);
        assert_eq!(
            out.string_column("host").unwrap(),
            &["a".to_string(), "a".to_string()]
        );
    }

    #[test]
    fn filter_rejects_wrong_mask_length() {
        let df = sample_frame();
        assert!(df.filter(&[true]).is_err());
    }

    #[test]
    fn flag_mask_uses_positive_convention() {
        let mut df = DataFrame::new();
        df.add_column("_OUTLIER", Column::Double(vec![0.0, 1.0, 0.0, 1.0]))
            .unwrap();
        assert_eq!(
            df.flag_mask("_OUTLIER").unwrap(),
            vec![false, true, false, true]
        );
    }

    #[test]
    fn json_rows_carry_every_column() {
        let df = sample_frame();
        let rows = df.to_json_rows();
        assert_eq!(rows.len(), 3);
        let first = rows[0].as_object().unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first["latency"], serde_json::json!(1.0));
        assert_eq!(first["host"], serde_json::json!("a"));
        assert_eq!(first["ts"], serde_json::json!(100));
    }

    #[test]
    fn json_rows_lower_non_finite_to_null() {
        let mut df = DataFrame::new();
        df.add_column("score", Column::Double(vec![f64::NAN]))
            .unwrap();
        let rows = df.to_json_rows();
        assert_eq!(rows[0]["score"], serde_json::Value::Null);
    }

    #[test]
    fn empty_frame_has_no_rows() {
        let df = DataFrame::new();
        assert_eq!(df.num_rows(), 0);
        assert!(df.to_json_rows().is_empty());
    }
}
