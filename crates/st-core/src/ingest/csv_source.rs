//! CSV file batch source.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use st_common::{Error, Result};
use st_frame::{ColType, Column, DataFrame, Schema};

use super::BatchSource;

/// Streams a headered CSV file in fixed-size row batches, projected to the
/// declared schema.
///
/// The header is validated at `open` time so that a missing required
/// column fails before any batch is delivered. Cells are coerced to the
/// declared column types; a cell that does not coerce terminates the load.
pub struct CsvBatchSource {
    path: PathBuf,
    schema: Schema,
    batch_size: usize,
}

impl std::fmt::Debug for CsvBatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvBatchSource")
            .field("path", &self.path)
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl CsvBatchSource {
    pub fn open(path: impl AsRef<Path>, schema: Schema, batch_size: usize) -> Result<Self> {
        if schema.is_empty() {
            return Err(Error::Config("source schema is empty".to_string()));
        }
        if batch_size == 0 {
            return Err(Error::Config("batch size must be at least 1".to_string()));
        }
        let path = path.as_ref().to_path_buf();
        let headers = read_headers(&path)?;
        for (name, _) in schema.fields() {
            if !headers.iter().any(|h| h == name) {
                return Err(Error::MissingColumn {
                    column: name.to_string(),
                    context: format!("header of {}", path.display()),
                });
            }
        }
        Ok(Self {
            path,
            schema,
            batch_size,
        })
    }
}

fn read_headers(path: &Path) -> Result<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::Ingest(format!("cannot open {}: {e}", path.display())))?;
    reader
        .headers()
        .map(|h| h.clone())
        .map_err(|e| Error::Ingest(format!("cannot read header: {e}")))
}

/// Per-column batch accumulator matching the declared type.
struct ColumnBuilder {
    name: String,
    index: usize,
    data: Column,
}

impl ColumnBuilder {
    fn new(name: &str, col_type: ColType, index: usize) -> Self {
        let data = match col_type {
            ColType::Double => Column::Double(Vec::new()),
            ColType::Long => Column::Long(Vec::new()),
            ColType::String => Column::String(Vec::new()),
        };
        Self {
            name: name.to_string(),
            index,
            data,
        }
    }

    fn push(&mut self, cell: &str, record: u64) -> Result<()> {
        match &mut self.data {
            Column::Double(v) => {
                let parsed = cell.parse::<f64>().map_err(|_| Error::CellParse {
                    column: self.name.clone(),
                    expected: ColType::Double.name(),
                    value: cell.to_string(),
                    record,
                })?;
                v.push(parsed);
            }
            Column::Long(v) => {
                let parsed = cell.parse::<i64>().map_err(|_| Error::CellParse {
                    column: self.name.clone(),
                    expected: ColType::Long.name(),
                    value: cell.to_string(),
                    record,
                })?;
                v.push(parsed);
            }
            Column::String(v) => v.push(cell.to_string()),
        }
        Ok(())
    }

    fn take(&mut self) -> Column {
        let empty = match &self.data {
            Column::Double(_) => Column::Double(Vec::new()),
            Column::Long(_) => Column::Long(Vec::new()),
            Column::String(_) => Column::String(Vec::new()),
        };
        std::mem::replace(&mut self.data, empty)
    }
}

fn flush(builders: &mut [ColumnBuilder], handler: &mut dyn FnMut(DataFrame) -> Result<()>) -> Result<()> {
    let mut frame = DataFrame::new();
    for builder in builders.iter_mut() {
        frame.add_column(builder.name.clone(), builder.take())?;
    }
    handler(frame)
}

impl BatchSource for CsvBatchSource {
    fn load(&mut self, handler: &mut dyn FnMut(DataFrame) -> Result<()>) -> Result<()> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| Error::Ingest(format!("cannot open {}: {e}", self.path.display())))?;
        let headers = reader
            .headers()
            .map(|h| h.clone())
            .map_err(|e| Error::Ingest(format!("cannot read header: {e}")))?;

        let mut builders: Vec<ColumnBuilder> = Vec::with_capacity(self.schema.len());
        for (name, col_type) in self.schema.fields() {
            let index = headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::MissingColumn {
                    column: name.to_string(),
                    context: format!("header of {}", self.path.display()),
                })?;
            builders.push(ColumnBuilder::new(name, col_type, index));
        }

        let mut rows = 0usize;
        for (record_index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| Error::Ingest(format!("bad record: {e}")))?;
            let record_number = record_index as u64 + 1;
            for builder in &mut builders {
                let cell = record.get(builder.index).unwrap_or("");
                builder.push(cell, record_number)?;
            }
            rows += 1;
            if rows == self.batch_size {
                flush(&mut builders, handler)?;
                rows = 0;
            }
        }
        if rows > 0 {
            flush(&mut builders, handler)?;
        }
        Ok(())
    }
}
