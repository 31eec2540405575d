//! Read-only reference dataset loading and preview
//!
//! The table shown next to the form is never fed to the pipeline; batch
//! prediction reads booking tables through the same loader.

use crate::config::MAX_PREVIEW_ROWS;
use crate::error::{Result, StaywiseError};
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

/// Load a CSV, JSON / JSON-lines or Parquet table, picking the reader by extension
pub fn load_table(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| StaywiseError::DataError(format!("cannot open {}: {}", path.display(), e)))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let df = match extension.as_str() {
        "csv" => CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(1000))
            .into_reader_with_file_handle(file)
            .finish()?,
        "json" => JsonReader::new(file).finish()?,
        "jsonl" | "ndjson" => JsonReader::new(file)
            .with_json_format(JsonFormat::JsonLines)
            .finish()?,
        "parquet" | "pq" => ParquetReader::new(file).finish()?,
        other => {
            return Err(StaywiseError::DataError(format!(
                "unsupported table format '{}' for {}; use CSV, JSON or Parquet",
                other,
                path.display()
            )))
        }
    };

    tracing::debug!(path = %path.display(), rows = df.height(), columns = df.width(), "Loaded table");
    Ok(df)
}

/// One column of a preview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewColumn {
    pub name: String,
    pub dtype: String,
    pub values: Vec<serde_json::Value>,
}

/// First rows of a table, ready for JSON or HTML rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetPreview {
    pub total_rows: usize,
    pub rows: usize,
    pub columns: Vec<PreviewColumn>,
}

fn any_value_to_json(value: AnyValue<'_>) -> serde_json::Value {
    match value {
        AnyValue::Null => serde_json::Value::Null,
        AnyValue::Boolean(v) => serde_json::json!(v),
        AnyValue::String(v) => serde_json::json!(v),
        AnyValue::StringOwned(v) => serde_json::json!(v.as_str()),
        AnyValue::Int8(v) => serde_json::json!(v),
        AnyValue::Int16(v) => serde_json::json!(v),
        AnyValue::Int32(v) => serde_json::json!(v),
        AnyValue::Int64(v) => serde_json::json!(v),
        AnyValue::UInt8(v) => serde_json::json!(v),
        AnyValue::UInt16(v) => serde_json::json!(v),
        AnyValue::UInt32(v) => serde_json::json!(v),
        AnyValue::UInt64(v) => serde_json::json!(v),
        AnyValue::Float32(v) => serde_json::json!(v),
        AnyValue::Float64(v) => serde_json::json!(v),
        other => serde_json::json!(other.to_string()),
    }
}

impl DatasetPreview {
    /// Preview the first `n_rows` rows (capped at the preview maximum)
    pub fn from_frame(df: &DataFrame, n_rows: usize) -> Result<Self> {
        let head = df.head(Some(n_rows.min(MAX_PREVIEW_ROWS)));
        let columns = head
            .get_columns()
            .iter()
            .map(|col| -> Result<PreviewColumn> {
                let values = (0..col.len())
                    .map(|i| col.get(i).map(any_value_to_json))
                    .collect::<PolarsResult<Vec<_>>>()?;
                Ok(PreviewColumn {
                    name: col.name().to_string(),
                    dtype: col.dtype().to_string(),
                    values,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            total_rows: df.height(),
            rows: head.height(),
            columns,
        })
    }

    pub fn load(path: impl AsRef<Path>, n_rows: usize) -> Result<Self> {
        let df = load_table(path)?;
        Self::from_frame(&df, n_rows)
    }

    /// The first `n_rows` rows of this preview
    pub fn head(&self, n_rows: usize) -> Self {
        let rows = n_rows.min(self.rows);
        Self {
            total_rows: self.total_rows,
            rows,
            columns: self
                .columns
                .iter()
                .map(|c| PreviewColumn {
                    name: c.name.clone(),
                    dtype: c.dtype.clone(),
                    values: c.values[..rows].to_vec(),
                })
                .collect(),
        }
    }

    /// Cell text of each row, in column order
    pub fn row_cells(&self) -> Vec<Vec<String>> {
        (0..self.rows)
            .map(|i| {
                self.columns
                    .iter()
                    .map(|c| match &c.values[i] {
                        serde_json::Value::Null => String::new(),
                        serde_json::Value::String(s) => s.clone(),
                        v => v.to_string(),
                    })
                    .collect()
            })
            .collect()
    }
}
