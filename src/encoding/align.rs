//! Reindexing of encoded tables to the frozen training-time column order

use crate::error::{Result, StaywiseError};
use ndarray::{Array2, ArrayView1};
use polars::prelude::*;
use std::collections::HashSet;

/// Numeric feature matrix whose columns follow the frozen schema
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedFeatures {
    columns: Vec<String>,
    values: Array2<f64>,
    filled: Vec<String>,
    dropped: Vec<String>,
}

impl AlignedFeatures {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.values.row(i)
    }

    /// Expected columns absent from the input, filled with zero
    pub fn filled(&self) -> &[String] {
        &self.filled
    }

    /// Input columns the schema does not know, dropped
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    /// Column/value pairs of one row
    pub fn named_row(&self, i: usize) -> Vec<(String, f64)> {
        self.columns
            .iter()
            .cloned()
            .zip(self.values.row(i).iter().copied())
            .collect()
    }
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::Boolean
    )
}

/// Reorder `frame` to `expected`, zero-filling absent columns and dropping extras.
///
/// Present columns must be numeric and free of nulls.
pub fn align(frame: &DataFrame, expected: &[String]) -> Result<AlignedFeatures> {
    let n_rows = frame.height();
    let mut values = Array2::<f64>::zeros((n_rows, expected.len()));
    let mut filled = Vec::new();

    for (j, name) in expected.iter().enumerate() {
        let column = match frame.column(name) {
            Ok(column) => column,
            Err(_) => {
                filled.push(name.clone());
                continue;
            }
        };

        if !is_numeric_dtype(column.dtype()) {
            return Err(StaywiseError::EncodingError(format!(
                "column '{}' is {} after encoding, expected a number",
                name,
                column.dtype()
            )));
        }

        let casted = column.as_materialized_series().cast(&DataType::Float64)?;
        let ca = casted.f64()?;
        for (i, value) in ca.into_iter().enumerate() {
            values[[i, j]] = value.ok_or_else(|| {
                StaywiseError::EncodingError(format!("column '{}' is empty in row {}", name, i))
            })?;
        }
    }

    let known: HashSet<&str> = expected.iter().map(|s| s.as_str()).collect();
    let dropped: Vec<String> = frame
        .get_column_names()
        .into_iter()
        .filter(|name| !known.contains(name.as_str()))
        .map(|name| name.to_string())
        .collect();

    if !filled.is_empty() || !dropped.is_empty() {
        tracing::debug!(
            filled = ?filled,
            dropped = ?dropped,
            "Reindexed features to the frozen column order"
        );
    }

    Ok(AlignedFeatures {
        columns: expected.to_vec(),
        values,
        filled,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected() -> Vec<String> {
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    }

    #[test]
    fn test_reorders_to_expected() {
        let df = DataFrame::new(vec![
            Series::new("c".into(), &[3.0]).into(),
            Series::new("a".into(), &[1i64]).into(),
            Series::new("b".into(), &[2i32]).into(),
        ])
        .unwrap();
        let aligned = align(&df, &expected()).unwrap();
        assert_eq!(aligned.columns(), expected().as_slice());
        assert_eq!(aligned.row(0).to_vec(), vec![1.0, 2.0, 3.0]);
        assert!(aligned.filled().is_empty());
    }

    #[test]
    fn test_missing_filled_and_extra_dropped() {
        let df = DataFrame::new(vec![
            Series::new("a".into(), &[1.0]).into(),
            Series::new("zzz".into(), &[9.0]).into(),
        ])
        .unwrap();
        let aligned = align(&df, &expected()).unwrap();
        assert_eq!(aligned.row(0).to_vec(), vec![1.0, 0.0, 0.0]);
        assert_eq!(aligned.filled(), &["b".to_string(), "c".to_string()]);
        assert_eq!(aligned.dropped(), &["zzz".to_string()]);
    }

    #[test]
    fn test_text_column_rejected() {
        let df = DataFrame::new(vec![Series::new("a".into(), &["x"]).into()]).unwrap();
        assert!(align(&df, &expected()).unwrap_err().is_encoding());
    }

    #[test]
    fn test_null_rejected() {
        let df = DataFrame::new(vec![Series::new("a".into(), &[Some(1.0), None]).into()]).unwrap();
        assert!(align(&df, &expected()).is_err());
    }

    #[test]
    fn test_named_row() {
        let df = DataFrame::new(vec![Series::new("b".into(), &[5.0]).into()]).unwrap();
        let aligned = align(&df, &expected()).unwrap();
        assert_eq!(aligned.named_row(0)[1], ("b".to_string(), 5.0));
    }
}
