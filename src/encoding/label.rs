//! Label encoding of binary flag fields

use crate::error::{Result, StaywiseError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Fitted label encoder for one field
///
/// Maps each class label to its index in `classes`. Flags are fitted with
/// classes `["0", "1"]`, so `"0"` becomes 0 and `"1"` becomes 1. Integer
/// input is compared through its decimal string form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub field: String,
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(field: impl Into<String>, classes: &[&str]) -> Self {
        Self {
            field: field.into(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Encoder for a 0/1 flag
    pub fn binary(field: impl Into<String>) -> Self {
        Self::new(field, &["0", "1"])
    }

    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(StaywiseError::ConfigError(format!(
                "label encoder for '{}' has no classes",
                self.field
            )));
        }
        Ok(())
    }

    /// Encode this encoder's field of `df` into an Int64 column of the same name
    pub fn transform(&self, df: &DataFrame) -> Result<Column> {
        let column = df
            .column(&self.field)
            .map_err(|_| StaywiseError::MissingColumn(self.field.clone()))?;
        let labels = column
            .as_materialized_series()
            .cast(&DataType::String)
            .map_err(|e| {
                StaywiseError::EncodingError(format!("field '{}' cannot be read as labels: {}", self.field, e))
            })?;
        let ca = labels.str()?;

        let mut codes = Vec::with_capacity(ca.len());
        for (row, value) in ca.into_iter().enumerate() {
            let value = value.ok_or_else(|| {
                StaywiseError::EncodingError(format!("field '{}' is empty in row {}", self.field, row))
            })?;
            let code = self
                .classes
                .iter()
                .position(|c| c == value)
                .ok_or_else(|| StaywiseError::UnknownCategory {
                    field: self.field.clone(),
                    value: value.to_string(),
                })?;
            codes.push(code as i64);
        }

        Ok(Series::new(self.field.as_str().into(), codes).into())
    }
}
