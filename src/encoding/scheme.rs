//! Encoding schemes selected at artifact load time

use super::{LabelEncoder, OneHotEncoder, UnknownCategoryPolicy};
use crate::error::{Result, StaywiseError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How raw categorical and flag fields become numeric columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EncodingScheme {
    /// One encoder over the categorical fields; flags pass through as numbers
    Combined(OneHotEncoder),
    /// One-hot encoder for categorical fields plus label encoders for flags
    Split {
        onehot: OneHotEncoder,
        binary: Vec<LabelEncoder>,
    },
}

impl EncodingScheme {
    pub fn kind(&self) -> &'static str {
        match self {
            EncodingScheme::Combined(_) => "combined",
            EncodingScheme::Split { .. } => "split",
        }
    }

    pub fn onehot(&self) -> &OneHotEncoder {
        match self {
            EncodingScheme::Combined(onehot) | EncodingScheme::Split { onehot, .. } => onehot,
        }
    }

    pub fn unknown_policy(&self) -> UnknownCategoryPolicy {
        self.onehot().unknown_policy()
    }

    /// Replace the unknown-category policy of the one-hot stage
    pub fn with_unknown_policy(self, policy: UnknownCategoryPolicy) -> Self {
        match self {
            EncodingScheme::Combined(onehot) => EncodingScheme::Combined(onehot.with_unknown_policy(policy)),
            EncodingScheme::Split { onehot, binary } => EncodingScheme::Split {
                onehot: onehot.with_unknown_policy(policy),
                binary,
            },
        }
    }

    /// Fields expanded into indicator columns
    pub fn categorical_fields(&self) -> Vec<&str> {
        self.onehot().fields().collect()
    }

    /// Fields label-encoded in place
    pub fn label_fields(&self) -> Vec<&str> {
        match self {
            EncodingScheme::Combined(_) => Vec::new(),
            EncodingScheme::Split { binary, .. } => binary.iter().map(|b| b.field.as_str()).collect(),
        }
    }

    /// Raw fields replaced by the output of [`EncodingScheme::transform`]
    pub fn consumed_fields(&self) -> HashSet<&str> {
        self.categorical_fields()
            .into_iter()
            .chain(self.label_fields())
            .collect()
    }

    /// Names of the columns produced by [`EncodingScheme::transform`], in order
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.label_fields().into_iter().map(String::from).collect();
        names.extend(self.onehot().feature_names());
        names
    }

    pub fn validate(&self) -> Result<()> {
        self.onehot().validate()?;
        if let EncodingScheme::Split { binary, .. } = self {
            let categorical: HashSet<&str> = self.onehot().fields().collect();
            for encoder in binary {
                encoder.validate()?;
                if categorical.contains(encoder.field.as_str()) {
                    return Err(StaywiseError::ConfigError(format!(
                        "field '{}' is both one-hot and label encoded",
                        encoder.field
                    )));
                }
            }
        }
        Ok(())
    }

    /// Encode the raw table, returning only the encoded columns
    pub fn transform(&self, raw: &DataFrame) -> Result<DataFrame> {
        let indicators = self.onehot().transform(raw)?;

        match self {
            EncodingScheme::Combined(_) => Ok(indicators),
            EncodingScheme::Split { binary, .. } => {
                let mut columns: Vec<Column> = binary
                    .iter()
                    .map(|encoder| encoder.transform(raw))
                    .collect::<Result<_>>()?;
                columns.extend(indicators.get_columns().iter().cloned());
                Ok(DataFrame::new(columns)?)
            }
        }
    }
}
