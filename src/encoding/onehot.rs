//! One-hot encoding of categorical booking fields

use crate::error::{Result, StaywiseError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// What to do with a category the encoder was not fitted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategoryPolicy {
    /// Fail the submission with an encoding error
    #[default]
    Reject,
    /// Emit an all-zero indicator group
    ZeroFill,
}

impl fmt::Display for UnknownCategoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownCategoryPolicy::Reject => write!(f, "reject"),
            UnknownCategoryPolicy::ZeroFill => write!(f, "zero_fill"),
        }
    }
}

impl FromStr for UnknownCategoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" | "error" => Ok(UnknownCategoryPolicy::Reject),
            "zero_fill" | "zero-fill" | "ignore" => Ok(UnknownCategoryPolicy::ZeroFill),
            other => Err(format!(
                "unknown category policy '{}', expected 'reject' or 'zero_fill'",
                other
            )),
        }
    }
}

/// Ordered categories of one categorical field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub field: String,
    pub categories: Vec<String>,
}

impl CategoryGroup {
    pub fn new(field: impl Into<String>, categories: &[&str]) -> Self {
        Self {
            field: field.into(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Indicator column names, `<field>_<category>`
    pub fn column_names(&self) -> impl Iterator<Item = String> + '_ {
        self.categories.iter().map(move |c| format!("{}_{}", self.field, c))
    }
}

/// Fitted one-hot encoder
///
/// Each group produces one `f64` indicator column per category, in the
/// category order fixed at fit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    groups: Vec<CategoryGroup>,
    #[serde(default)]
    handle_unknown: UnknownCategoryPolicy,
}

impl OneHotEncoder {
    /// Create an encoder from already fitted category groups
    pub fn new(groups: Vec<CategoryGroup>) -> Self {
        Self {
            groups,
            handle_unknown: UnknownCategoryPolicy::default(),
        }
    }

    /// Builder method to set the unknown-category policy
    pub fn with_unknown_policy(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.handle_unknown = policy;
        self
    }

    pub fn unknown_policy(&self) -> UnknownCategoryPolicy {
        self.handle_unknown
    }

    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    /// Fields this encoder consumes
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.field.as_str())
    }

    /// Output column names in emission order
    pub fn feature_names(&self) -> Vec<String> {
        self.groups.iter().flat_map(|g| g.column_names()).collect()
    }

    /// Reject empty groups, duplicate fields and duplicate categories
    pub fn validate(&self) -> Result<()> {
        let mut seen_fields = HashSet::new();
        for group in &self.groups {
            if !seen_fields.insert(group.field.as_str()) {
                return Err(StaywiseError::ConfigError(format!(
                    "field '{}' appears in more than one category group",
                    group.field
                )));
            }
            if group.categories.is_empty() {
                return Err(StaywiseError::ConfigError(format!(
                    "category group '{}' is empty",
                    group.field
                )));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = group.categories.iter().find(|c| !seen.insert(c.as_str())) {
                return Err(StaywiseError::ConfigError(format!(
                    "category '{}' is listed twice for field '{}'",
                    dup, group.field
                )));
            }
        }
        Ok(())
    }

    /// Expand every fitted field of `df` into its indicator columns.
    ///
    /// Only the indicator columns are returned. A fitted field missing from
    /// `df` is a schema mismatch and fails the whole transform.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let n_rows = df.height();
        let mut columns: Vec<Column> = Vec::with_capacity(self.feature_names().len());

        for group in &self.groups {
            let column = df
                .column(&group.field)
                .map_err(|_| StaywiseError::MissingColumn(group.field.clone()))?;
            let series = column.as_materialized_series();
            let ca = series.str().map_err(|_| {
                StaywiseError::EncodingError(format!(
                    "field '{}' must hold text categories, got {}",
                    group.field,
                    series.dtype()
                ))
            })?;

            let mut indicators = vec![vec![0.0_f64; n_rows]; group.categories.len()];
            for (row, value) in ca.into_iter().enumerate() {
                let value = value.ok_or_else(|| {
                    StaywiseError::EncodingError(format!(
                        "field '{}' is empty in row {}",
                        group.field, row
                    ))
                })?;

                match group.categories.iter().position(|c| c == value) {
                    Some(idx) => indicators[idx][row] = 1.0,
                    None => match self.handle_unknown {
                        UnknownCategoryPolicy::Reject => {
                            return Err(StaywiseError::UnknownCategory {
                                field: group.field.clone(),
                                value: value.to_string(),
                            });
                        }
                        UnknownCategoryPolicy::ZeroFill => {
                            tracing::debug!(
                                field = %group.field,
                                value = %value,
                                "Unknown category encoded as all-zero group"
                            );
                        }
                    },
                }
            }

            for (name, values) in group.column_names().zip(indicators) {
                columns.push(Series::new(name.into(), values).into());
            }
        }

        Ok(DataFrame::new(columns)?)
    }
}
