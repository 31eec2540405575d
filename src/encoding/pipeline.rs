//! Raw booking → aligned feature matrix

use super::{align, AlignedFeatures, EncodingScheme, UnknownCategoryPolicy};
use crate::booking::{validate_frame, BookingRecord};
use crate::error::{Result, StaywiseError};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

/// Description of the frozen encoding, for display and diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct SchemaReport {
    pub scheme: &'static str,
    pub unknown_category_policy: UnknownCategoryPolicy,
    pub categorical_fields: Vec<String>,
    pub label_fields: Vec<String>,
    pub expected_columns: Vec<String>,
}

/// Encoding scheme plus the column order the classifier was fitted on
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    scheme: EncodingScheme,
    expected_columns: Vec<String>,
}

impl FeaturePipeline {
    /// Build a pipeline, checking the scheme against the expected columns.
    ///
    /// Every column the scheme emits must be part of the frozen order,
    /// otherwise the artifacts were fitted apart from each other.
    pub fn new(scheme: EncodingScheme, expected_columns: Vec<String>) -> Result<Self> {
        scheme.validate()?;

        if expected_columns.is_empty() {
            return Err(StaywiseError::ConfigError("expected column list is empty".to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = expected_columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(StaywiseError::ConfigError(format!(
                "expected column '{}' is listed twice",
                dup
            )));
        }
        if let Some(stray) = scheme
            .feature_names()
            .into_iter()
            .find(|name| !seen.contains(name.as_str()))
        {
            return Err(StaywiseError::ConfigError(format!(
                "encoder emits column '{}' which is not in the expected column list",
                stray
            )));
        }

        Ok(Self {
            scheme,
            expected_columns,
        })
    }

    pub fn scheme(&self) -> &EncodingScheme {
        &self.scheme
    }

    pub fn expected_columns(&self) -> &[String] {
        &self.expected_columns
    }

    pub fn n_features(&self) -> usize {
        self.expected_columns.len()
    }

    /// Override the unknown-category policy stored in the encoder artifact
    pub fn with_unknown_policy(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.scheme = self.scheme.with_unknown_policy(policy);
        self
    }

    /// Validate and encode one booking
    pub fn encode(&self, record: &BookingRecord) -> Result<AlignedFeatures> {
        record.validate()?;
        let raw = record.to_frame()?;
        self.encode_frame(&raw)
    }

    /// Encode a raw table of any height.
    ///
    /// Rows are range-checked like single records. Columns the scheme does
    /// not consume pass through unchanged; the result is then reindexed to
    /// the expected order.
    pub fn encode_frame(&self, raw: &DataFrame) -> Result<AlignedFeatures> {
        validate_frame(raw)?;
        let encoded = self.scheme.transform(raw)?;
        let consumed = self.scheme.consumed_fields();

        let mut columns: Vec<Column> = raw
            .get_columns()
            .iter()
            .filter(|c| !consumed.contains(c.name().as_str()))
            .cloned()
            .collect();
        columns.extend(encoded.get_columns().iter().cloned());

        let combined = DataFrame::new(columns)
            .map_err(|e| StaywiseError::EncodingError(format!("cannot assemble encoded table: {}", e)))?;
        align(&combined, &self.expected_columns)
    }

    pub fn schema_report(&self) -> SchemaReport {
        SchemaReport {
            scheme: self.scheme.kind(),
            unknown_category_policy: self.scheme.unknown_policy(),
            categorical_fields: self.scheme.categorical_fields().into_iter().map(String::from).collect(),
            label_fields: self.scheme.label_fields().into_iter().map(String::from).collect(),
            expected_columns: self.expected_columns.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::frozen_columns;
    use crate::encoding::{standard_onehot, standard_scheme, LabelEncoder};

    fn pipeline() -> FeaturePipeline {
        FeaturePipeline::new(standard_scheme(), frozen_columns()).unwrap()
    }

    #[test]
    fn test_encode_default_record() {
        let aligned = pipeline().encode(&BookingRecord::default()).unwrap();
        assert_eq!(aligned.n_rows(), 1);
        assert_eq!(aligned.columns(), frozen_columns().as_slice());
        assert!(aligned.filled().is_empty());
        assert!(aligned.dropped().is_empty());
    }

    #[test]
    fn test_invalid_record_rejected_before_encoding() {
        let record = BookingRecord {
            required_car_parking_space: 3,
            ..Default::default()
        };
        assert!(matches!(
            pipeline().encode(&record),
            Err(StaywiseError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_stray_encoder_column_rejected() {
        let columns: Vec<String> = frozen_columns().into_iter().take(11).collect();
        assert!(FeaturePipeline::new(standard_scheme(), columns).is_err());
    }

    #[test]
    fn test_duplicate_expected_column_rejected() {
        let mut columns = frozen_columns();
        columns.push("lead_time".to_string());
        assert!(FeaturePipeline::new(standard_scheme(), columns).is_err());
    }

    #[test]
    fn test_schema_report() {
        let split = EncodingScheme::Split {
            onehot: standard_onehot(),
            binary: vec![LabelEncoder::binary("repeated_guest")],
        };
        let report = FeaturePipeline::new(split, frozen_columns()).unwrap().schema_report();
        assert_eq!(report.scheme, "split");
        assert_eq!(report.label_fields, vec!["repeated_guest".to_string()]);
        assert_eq!(report.categorical_fields.len(), 3);
        assert_eq!(report.expected_columns.len(), 27);
    }
}
