//! Error types for the staywise prediction pipeline

use thiserror::Error;

/// Result type alias for staywise operations
pub type Result<T> = std::result::Result<T, StaywiseError>;

/// Main error type for the booking cancellation pipeline
#[derive(Error, Debug)]
pub enum StaywiseError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Encoding error: unknown category '{value}' for field '{field}'")]
    UnknownCategory { field: String, value: String },

    #[error("Encoding error: column '{0}' is missing from the input")]
    MissingColumn(String),

    #[error("Artifact error: {path}: {reason}")]
    ArtifactError { path: String, reason: String },

    #[error("Prediction error: {0}")]
    PredictionError(String),

    #[error("Classifier does not provide class probabilities")]
    ProbabilityUnsupported,

    #[error("Prediction is disabled: {0}")]
    PredictionDisabled(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl StaywiseError {
    /// Whether the error belongs to the feature encoding stage
    pub fn is_encoding(&self) -> bool {
        matches!(
            self,
            StaywiseError::EncodingError(_)
                | StaywiseError::UnknownCategory { .. }
                | StaywiseError::MissingColumn(_)
        )
    }

    pub(crate) fn artifact(path: impl AsRef<std::path::Path>, reason: impl Into<String>) -> Self {
        StaywiseError::ArtifactError {
            path: path.as_ref().display().to_string(),
            reason: reason.into(),
        }
    }
}

impl From<polars::error::PolarsError> for StaywiseError {
    fn from(err: polars::error::PolarsError) -> Self {
        StaywiseError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for StaywiseError {
    fn from(err: serde_json::Error) -> Self {
        StaywiseError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for StaywiseError {
    fn from(err: ndarray::ShapeError) -> Self {
        StaywiseError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StaywiseError::UnknownCategory {
            field: "room_type_reserved".to_string(),
            value: "Penthouse".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Encoding error: unknown category 'Penthouse' for field 'room_type_reserved'"
        );
        assert!(err.is_encoding());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StaywiseError = io_err.into();
        assert!(matches!(err, StaywiseError::IoError(_)));
        assert!(!err.is_encoding());
    }

    #[test]
    fn test_artifact_error_names_path() {
        let err = StaywiseError::artifact("artifacts/model.json", "unsupported format_version 7");
        assert_eq!(
            err.to_string(),
            "Artifact error: artifacts/model.json: unsupported format_version 7"
        );
    }
}
