//! Application configuration

use crate::encoding::UnknownCategoryPolicy;
use crate::error::{Result, StaywiseError};
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_MODEL_PATH: &str = "artifacts/model.json";
pub const DEFAULT_ENCODER_PATH: &str = "artifacts/encoder.json";
pub const DEFAULT_DATASET_PATH: &str = "data/hotel_reservations_sample.csv";

/// Rows shown by the dataset preview when none are requested
pub const DEFAULT_PREVIEW_ROWS: usize = 10;
/// Upper bound on preview rows
pub const MAX_PREVIEW_ROWS: usize = 100;

/// Runtime configuration shared by the server and the CLI
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub encoder_path: PathBuf,
    /// Reference table for the preview; `None` disables it
    pub dataset_path: Option<PathBuf>,
    /// Overrides the policy stored in the encoder artifact
    pub unknown_category_policy: Option<UnknownCategoryPolicy>,
    pub preview_rows: usize,
    /// Environment values that could not be parsed, reported by `validate`
    rejected_env: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from environment-style key lookups
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut rejected_env = Vec::new();

        let port: u16 = match lookup("API_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Ignoring invalid API_PORT");
                rejected_env.push(format!("API_PORT: '{}' is not a port number", raw));
                8080
            }),
            None => 8080,
        };

        let unknown_category_policy = match lookup("UNKNOWN_CATEGORY_POLICY") {
            Some(raw) => match raw.parse::<UnknownCategoryPolicy>() {
                Ok(policy) => Some(policy),
                Err(e) => {
                    warn!(value = %raw, "Ignoring invalid UNKNOWN_CATEGORY_POLICY");
                    rejected_env.push(format!("UNKNOWN_CATEGORY_POLICY: {}", e));
                    None
                }
            },
            None => None,
        };

        Self {
            host: lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            model_path: lookup("MODEL_PATH")
                .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string())
                .into(),
            encoder_path: lookup("ENCODER_PATH")
                .unwrap_or_else(|| DEFAULT_ENCODER_PATH.to_string())
                .into(),
            dataset_path: match lookup("DATASET_PATH") {
                Some(path) if path.is_empty() => None,
                Some(path) => Some(path.into()),
                None => Some(DEFAULT_DATASET_PATH.into()),
            },
            unknown_category_policy,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            rejected_env,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self.rejected_env.retain(|e| !e.starts_with("API_PORT"));
        self
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_encoder_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.encoder_path = path.into();
        self
    }

    pub fn with_dataset_path(mut self, path: Option<PathBuf>) -> Self {
        self.dataset_path = path;
        self
    }

    pub fn with_unknown_category_policy(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.unknown_category_policy = Some(policy);
        self.rejected_env.retain(|e| !e.starts_with("UNKNOWN_CATEGORY_POLICY"));
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.rejected_env.is_empty() {
            return Err(StaywiseError::ConfigError(format!(
                "invalid environment: {}",
                self.rejected_env.join("; ")
            )));
        }
        if self.host.trim().is_empty() {
            return Err(StaywiseError::ConfigError("host must not be empty".to_string()));
        }
        if self.preview_rows == 0 || self.preview_rows > MAX_PREVIEW_ROWS {
            return Err(StaywiseError::ConfigError(format!(
                "preview_rows must be within 1..={}, got {}",
                MAX_PREVIEW_ROWS, self.preview_rows
            )));
        }
        if self.model_path.as_os_str().is_empty() || self.encoder_path.as_os_str().is_empty() {
            return Err(StaywiseError::ConfigError(
                "model and encoder paths must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = AppConfig::new()
            .with_host("0.0.0.0")
            .with_port(9000)
            .with_model_path("m.json")
            .with_unknown_category_policy(UnknownCategoryPolicy::ZeroFill)
            .with_dataset_path(None);
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.model_path, PathBuf::from("m.json"));
        assert_eq!(config.unknown_category_policy, Some(UnknownCategoryPolicy::ZeroFill));
        assert!(config.dataset_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_preview_rows() {
        assert!(AppConfig::new().with_preview_rows(0).validate().is_err());
        assert!(AppConfig::new().with_preview_rows(101).validate().is_err());
        assert!(AppConfig::new().with_preview_rows(100).validate().is_ok());
    }

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = AppConfig::from_lookup(env(&[
            ("API_PORT", "9100"),
            ("UNKNOWN_CATEGORY_POLICY", "zero_fill"),
            ("DATASET_PATH", ""),
        ]));
        assert_eq!(config.port, 9100);
        assert_eq!(config.unknown_category_policy, Some(UnknownCategoryPolicy::ZeroFill));
        assert!(config.dataset_path.is_none());
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_policy_surfaces_in_validate() {
        let config = AppConfig::from_lookup(env(&[("UNKNOWN_CATEGORY_POLICY", "zerofill")]));
        assert_eq!(config.unknown_category_policy, None);

        let err = config.validate().unwrap_err();
        assert!(matches!(err, StaywiseError::ConfigError(_)));
        assert!(err.to_string().contains("UNKNOWN_CATEGORY_POLICY"));
        assert!(err.to_string().contains("zerofill"));

        let config = config.with_unknown_category_policy(UnknownCategoryPolicy::Reject);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port_surfaces_in_validate() {
        let config = AppConfig::from_lookup(env(&[("API_PORT", "eighty")]));
        assert_eq!(config.port, 8080);
        assert!(config.validate().unwrap_err().to_string().contains("API_PORT"));
        assert!(config.with_port(8081).validate().is_ok());
    }
}
