//! Ready/disabled prediction service

use super::CancellationPredictor;
use crate::config::AppConfig;
use crate::error::{Result, StaywiseError};
use std::sync::Arc;
use tracing::warn;

/// Prediction capability of a running server.
///
/// Artifact load failures do not stop the server; they leave it in the
/// `Disabled` state, which reports the reason on every prediction attempt.
#[derive(Debug, Clone)]
pub enum PredictionService {
    Ready(Arc<CancellationPredictor>),
    Disabled { reason: String },
}

impl PredictionService {
    pub fn from_config(config: &AppConfig) -> Self {
        match CancellationPredictor::load(config) {
            Ok(predictor) => PredictionService::Ready(Arc::new(predictor)),
            Err(e) => {
                warn!(
                    model = %config.model_path.display(),
                    encoder = %config.encoder_path.display(),
                    error = %e,
                    "Artifacts failed to load, prediction disabled"
                );
                PredictionService::Disabled { reason: e.to_string() }
            }
        }
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        PredictionService::Disabled { reason: reason.into() }
    }

    pub fn predictor(&self) -> Result<&Arc<CancellationPredictor>> {
        match self {
            PredictionService::Ready(predictor) => Ok(predictor),
            PredictionService::Disabled { reason } => Err(StaywiseError::PredictionDisabled(reason.clone())),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, PredictionService::Ready(_))
    }

    pub fn disabled_reason(&self) -> Option<&str> {
        match self {
            PredictionService::Ready(_) => None,
            PredictionService::Disabled { reason } => Some(reason),
        }
    }
}

impl From<Arc<CancellationPredictor>> for PredictionService {
    fn from(predictor: Arc<CancellationPredictor>) -> Self {
        PredictionService::Ready(predictor)
    }
}
