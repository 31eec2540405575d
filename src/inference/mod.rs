//! Inference module
//!
//! Provides booking cancellation prediction with:
//! - A predictor built once from the fitted encoder and classifier
//! - Single-record and batch (table) prediction
//! - Cancellation probability when the classifier supports it
//! - Lock-free prediction counters
//! - A ready/disabled service wrapper for servers

mod predictor;
mod service;
mod stats;

pub use predictor::{CancellationLabel, CancellationPredictor, PredictionOutcome, Verdict, CANCELLED_CLASS};
pub use service::PredictionService;
pub use stats::{InferenceStats, StatsSnapshot};
