//! staywise - Hotel booking cancellation prediction
//!
//! This crate turns a hotel booking entered by a user into the feature
//! vector a pre-fitted classifier expects, and runs the classifier:
//! - Raw booking records and their fixed vocabularies
//! - One-hot / label encoding and alignment to the frozen column order
//! - Artifact-backed classifiers (random forest, logistic regression)
//! - A predictor loaded once and shared by the server and the CLI
//!
//! # Modules
//!
//! ## Core
//! - [`booking`] - Booking record, field names and vocabularies
//! - [`encoding`] - Feature encoding and alignment pipeline
//! - [`model`] - Classifier seam and inference-only models
//! - [`artifacts`] - Loading and checking fitted artifacts
//! - [`inference`] - Cancellation predictor and prediction service
//!
//! ## Data
//! - [`dataset`] - Reference table loading and preview
//! - [`samples`] - Built-in sample bookings
//!
//! ## Services
//! - [`server`] - Booking form and JSON API
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Core
pub mod booking;
pub mod encoding;
pub mod model;
pub mod artifacts;
pub mod inference;

// Configuration
pub mod config;

// Data
pub mod dataset;
pub mod samples;

// Services
pub mod server;
pub mod cli;

pub use error::{Result, StaywiseError};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{Result, StaywiseError};

    // Booking data
    pub use crate::booking::{records_to_frame, BookingRecord};

    // Encoding
    pub use crate::encoding::{
        align, AlignedFeatures, EncodingScheme, FeaturePipeline, LabelEncoder, OneHotEncoder,
        UnknownCategoryPolicy,
    };

    // Models
    pub use crate::model::{Classifier, ClassifierArtifact, LogisticClassifier, RandomForestClassifier};

    // Artifacts
    pub use crate::artifacts::{ArtifactBundle, EncoderArtifact, ModelArtifact};

    // Inference
    pub use crate::inference::{
        CancellationLabel, CancellationPredictor, PredictionOutcome, PredictionService, Verdict,
    };

    // Configuration
    pub use crate::config::AppConfig;
}
