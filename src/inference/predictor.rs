//! Booking cancellation predictor

use super::stats::{InferenceStats, StatsSnapshot};
use crate::artifacts::{ArtifactBundle, ArtifactInfo};
use crate::booking::BookingRecord;
use crate::config::AppConfig;
use crate::encoding::{AlignedFeatures, FeaturePipeline, UnknownCategoryPolicy};
use crate::error::{Result, StaywiseError};
use crate::model::Classifier;
use ndarray::Array1;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Class value the classifier uses for a cancelled booking
pub const CANCELLED_CLASS: f64 = 1.0;

/// Predicted booking outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationLabel {
    NotCancelled,
    Cancelled,
}

impl CancellationLabel {
    pub fn from_class(class: f64) -> Self {
        if class == CANCELLED_CLASS {
            CancellationLabel::Cancelled
        } else {
            CancellationLabel::NotCancelled
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CancellationLabel::Cancelled)
    }
}

impl fmt::Display for CancellationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancellationLabel::NotCancelled => write!(f, "not cancelled"),
            CancellationLabel::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Label and cancellation probability of one row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub label: CancellationLabel,
    /// Probability of cancellation, when the classifier provides one
    pub probability: Option<f64>,
}

/// Result of predicting a single booking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    pub label: CancellationLabel,
    pub probability: Option<f64>,
    /// The raw record the prediction was made from
    pub record: BookingRecord,
    /// Aligned feature vector handed to the classifier
    pub features: Vec<(String, f64)>,
}

/// Encoder pipeline and classifier, loaded once and shared read-only
pub struct CancellationPredictor {
    pipeline: FeaturePipeline,
    classifier: Box<dyn Classifier>,
    cancelled_index: usize,
    info: Option<ArtifactInfo>,
    stats: InferenceStats,
}

impl fmt::Debug for CancellationPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationPredictor")
            .field("scheme", &self.pipeline.scheme().kind())
            .field("n_features", &self.pipeline.n_features())
            .field("classes", &self.classifier.classes())
            .field("info", &self.info)
            .finish()
    }
}

impl CancellationPredictor {
    pub fn new(pipeline: FeaturePipeline, classifier: Box<dyn Classifier>) -> Result<Self> {
        if classifier.n_features() != pipeline.n_features() {
            return Err(StaywiseError::ShapeError {
                expected: format!("{} features from the encoder", classifier.n_features()),
                actual: format!("{} features", pipeline.n_features()),
            });
        }
        let cancelled_index = classifier
            .classes()
            .iter()
            .position(|c| *c == CANCELLED_CLASS)
            .ok_or_else(|| {
                StaywiseError::ConfigError(format!(
                    "classifier classes {:?} do not include the cancelled class {}",
                    classifier.classes(),
                    CANCELLED_CLASS
                ))
            })?;

        Ok(Self {
            pipeline,
            classifier,
            cancelled_index,
            info: None,
            stats: InferenceStats::new(),
        })
    }

    /// Build from checked artifacts, optionally overriding the unknown-category policy
    pub fn from_bundle(bundle: ArtifactBundle, policy: Option<UnknownCategoryPolicy>) -> Result<Self> {
        let ArtifactBundle { model, pipeline, info } = bundle;
        let pipeline = match policy {
            Some(policy) => pipeline.with_unknown_policy(policy),
            None => pipeline,
        };
        let mut predictor = Self::new(pipeline, Box::new(model.classifier))?;
        predictor.info = Some(info);
        Ok(predictor)
    }

    /// Load the artifacts named by `config`
    pub fn load(config: &AppConfig) -> Result<Self> {
        let bundle = ArtifactBundle::load(&config.model_path, &config.encoder_path)?;
        let predictor = Self::from_bundle(bundle, config.unknown_category_policy)?;
        info!(
            unknown_categories = %predictor.pipeline.scheme().unknown_policy(),
            "Prediction service ready"
        );
        Ok(predictor)
    }

    pub fn pipeline(&self) -> &FeaturePipeline {
        &self.pipeline
    }

    pub fn info(&self) -> Option<&ArtifactInfo> {
        self.info.as_ref()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Encode one booking and classify it
    pub fn predict(&self, record: &BookingRecord) -> Result<PredictionOutcome> {
        let start = Instant::now();
        let result = self
            .pipeline
            .encode(record)
            .and_then(|features| self.classify(&features).map(|verdicts| (features, verdicts)));

        match result {
            Ok((features, verdicts)) => {
                self.stats.record_success(1, start.elapsed());
                let Verdict { label, probability } = verdicts[0];
                debug!(
                    label = %label,
                    probability = ?probability,
                    latency_us = start.elapsed().as_micros() as u64,
                    "Prediction complete"
                );
                Ok(PredictionOutcome {
                    label,
                    probability,
                    record: record.clone(),
                    features: features.named_row(0),
                })
            }
            Err(e) => {
                self.stats.record_failure();
                warn!(error = %e, "Prediction failed");
                Err(e)
            }
        }
    }

    /// Encode and classify every row of a raw booking table
    pub fn predict_frame(&self, raw: &DataFrame) -> Result<Vec<Verdict>> {
        let start = Instant::now();
        let result = self
            .pipeline
            .encode_frame(raw)
            .and_then(|features| self.classify(&features));

        match &result {
            Ok(verdicts) => {
                self.stats.record_success(verdicts.len(), start.elapsed());
                info!(rows = verdicts.len(), "Batch prediction complete");
            }
            Err(e) => {
                self.stats.record_failure();
                warn!(error = %e, rows = raw.height(), "Batch prediction failed");
            }
        }
        result
    }

    fn classify(&self, features: &AlignedFeatures) -> Result<Vec<Verdict>> {
        let x = features.values();
        let labels: Array1<f64> = self
            .classifier
            .predict(x)
            .map_err(into_prediction_error)?;

        let probabilities: Option<Vec<f64>> = match self.classifier.predict_proba(x) {
            Ok(proba) => Some(proba.column(self.cancelled_index).to_vec()),
            Err(StaywiseError::ProbabilityUnsupported) => None,
            Err(e) => return Err(into_prediction_error(e)),
        };

        Ok(labels
            .iter()
            .enumerate()
            .map(|(i, &class)| Verdict {
                label: CancellationLabel::from_class(class),
                probability: probabilities.as_ref().map(|p| p[i]),
            })
            .collect())
    }
}

fn into_prediction_error(err: StaywiseError) -> StaywiseError {
    match err {
        StaywiseError::PredictionError(_) => err,
        other => StaywiseError::PredictionError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::frozen_columns;
    use crate::encoding::standard_scheme;
    use crate::model::LogisticClassifier;
    use ndarray::Array2;

    fn pipeline() -> FeaturePipeline {
        FeaturePipeline::new(standard_scheme(), frozen_columns()).unwrap()
    }

    /// Cancels when lead_time exceeds 100 days
    fn lead_time_model() -> LogisticClassifier {
        let mut coefficients = vec![0.0; 27];
        coefficients[0] = 0.1;
        LogisticClassifier::new(coefficients, -10.0).unwrap()
    }

    struct Broken;

    impl Classifier for Broken {
        fn n_features(&self) -> usize {
            27
        }

        fn classes(&self) -> &[f64] {
            &[0.0, 1.0]
        }

        fn predict(&self, _x: &Array2<f64>) -> Result<Array1<f64>> {
            Err(StaywiseError::PredictionError("model exploded".to_string()))
        }
    }

    #[test]
    fn test_predict_label_and_probability() {
        let predictor = CancellationPredictor::new(pipeline(), Box::new(lead_time_model())).unwrap();

        let kept = predictor.predict(&BookingRecord::default()).unwrap();
        assert_eq!(kept.label, CancellationLabel::NotCancelled);
        assert!(kept.probability.unwrap() < 0.01);
        assert_eq!(kept.features.len(), 27);

        let record = BookingRecord {
            lead_time: 300,
            ..Default::default()
        };
        let cancelled = predictor.predict(&record).unwrap();
        assert_eq!(cancelled.label, CancellationLabel::Cancelled);
        assert_eq!(cancelled.record, record);
        assert_eq!(predictor.stats().total_predictions, 2);
    }

    #[test]
    fn test_unknown_category_counts_as_failure() {
        let predictor = CancellationPredictor::new(pipeline(), Box::new(lead_time_model())).unwrap();
        let record = BookingRecord {
            market_segment_type: "Walk-in".to_string(),
            ..Default::default()
        };
        let err = predictor.predict(&record).unwrap_err();
        assert!(err.is_encoding());
        assert_eq!(predictor.stats().failed_predictions, 1);
    }

    #[test]
    fn test_classifier_failure_is_prediction_error() {
        let predictor = CancellationPredictor::new(pipeline(), Box::new(Broken)).unwrap();
        let err = predictor.predict(&BookingRecord::default()).unwrap_err();
        assert!(matches!(err, StaywiseError::PredictionError(_)));
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let model = LogisticClassifier::new(vec![0.0; 5], 0.0).unwrap();
        assert!(CancellationPredictor::new(pipeline(), Box::new(model)).is_err());
    }

    #[test]
    fn test_predict_frame() {
        let predictor = CancellationPredictor::new(pipeline(), Box::new(lead_time_model())).unwrap();
        let records = vec![
            BookingRecord::default(),
            BookingRecord {
                lead_time: 250,
                ..Default::default()
            },
        ];
        let raw = crate::booking::records_to_frame(&records).unwrap();
        let verdicts = predictor.predict_frame(&raw).unwrap();
        assert_eq!(verdicts.len(), 2);
        assert!(!verdicts[0].label.is_cancelled());
        assert!(verdicts[1].label.is_cancelled());
        assert_eq!(predictor.stats().total_rows, 2);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(CancellationLabel::Cancelled.to_string(), "cancelled");
        assert_eq!(CancellationLabel::NotCancelled.to_string(), "not cancelled");
        assert_eq!(
            serde_json::to_value(CancellationLabel::NotCancelled).unwrap(),
            "not_cancelled"
        );
    }
}
