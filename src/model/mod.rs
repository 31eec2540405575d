//! Pre-trained classifiers
//!
//! The predictor only sees the [`Classifier`] seam; artifacts pick the
//! concrete model through the tagged [`ClassifierArtifact`].

mod forest;
mod logistic;
mod tree;

pub use forest::RandomForestClassifier;
pub use logistic::LogisticClassifier;
pub use tree::{DecisionTree, TreeNode};

use crate::error::{Result, StaywiseError};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Inference capability of a fitted classifier
pub trait Classifier: Send + Sync {
    /// Width of the feature vector the model was fitted on
    fn n_features(&self) -> usize;

    /// Class labels, in the column order of `predict_proba`
    fn classes(&self) -> &[f64];

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    fn predict_proba(&self, _x: &Array2<f64>) -> Result<Array2<f64>> {
        Err(StaywiseError::ProbabilityUnsupported)
    }
}

pub(crate) fn check_width(x: &Array2<f64>, n_features: usize) -> Result<()> {
    if x.ncols() != n_features {
        return Err(StaywiseError::ShapeError {
            expected: format!("{} features", n_features),
            actual: format!("{} features", x.ncols()),
        });
    }
    Ok(())
}

/// Classifier as stored in the model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    RandomForest(RandomForestClassifier),
    Logistic(LogisticClassifier),
}

impl ClassifierArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierArtifact::RandomForest(_) => "random_forest",
            ClassifierArtifact::Logistic(_) => "logistic",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ClassifierArtifact::RandomForest(model) => model.validate(),
            ClassifierArtifact::Logistic(model) => model.validate(),
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            ClassifierArtifact::RandomForest(model) => model,
            ClassifierArtifact::Logistic(model) => model,
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn classes(&self) -> &[f64] {
        self.inner().classes()
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.inner().predict(x)
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.inner().predict_proba(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    struct LabelOnly;

    impl Classifier for LabelOnly {
        fn n_features(&self) -> usize {
            1
        }

        fn classes(&self) -> &[f64] {
            &[0.0, 1.0]
        }

        fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
            Ok(Array1::zeros(x.nrows()))
        }
    }

    #[test]
    fn test_default_proba_unsupported() {
        let err = LabelOnly.predict_proba(&array![[1.0]]).unwrap_err();
        assert!(matches!(err, StaywiseError::ProbabilityUnsupported));
    }

    #[test]
    fn test_artifact_tagging() {
        let artifact = ClassifierArtifact::Logistic(LogisticClassifier::new(vec![1.0, -1.0], 0.5).unwrap());
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["kind"], "logistic");
        assert_eq!(json["coefficients"][1], -1.0);

        let back: ClassifierArtifact = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), "logistic");
        assert_eq!(back.n_features(), 2);
    }

    #[test]
    fn test_forest_artifact_from_json() {
        let json = r#"{
            "kind": "random_forest",
            "n_features": 1,
            "classes": [0.0, 1.0],
            "trees": [
                {"root": {"Split": {"feature_idx": 0, "threshold": 1.0,
                    "left": {"Leaf": {"distribution": [1.0, 0.0]}},
                    "right": {"Leaf": {"distribution": [0.0, 1.0]}}}}}
            ]
        }"#;
        let artifact: ClassifierArtifact = serde_json::from_str(json).unwrap();
        artifact.validate().unwrap();
        assert_eq!(artifact.predict(&array![[0.5], [2.0]]).unwrap().to_vec(), vec![0.0, 1.0]);
    }
}
