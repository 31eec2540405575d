//! Binary logistic regression (inference only)

use super::{check_width, Classifier};
use crate::error::{Result, StaywiseError};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

const CLASSES: [f64; 2] = [0.0, 1.0];

/// Fitted logistic regression over the aligned feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default = "default_threshold")]
    threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl LogisticClassifier {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        let model = Self {
            coefficients,
            intercept,
            threshold: default_threshold(),
        };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(StaywiseError::ConfigError("logistic model has no coefficients".to_string()));
        }
        if self.coefficients.iter().chain([&self.intercept]).any(|w| !w.is_finite()) {
            return Err(StaywiseError::ConfigError(
                "logistic model weights must be finite".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(StaywiseError::ConfigError(format!(
                "decision threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    fn positive_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        check_width(x, self.coefficients.len())?;
        let weights = Array1::from_vec(self.coefficients.clone());
        Ok((x.dot(&weights) + self.intercept).mapv(sigmoid))
    }
}

impl Classifier for LogisticClassifier {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn classes(&self) -> &[f64] {
        &CLASSES
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        // p == threshold stays negative
        Ok(self
            .positive_proba(x)?
            .mapv(|p| if p > self.threshold { 1.0 } else { 0.0 }))
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let p = self.positive_proba(x)?;
        let mut proba = Array2::<f64>::zeros((p.len(), 2));
        for (i, &pi) in p.iter().enumerate() {
            proba[[i, 0]] = 1.0 - pi;
            proba[[i, 1]] = pi;
        }
        Ok(proba)
    }
}
