//! Random forest classifier (inference only)

use super::tree::DecisionTree;
use super::{check_width, Classifier};
use crate::error::{Result, StaywiseError};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Soft-voting forest of fitted decision trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTree>,
    n_features: usize,
    classes: Vec<f64>,
}

impl RandomForestClassifier {
    pub fn new(trees: Vec<DecisionTree>, n_features: usize, classes: Vec<f64>) -> Result<Self> {
        let forest = Self {
            trees,
            n_features,
            classes,
        };
        forest.validate()?;
        Ok(forest)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(StaywiseError::ConfigError("forest has no trees".to_string()));
        }
        if self.classes.len() < 2 {
            return Err(StaywiseError::ConfigError("forest needs at least two classes".to_string()));
        }
        for tree in &self.trees {
            tree.validate(self.n_features, self.classes.len())?;
        }
        Ok(())
    }
}

impl Classifier for RandomForestClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[f64] {
        &self.classes
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba
            .rows()
            .into_iter()
            .map(|row| {
                // first maximum wins ties
                let best = row
                    .iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |acc, (i, &p)| if p > acc.1 { (i, p) } else { acc });
                self.classes[best.0]
            })
            .collect())
    }

    /// Mean of the per-tree leaf distributions
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        check_width(x, self.n_features)?;
        let n_classes = self.classes.len();

        let per_tree: Vec<Array2<f64>> = self
            .trees
            .par_iter()
            .map(|tree| -> Result<Array2<f64>> {
                let mut proba = Array2::<f64>::zeros((x.nrows(), n_classes));
                for (i, row) in x.rows().into_iter().enumerate() {
                    let distribution = tree.predict_row(row)?;
                    for (k, p) in distribution.into_iter().enumerate() {
                        proba[[i, k]] = p;
                    }
                }
                Ok(proba)
            })
            .collect::<Result<_>>()?;

        let mut proba = Array2::<f64>::zeros((x.nrows(), n_classes));
        for tree_proba in &per_tree {
            proba += tree_proba;
        }
        proba /= self.trees.len() as f64;
        Ok(proba)
    }
}
