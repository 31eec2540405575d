//! Decision tree evaluation

use crate::error::{Result, StaywiseError};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Decision tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node carrying the class distribution of its training samples
    Leaf { distribution: Vec<f64> },
    /// Internal node; rows with `x[feature_idx] <= threshold` go left
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn leaf(distribution: &[f64]) -> Self {
        TreeNode::Leaf {
            distribution: distribution.to_vec(),
        }
    }

    pub fn split(feature_idx: usize, threshold: f64, left: TreeNode, right: TreeNode) -> Self {
        TreeNode::Split {
            feature_idx,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// A fitted classification tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    root: TreeNode,
}

impl DecisionTree {
    pub fn new(root: TreeNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Check feature indices, thresholds and leaf distributions
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<()> {
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                TreeNode::Leaf { distribution } => {
                    if distribution.len() != n_classes {
                        return Err(StaywiseError::ConfigError(format!(
                            "leaf holds {} class weights, model has {} classes",
                            distribution.len(),
                            n_classes
                        )));
                    }
                    if distribution.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        return Err(StaywiseError::ConfigError(
                            "leaf class weights must be finite and non-negative".to_string(),
                        ));
                    }
                    if distribution.iter().sum::<f64>() <= 0.0 {
                        return Err(StaywiseError::ConfigError("leaf class weights sum to zero".to_string()));
                    }
                }
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature_idx >= n_features {
                        return Err(StaywiseError::ConfigError(format!(
                            "split on feature {} but the model has {} features",
                            feature_idx, n_features
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(StaywiseError::ConfigError("split threshold must be finite".to_string()));
                    }
                    stack.push(&**left);
                    stack.push(&**right);
                }
            }
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf `row` falls into
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> Result<Vec<f64>> {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { distribution } => {
                    let total: f64 = distribution.iter().sum();
                    return Ok(distribution.iter().map(|w| w / total).collect());
                }
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    let value = row.get(*feature_idx).ok_or_else(|| {
                        StaywiseError::PredictionError(format!(
                            "tree splits on feature {} but the row has {} values",
                            feature_idx,
                            row.len()
                        ))
                    })?;
                    node = if *value <= *threshold { &**left } else { &**right };
                }
            }
        }
    }
}
