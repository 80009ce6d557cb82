//! Regression trees and tree ensembles.
//!
//! This module implements:
//! - CART regression trees using MSE reduction as the split criterion
//! - Gradient boosting over regression-tree weak learners

mod gradient_boosting;

pub use gradient_boosting::GradientBoostingRegressor;

use crate::error::{EnsayoError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

/// Leaf node in a regression tree.
///
/// Predicts the mean of the training targets that reached it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionLeaf {
    /// Predicted value for this leaf (mean of y values)
    pub value: f32,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// Internal node in a regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionNode {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<RegressionTreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<RegressionTreeNode>,
}

/// A node in a regression tree (either internal node or leaf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RegressionTreeNode {
    /// Internal decision node with split condition
    Node(RegressionNode),
    /// Leaf node with value prediction
    Leaf(RegressionLeaf),
}

impl RegressionTreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            RegressionTreeNode::Leaf(_) => 0,
            RegressionTreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }
}

/// Decision tree regressor using the CART algorithm.
///
/// Splits greedily on the feature/threshold pair with the largest MSE
/// reduction; leaves predict the mean of their training targets.
///
/// # Examples
///
/// ```
/// use ensayo::prelude::*;
/// use ensayo::tree::DecisionTreeRegressor;
///
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 10.0, 11.0]).unwrap();
/// let y = Vector::from_slice(&[1.0, 1.0, 5.0, 5.0]);
///
/// let mut tree = DecisionTreeRegressor::new().with_max_depth(3);
/// tree.fit(&x, &y).unwrap();
/// let predictions = tree.predict(&x);
/// assert!((predictions[0] - 1.0).abs() < 1e-6);
/// assert!((predictions[3] - 5.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    tree: Option<RegressionTreeNode>,
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
}

impl DecisionTreeRegressor {
    /// Creates a new decision tree regressor with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }

    /// Sets the maximum depth of the tree.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the minimum number of samples required to split an internal
    /// node (clamped to at least 2).
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Sets the minimum number of samples required at a leaf (clamped to
    /// at least 1).
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Returns the fitted tree's depth, if fitted.
    #[must_use]
    pub fn depth(&self) -> Option<usize> {
        self.tree.as_ref().map(RegressionTreeNode::depth)
    }

    /// Predicts the value for a single sample.
    fn predict_one(&self, x: &[f32]) -> f32 {
        let mut node = self.tree.as_ref().expect("Model not fitted. Call fit() first.");
        loop {
            match node {
                RegressionTreeNode::Leaf(leaf) => return leaf.value,
                RegressionTreeNode::Node(internal) => {
                    node = if x[internal.feature_idx] <= internal.threshold {
                        &internal.left
                    } else {
                        &internal.right
                    };
                }
            }
        }
    }
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Estimator for DecisionTreeRegressor {
    /// Fits the decision tree to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` and `y` disagree on sample count or the
    /// input is empty.
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let (n_rows, _) = x.shape();
        if n_rows != y.len() {
            return Err(EnsayoError::dimension_mismatch("n_samples", n_rows, y.len()));
        }
        if n_rows == 0 {
            return Err(EnsayoError::empty_input("cannot fit with zero samples"));
        }

        self.tree = Some(build_regression_tree(
            x,
            y.as_slice(),
            0,
            self.max_depth,
            self.min_samples_split,
            self.min_samples_leaf,
        ));
        Ok(())
    }

    /// Predicts target values for samples.
    ///
    /// # Panics
    ///
    /// Panics if called before `fit()`.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let (n_samples, n_features) = x.shape();
        let mut predictions = Vec::with_capacity(n_samples);

        for row in 0..n_samples {
            let mut sample = Vec::with_capacity(n_features);
            for col in 0..n_features {
                sample.push(x.get(row, col));
            }
            predictions.push(self.predict_one(&sample));
        }

        Vector::from_vec(predictions)
    }
}

fn mean_f32(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

fn variance_f32(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean_f32(values);
    values.iter().map(|&v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32
}

/// Weighted MSE of the two sides of a candidate split.
fn split_mse(y_left: &[f32], y_right: &[f32]) -> f32 {
    let n = (y_left.len() + y_right.len()) as f32;
    (variance_f32(y_left) * y_left.len() as f32 + variance_f32(y_right) * y_right.len() as f32) / n
}

/// Sorted, deduplicated values of one feature column.
fn sorted_unique_feature_values(x: &Matrix<f32>, feature_idx: usize) -> Vec<f32> {
    let mut values: Vec<f32> = (0..x.n_rows()).map(|row| x.get(row, feature_idx)).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    values.dedup();
    values
}

/// Partition targets by a threshold on one feature.
fn split_targets(x: &Matrix<f32>, y: &[f32], feature_idx: usize, threshold: f32) -> (Vec<f32>, Vec<f32>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (row, &target) in y.iter().enumerate() {
        if x.get(row, feature_idx) <= threshold {
            left.push(target);
        } else {
            right.push(target);
        }
    }
    (left, right)
}

/// Finds the (feature, threshold) pair with the largest MSE reduction.
///
/// Candidate thresholds are midpoints between consecutive distinct feature
/// values. Returns `None` when no split improves on the current variance.
fn find_best_split(x: &Matrix<f32>, y: &[f32]) -> Option<(usize, f32)> {
    let (n_samples, n_features) = x.shape();
    if n_samples < 2 {
        return None;
    }

    let current_variance = variance_f32(y);
    let mut best: Option<(usize, f32)> = None;
    let mut best_gain = 0.0;

    for feature_idx in 0..n_features {
        let values = sorted_unique_feature_values(x, feature_idx);
        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;
            let (y_left, y_right) = split_targets(x, y, feature_idx, threshold);
            if y_left.is_empty() || y_right.is_empty() {
                continue;
            }
            let gain = current_variance - split_mse(&y_left, &y_right);
            if gain > best_gain {
                best_gain = gain;
                best = Some((feature_idx, threshold));
            }
        }
    }

    best
}

/// Extract the sample subset at the given row indices.
fn take_rows(x: &Matrix<f32>, y: &[f32], indices: &[usize]) -> (Matrix<f32>, Vec<f32>) {
    let n_features = x.n_cols();
    let mut data = Vec::with_capacity(indices.len() * n_features);
    let mut targets = Vec::with_capacity(indices.len());

    for &idx in indices {
        for col in 0..n_features {
            data.push(x.get(idx, col));
        }
        targets.push(y[idx]);
    }

    let matrix = Matrix::from_vec(indices.len(), n_features, data)
        .expect("subset dimensions are consistent by construction");
    (matrix, targets)
}

fn make_leaf(y: &[f32]) -> RegressionTreeNode {
    RegressionTreeNode::Leaf(RegressionLeaf {
        value: mean_f32(y),
        n_samples: y.len(),
    })
}

fn at_max_depth(depth: usize, max_depth: Option<usize>) -> bool {
    max_depth.is_some_and(|max_d| depth >= max_d)
}

/// Build a regression decision tree recursively.
fn build_regression_tree(
    x: &Matrix<f32>,
    y: &[f32],
    depth: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
) -> RegressionTreeNode {
    let n_samples = y.len();

    if n_samples < min_samples_split || at_max_depth(depth, max_depth) || variance_f32(y) < 1e-10 {
        return make_leaf(y);
    }

    let Some((feature_idx, threshold)) = find_best_split(x, y) else {
        return make_leaf(y);
    };

    let mut left_indices = Vec::new();
    let mut right_indices = Vec::new();
    for row in 0..n_samples {
        if x.get(row, feature_idx) <= threshold {
            left_indices.push(row);
        } else {
            right_indices.push(row);
        }
    }

    if left_indices.len() < min_samples_leaf || right_indices.len() < min_samples_leaf {
        return make_leaf(y);
    }

    let (left_x, left_y) = take_rows(x, y, &left_indices);
    let (right_x, right_y) = take_rows(x, y, &right_indices);

    let left_child = build_regression_tree(
        &left_x,
        &left_y,
        depth + 1,
        max_depth,
        min_samples_split,
        min_samples_leaf,
    );
    let right_child = build_regression_tree(
        &right_x,
        &right_y,
        depth + 1,
        max_depth,
        min_samples_split,
        min_samples_leaf,
    );

    RegressionTreeNode::Node(RegressionNode {
        feature_idx,
        threshold,
        left: Box::new(left_child),
        right: Box::new(right_child),
    })
}
