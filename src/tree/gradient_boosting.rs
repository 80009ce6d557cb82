//! Gradient boosting for regression.
//!
//! Fits an additive ensemble of shallow regression trees, each trained on
//! the residuals of the ensemble so far (squared-error loss).

use crate::error::{EnsayoError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use crate::tree::DecisionTreeRegressor;
use serde::{Deserialize, Serialize};

/// Gradient boosting regressor with squared-error loss.
///
/// The ensemble starts from the mean of the training targets; each stage
/// fits a depth-limited regression tree to the current residuals and adds
/// its predictions scaled by the learning rate.
///
/// # Examples
///
/// ```
/// use ensayo::prelude::*;
/// use ensayo::tree::GradientBoostingRegressor;
///
/// let x = Matrix::from_vec(6, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// let y = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
///
/// let mut gbm = GradientBoostingRegressor::new()
///     .with_n_estimators(50)
///     .with_learning_rate(0.3);
/// gbm.fit(&x, &y).unwrap();
/// let predictions = gbm.predict(&x);
/// assert!((predictions[0] - 1.0).abs() < 0.5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    n_estimators: usize,
    learning_rate: f32,
    max_depth: usize,
    init_prediction: Option<f32>,
    estimators: Vec<DecisionTreeRegressor>,
}

impl GradientBoostingRegressor {
    /// Creates a new gradient boosting regressor with default parameters
    /// (100 stages, learning rate 0.1, tree depth 3).
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            init_prediction: None,
            estimators: Vec::new(),
        }
    }

    /// Sets the number of boosting stages.
    #[must_use]
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    /// Sets the learning rate (shrinkage applied to each stage).
    #[must_use]
    pub fn with_learning_rate(mut self, rate: f32) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the maximum depth of each stage's tree.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Returns the number of fitted stages.
    #[must_use]
    pub fn n_fitted_estimators(&self) -> usize {
        self.estimators.len()
    }

    fn validate_hyperparameters(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(EnsayoError::InvalidHyperparameter {
                param: "n_estimators".to_string(),
                value: "0".to_string(),
                constraint: "must be at least 1".to_string(),
            });
        }
        if self.learning_rate <= 0.0 || !self.learning_rate.is_finite() {
            return Err(EnsayoError::InvalidHyperparameter {
                param: "learning_rate".to_string(),
                value: self.learning_rate.to_string(),
                constraint: "must be positive and finite".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for GradientBoostingRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Estimator for GradientBoostingRegressor {
    /// Fits the boosted ensemble to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if hyperparameters are invalid, if `x` and `y`
    /// disagree on sample count, or if the input is empty.
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        self.validate_hyperparameters()?;

        let (n_rows, _) = x.shape();
        if n_rows != y.len() {
            return Err(EnsayoError::dimension_mismatch("n_samples", n_rows, y.len()));
        }
        if n_rows == 0 {
            return Err(EnsayoError::empty_input("cannot fit with zero samples"));
        }

        let init = y.mean();
        self.init_prediction = Some(init);
        self.estimators = Vec::with_capacity(self.n_estimators);

        let mut current: Vec<f32> = vec![init; n_rows];

        for _ in 0..self.n_estimators {
            let residuals: Vec<f32> = y
                .as_slice()
                .iter()
                .zip(&current)
                .map(|(&target, &pred)| target - pred)
                .collect();

            // All residuals near zero means the ensemble already fits.
            if residuals.iter().all(|r| r.abs() < 1e-7) {
                break;
            }

            let mut stage = DecisionTreeRegressor::new().with_max_depth(self.max_depth);
            stage.fit(x, &Vector::from_vec(residuals))?;

            let stage_predictions = stage.predict(x);
            for (pred, &update) in current.iter_mut().zip(stage_predictions.as_slice()) {
                *pred += self.learning_rate * update;
            }

            self.estimators.push(stage);
        }

        Ok(())
    }

    /// Predicts target values for samples.
    ///
    /// # Panics
    ///
    /// Panics if called before `fit()`.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let init = self
            .init_prediction
            .expect("Model not fitted. Call fit() first.");

        let n_samples = x.n_rows();
        let mut predictions = vec![init; n_samples];

        for stage in &self.estimators {
            let stage_predictions = stage.predict(x);
            for (pred, &update) in predictions.iter_mut().zip(stage_predictions.as_slice()) {
                *pred += self.learning_rate * update;
            }
        }

        Vector::from_vec(predictions)
    }
}
