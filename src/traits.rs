//! Core trait for the regression estimators.
//!
//! All three model runners (linear, tree, boosted) go through the same
//! fit/predict/score contract, so the evaluation loop is written once.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// Supervised regression estimator.
///
/// Estimators implement fit/predict/score following sklearn conventions.
///
/// # Examples
///
/// ```
/// use ensayo::prelude::*;
///
/// // Training data: y = 2x + 1
/// let x_train = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y_train = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let x_test = Matrix::from_vec(2, 1, vec![5.0, 6.0]).unwrap();
/// let y_test = Vector::from_slice(&[11.0, 13.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x_train, &y_train).unwrap();
/// let predictions = model.predict(&x_test);
/// assert_eq!(predictions.len(), 2);
/// assert!(model.score(&x_test, &y_test) > 0.99);
/// ```
pub trait Estimator {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (dimension mismatch, singular
    /// system, etc.).
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()>;

    /// Predicts target values for input data.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32>;

    /// Computes the R² score on the given data.
    fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> f32 {
        let y_pred = self.predict(x);
        crate::metrics::r_squared(&y_pred, y)
    }
}
