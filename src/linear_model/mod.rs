//! Linear models for regression.
//!
//! Includes Ordinary Least Squares (OLS) linear regression.

use crate::error::{EnsayoError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;

/// Ordinary Least Squares (OLS) linear regression.
///
/// Fits a linear model by minimizing the residual sum of squares between
/// observed targets and predicted targets. The model equation is:
///
/// ```text
/// y = X β + ε
/// ```
///
/// where `β` is the coefficient vector and `ε` is random error.
///
/// # Solver
///
/// Uses normal equations: `β = (X^T X)^-1 X^T y` via Cholesky decomposition,
/// accumulated in f64 (see [`Matrix::least_squares`]).
///
/// # Examples
///
/// ```
/// use ensayo::prelude::*;
///
/// // Simple linear regression: y = 2x + 1
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).unwrap();
///
/// let r2 = model.score(&x, &y);
/// assert!(r2 > 0.99);
/// ```
#[derive(Debug, Clone)]
pub struct LinearRegression {
    /// Coefficients for features (excluding intercept).
    coefficients: Option<Vector<f32>>,
    /// Intercept (bias) term.
    intercept: f32,
    /// Whether to fit an intercept.
    fit_intercept: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Creates a new `LinearRegression` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            fit_intercept: true,
        }
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Returns the coefficients (excluding intercept).
    ///
    /// # Panics
    ///
    /// Panics if model is not fitted.
    #[must_use]
    pub fn coefficients(&self) -> &Vector<f32> {
        self.coefficients
            .as_ref()
            .expect("Model not fitted. Call fit() first.")
    }

    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f32 {
        self.intercept
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Adds an intercept column of ones to the design matrix.
    fn add_intercept_column(x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let (n_rows, n_cols) = x.shape();
        let mut data = Vec::with_capacity(n_rows * (n_cols + 1));

        for i in 0..n_rows {
            data.push(1.0); // Intercept column
            for j in 0..n_cols {
                data.push(x.get(i, j));
            }
        }

        Matrix::from_vec(n_rows, n_cols + 1, data)
    }
}

impl Estimator for LinearRegression {
    /// Fits the linear regression model using normal equations.
    ///
    /// # Errors
    ///
    /// Returns an error if input dimensions don't match, the system is
    /// underdetermined, or the normal-equation matrix is not positive
    /// definite (perfectly collinear features).
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples != y.len() {
            return Err(EnsayoError::dimension_mismatch(
                "n_samples",
                n_samples,
                y.len(),
            ));
        }

        if n_samples == 0 {
            return Err(EnsayoError::empty_input("cannot fit with zero samples"));
        }

        let required_samples = if self.fit_intercept {
            n_features + 1
        } else {
            n_features
        };

        if n_samples < required_samples {
            return Err(EnsayoError::Other(format!(
                "insufficient samples: {n_samples} rows cannot determine {required_samples} \
                 parameters"
            )));
        }

        let x_design = if self.fit_intercept {
            Self::add_intercept_column(x)?
        } else {
            x.clone()
        };

        // β = (X^T X)^-1 X^T y
        let beta = x_design.least_squares(y)?;

        if self.fit_intercept {
            self.intercept = beta[0];
            self.coefficients = Some(beta.slice(1, n_features + 1));
        } else {
            self.intercept = 0.0;
            self.coefficients = Some(beta);
        }

        Ok(())
    }

    /// Predicts target values for input data.
    ///
    /// # Panics
    ///
    /// Panics if model is not fitted.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let coefficients = self
            .coefficients
            .as_ref()
            .expect("Model not fitted. Call fit() first.");

        let result = x
            .matvec(coefficients)
            .expect("Matrix dimensions don't match coefficients");

        result.add_scalar(self.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let model = LinearRegression::new();
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_simple_regression() {
        // y = 2x + 1
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        assert!(model.is_fitted());

        let coef = model.coefficients();
        assert!((coef[0] - 2.0).abs() < 1e-4);
        assert!((model.intercept() - 1.0).abs() < 1e-4);

        let predictions = model.predict(&x);
        for i in 0..4 {
            assert!((predictions[i] - y[i]).abs() < 1e-4);
        }

        let r2 = model.score(&x, &y);
        assert!((r2 - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_multivariate_regression() {
        // y = 1 + 2*x1 + 3*x2
        let x = Matrix::from_vec(4, 2, vec![1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 2.0, 2.0]).unwrap();
        let y = Vector::from_slice(&[6.0, 8.0, 9.0, 11.0]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients();
        assert!((coef[0] - 2.0).abs() < 1e-4);
        assert!((coef[1] - 3.0).abs() < 1e-4);
        assert!((model.intercept() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_no_intercept() {
        // y = 2x (no intercept)
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0]);

        let mut model = LinearRegression::new().with_intercept(false);
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients();
        assert!((coef[0] - 2.0).abs() < 1e-4);
        assert!((model.intercept() - 0.0).abs() < 1e-4);
    }

    #[test]
    fn test_predict_new_data() {
        // y = x + 1
        let x_train = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
        let y_train = Vector::from_slice(&[2.0, 3.0, 4.0]);

        let mut model = LinearRegression::new();
        model.fit(&x_train, &y_train).unwrap();

        let x_test = Matrix::from_vec(2, 1, vec![4.0, 5.0]).unwrap();
        let predictions = model.predict(&x_test);

        assert!((predictions[0] - 5.0).abs() < 1e-4);
        assert!((predictions[1] - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_dimension_mismatch_error() {
        let x = Matrix::from_vec(3, 2, vec![1.0; 6]).unwrap();
        let y = Vector::from_slice(&[1.0, 2.0]); // Wrong length

        let mut model = LinearRegression::new();
        assert!(model.fit(&x, &y).is_err());
    }

    #[test]
    fn test_empty_data_error() {
        let x = Matrix::from_vec(0, 2, vec![]).unwrap();
        let y = Vector::from_vec(vec![]);

        let mut model = LinearRegression::new();
        assert!(model.fit(&x, &y).is_err());
    }

    #[test]
    fn test_underdetermined_system() {
        // 3 samples, 5 features, fit_intercept means 6 parameters.
        let x = Matrix::from_vec(
            3,
            5,
            vec![
                1.0, 2.0, 3.0, 4.0, 5.0, 2.0, 3.0, 4.0, 5.0, 6.0, 3.0, 4.0, 5.0, 6.0, 7.0,
            ],
        )
        .unwrap();
        let y = Vector::from_vec(vec![10.0, 20.0, 30.0]);

        let mut model = LinearRegression::new();
        let result = model.fit(&x, &y);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("insufficient"));
    }

    #[test]
    fn test_with_noise() {
        // y ≈ 2x + 1 with some noise
        let x = Matrix::from_vec(5, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let y = Vector::from_slice(&[3.1, 4.9, 7.2, 8.8, 11.1]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients();
        assert!((coef[0] - 2.0).abs() < 0.2);
        assert!((model.intercept() - 1.0).abs() < 0.5);

        let r2 = model.score(&x, &y);
        assert!(r2 > 0.95);
        assert!(r2 < 1.0);
    }

    #[test]
    fn test_constant_target() {
        let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
        let y = Vector::from_slice(&[5.0, 5.0, 5.0]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients();
        assert!(coef[0].abs() < 1e-4);
        assert!((model.intercept() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_clone_keeps_fit() {
        let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
        let y = Vector::from_slice(&[2.0, 4.0, 6.0]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let cloned = model.clone();
        assert!(cloned.is_fitted());
        assert!((cloned.intercept() - model.intercept()).abs() < 1e-6);
    }
}
