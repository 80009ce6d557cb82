//! Ensayo: A/B experiment conversion analysis in pure Rust.
//!
//! Ensayo loads daily traffic data for a control and an experiment cohort,
//! merges them into a labeled dataset with day-of-week features, splits the
//! rows into stratified train/test partitions, and compares regression
//! models on their held-out enrollment error.
//!
//! # Quick Start
//!
//! ```
//! use ensayo::prelude::*;
//!
//! // Create training data (y = 2*x + 1)
//! let x = Matrix::from_vec(4, 1, vec![
//!     1.0,
//!     2.0,
//!     3.0,
//!     4.0,
//! ]).unwrap();
//! let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
//!
//! // Train linear regression
//! let mut model = LinearRegression::new();
//! model.fit(&x, &y).unwrap();
//!
//! // Make predictions
//! let predictions = model.predict(&x);
//! let r2 = model.score(&x, &y);
//! assert!(r2 > 0.99);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`dataset`]: CSV loading and experiment record types
//! - [`pipeline`]: Merging, cleaning, and design-matrix construction
//! - [`model_selection`]: Stratified train/test splitting
//! - [`linear_model`]: Linear regression via the normal equations
//! - [`tree`]: Decision tree and gradient boosting regressors
//! - [`metrics`]: Evaluation metrics
//! - [`evaluate`]: End-to-end experiment runs and model comparison

pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod linear_model;
pub mod metrics;
pub mod model_selection;
pub mod pipeline;
pub mod prelude;
pub mod primitives;
pub mod traits;
pub mod tree;

pub use error::{EnsayoError, Result};
