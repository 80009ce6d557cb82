//! Core numeric primitives (Vector, Matrix).
//!
//! These types provide the foundation for the estimators; they carry
//! exactly the linear algebra ordinary least squares and tree building
//! need, nothing more.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
