//! Matrix type for 2D numeric data.

use super::Vector;
use crate::error::{EnsayoError, Result};
use serde::{Deserialize, Serialize};

/// A 2D matrix of floating-point values (row-major storage).
///
/// # Examples
///
/// ```
/// use ensayo::primitives::Matrix;
///
/// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// assert_eq!(m.shape(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> Matrix<T> {
    /// Creates a new matrix from a vector of data.
    ///
    /// # Errors
    ///
    /// Returns an error if data length doesn't match rows * cols.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(EnsayoError::DimensionMismatch {
                expected: format!("{rows}x{cols} = {} elements", rows * cols),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Gets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Returns a row as a Vector.
    #[must_use]
    pub fn row(&self, row_idx: usize) -> Vector<T> {
        let start = row_idx * self.cols;
        let end = start + self.cols;
        Vector::from_slice(&self.data[start..end])
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Matrix<f32> {
    /// Transposes the matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut data = vec![0.0; self.rows * self.cols];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Self {
            data,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Matrix-matrix multiplication.
    ///
    /// # Errors
    ///
    /// Returns an error if inner dimensions don't match.
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        if self.cols != other.rows {
            return Err(EnsayoError::DimensionMismatch {
                expected: format!("left cols = {}", self.cols),
                actual: format!("right rows = {}", other.rows),
            });
        }

        let mut result = vec![0.0; self.rows * other.cols];
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.get(i, k) * other.get(k, j);
                }
                result[i * other.cols + j] = sum;
            }
        }

        Ok(Self {
            data: result,
            rows: self.rows,
            cols: other.cols,
        })
    }

    /// Matrix-vector multiplication.
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions don't match.
    pub fn matvec(&self, vec: &Vector<f32>) -> Result<Vector<f32>> {
        if self.cols != vec.len() {
            return Err(EnsayoError::dimension_mismatch(
                "matrix cols",
                self.cols,
                vec.len(),
            ));
        }

        let result: Vec<f32> = (0..self.rows).map(|i| self.row(i).dot(vec)).collect();
        Ok(Vector::from_vec(result))
    }

    /// Solves the linear system Ax = b using Cholesky decomposition.
    ///
    /// The matrix must be symmetric positive definite. The factorization
    /// runs in f64; f32 matrices built from raw count data are routinely
    /// too ill-conditioned for a single-precision factorization.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is not square, dimensions don't
    /// match, or the matrix is not positive definite.
    pub fn cholesky_solve(&self, b: &Vector<f32>) -> Result<Vector<f32>> {
        if self.rows != self.cols {
            return Err(EnsayoError::DimensionMismatch {
                expected: "square matrix".to_string(),
                actual: format!("{}x{}", self.rows, self.cols),
            });
        }
        if self.rows != b.len() {
            return Err(EnsayoError::dimension_mismatch(
                "matrix rows",
                self.rows,
                b.len(),
            ));
        }

        let a: Vec<f64> = self.data.iter().map(|&v| f64::from(v)).collect();
        let rhs: Vec<f64> = b.as_slice().iter().map(|&v| f64::from(v)).collect();
        let x = cholesky_solve_f64(&a, self.rows, &rhs)?;
        Ok(Vector::from_vec(x.into_iter().map(|v| v as f32).collect()))
    }

    /// Solves the least-squares problem min ||Ax - b|| via the normal
    /// equations, `x = (A^T A)^-1 A^T b`.
    ///
    /// The Gram matrix `A^T A` is accumulated and factored entirely in
    /// f64. Squaring the condition number of A would otherwise exhaust
    /// f32 precision for design matrices mixing large raw counts with
    /// 0/1 indicator columns.
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions don't match or the columns of A are
    /// linearly dependent (Gram matrix not positive definite).
    pub fn least_squares(&self, b: &Vector<f32>) -> Result<Vector<f32>> {
        if self.rows != b.len() {
            return Err(EnsayoError::dimension_mismatch(
                "matrix rows",
                self.rows,
                b.len(),
            ));
        }

        let n = self.cols;
        let col = |i: usize, j: usize| f64::from(self.data[i * n + j]);

        // Gram matrix A^T A (symmetric) and right-hand side A^T b.
        let mut gram = vec![0.0f64; n * n];
        let mut rhs = vec![0.0f64; n];
        for i in 0..self.rows {
            let bi = f64::from(b[i]);
            for j in 0..n {
                let aij = col(i, j);
                rhs[j] += aij * bi;
                for k in j..n {
                    gram[j * n + k] += aij * col(i, k);
                }
            }
        }
        for j in 0..n {
            for k in 0..j {
                gram[j * n + k] = gram[k * n + j];
            }
        }

        let x = cholesky_solve_f64(&gram, n, &rhs)?;
        Ok(Vector::from_vec(x.into_iter().map(|v| v as f32).collect()))
    }
}

/// Cholesky solve on a dense row-major symmetric positive definite system.
fn cholesky_solve_f64(a: &[f64], n: usize, b: &[f64]) -> Result<Vec<f64>> {
    // Cholesky decomposition: A = L * L^T
    let mut l = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            if i == j {
                for k in 0..j {
                    sum += l[j * n + k] * l[j * n + k];
                }
                let diag = a[j * n + j] - sum;
                if diag <= 0.0 {
                    return Err(EnsayoError::NotPositiveDefinite);
                }
                l[j * n + j] = diag.sqrt();
            } else {
                for k in 0..j {
                    sum += l[i * n + k] * l[j * n + k];
                }
                l[i * n + j] = (a[i * n + j] - sum) / l[j * n + j];
            }
        }
    }

    // Forward substitution: L * y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[i * n + j] * y[j];
        }
        y[i] = (b[i] - sum) / l[i * n + i];
    }

    // Backward substitution: L^T * x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[j * n + i] * x[j];
        }
        x[i] = (y[i] - sum) / l[i * n + i];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_shape() {
        let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.get(1, 0), 3.0);
    }

    #[test]
    fn test_from_vec_wrong_length() {
        let result = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_row() {
        let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.row(1).as_slice(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_transpose() {
        let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.get(0, 1), 4.0);
        assert_eq!(t.get(2, 0), 3.0);
    }

    #[test]
    fn test_matmul() {
        let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Matrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matmul_dimension_mismatch() {
        let a = Matrix::from_vec(2, 3, vec![0.0; 6]).unwrap();
        let b = Matrix::from_vec(2, 2, vec![0.0; 4]).unwrap();
        assert!(a.matmul(&b).is_err());
    }

    #[test]
    fn test_matvec() {
        let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let v = Vector::from_slice(&[1.0, 0.0, -1.0]);
        let result = m.matvec(&v).unwrap();
        assert_eq!(result.as_slice(), &[-2.0, -2.0]);
    }

    #[test]
    fn test_cholesky_solve_identity() {
        let m = Matrix::from_vec(2, 2, vec![1.0, 0.0, 0.0, 1.0]).unwrap();
        let b = Vector::from_slice(&[3.0, 4.0]);
        let x = m.cholesky_solve(&b).unwrap();
        assert!((x[0] - 3.0).abs() < 1e-6);
        assert!((x[1] - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_cholesky_solve_spd() {
        // A = [[4, 2], [2, 3]], b = [10, 9] -> x = [1.5, 2]
        let m = Matrix::from_vec(2, 2, vec![4.0, 2.0, 2.0, 3.0]).unwrap();
        let b = Vector::from_slice(&[10.0, 9.0]);
        let x = m.cholesky_solve(&b).unwrap();
        assert!((x[0] - 1.5).abs() < 1e-4);
        assert!((x[1] - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_cholesky_solve_not_positive_definite() {
        let m = Matrix::from_vec(2, 2, vec![0.0, 0.0, 0.0, 0.0]).unwrap();
        let b = Vector::from_slice(&[1.0, 1.0]);
        assert!(m.cholesky_solve(&b).is_err());
    }

    #[test]
    fn test_least_squares_overdetermined() {
        // Best fit of y = 2x through 3 exact points plus the origin.
        let a = Matrix::from_vec(4, 1, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let b = Vector::from_slice(&[0.0, 2.0, 4.0, 6.0]);
        let x = a.least_squares(&b).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_least_squares_ill_conditioned_columns() {
        // A raw-count column next to a 0/1 indicator column.
        let a = Matrix::from_vec(
            4,
            2,
            vec![7000.0, 1.0, 7100.0, 0.0, 7200.0, 1.0, 7300.0, 0.0],
        )
        .unwrap();
        // b = 0.01 * counts + 5 * indicator
        let b = Vector::from_slice(&[75.0, 71.0, 77.0, 73.0]);
        let x = a.least_squares(&b).unwrap();
        assert!((x[0] - 0.01).abs() < 1e-5);
        assert!((x[1] - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_least_squares_dependent_columns() {
        // Duplicated column with power-of-two entries: the Gram pivot
        // cancels to exactly zero.
        let a = Matrix::from_vec(2, 2, vec![2.0, 2.0, 0.0, 0.0]).unwrap();
        let b = Vector::from_slice(&[1.0, 0.0]);
        assert!(matches!(
            a.least_squares(&b),
            Err(EnsayoError::NotPositiveDefinite)
        ));
    }

    #[test]
    fn test_cholesky_solve_non_square() {
        let m = Matrix::from_vec(2, 3, vec![0.0; 6]).unwrap();
        let b = Vector::from_slice(&[1.0, 1.0]);
        assert!(m.cholesky_solve(&b).is_err());
    }
}
