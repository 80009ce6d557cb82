//! Vector type for 1D numeric data.

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A 1D vector of numeric values.
///
/// # Examples
///
/// ```
/// use ensayo::primitives::Vector;
///
/// let v = Vector::from_slice(&[1.0, 2.0, 3.0]);
/// assert_eq!(v.len(), 3);
/// assert!((v.mean() - 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector<T> {
    data: Vec<T>,
}

impl<T: Copy> Vector<T> {
    /// Creates a vector from a slice.
    #[must_use]
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Creates a vector by taking ownership of the data.
    #[must_use]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the vector has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns a copy of the elements in `[start, end)` as a new vector.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            data: self.data[start..end].to_vec(),
        }
    }

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl Vector<f32> {
    /// Computes the arithmetic mean. Returns 0.0 for an empty vector.
    #[must_use]
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f32>() / self.data.len() as f32
    }

    /// Computes the population variance. Returns 0.0 for an empty vector.
    #[must_use]
    pub fn variance(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        self.data.iter().map(|&v| (v - mean).powi(2)).sum::<f32>() / self.data.len() as f32
    }

    /// Computes the dot product with another vector.
    ///
    /// # Panics
    ///
    /// Panics if the vectors have different lengths.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f32 {
        assert_eq!(
            self.len(),
            other.len(),
            "Vectors must have same length for dot product"
        );
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Returns a new vector with the scalar added to every element.
    #[must_use]
    pub fn add_scalar(&self, scalar: f32) -> Self {
        Self {
            data: self.data.iter().map(|v| v + scalar).collect(),
        }
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        &self.data[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_and_len() {
        let v = Vector::from_slice(&[1.0_f32, 2.0, 3.0]);
        assert_eq!(v.len(), 3);
        assert!(!v.is_empty());
        assert_eq!(v[1], 2.0);
    }

    #[test]
    fn test_empty() {
        let v: Vector<f32> = Vector::from_vec(vec![]);
        assert!(v.is_empty());
        assert_eq!(v.mean(), 0.0);
        assert_eq!(v.variance(), 0.0);
    }

    #[test]
    fn test_mean_and_variance() {
        let v = Vector::from_slice(&[2.0_f32, 4.0, 6.0, 8.0]);
        assert!((v.mean() - 5.0).abs() < 1e-6);
        assert!((v.variance() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_dot() {
        let a = Vector::from_slice(&[1.0_f32, 2.0, 3.0]);
        let b = Vector::from_slice(&[4.0_f32, 5.0, 6.0]);
        assert!((a.dot(&b) - 32.0).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_dot_length_mismatch_panics() {
        let a = Vector::from_slice(&[1.0_f32, 2.0]);
        let b = Vector::from_slice(&[1.0_f32]);
        let _ = a.dot(&b);
    }

    #[test]
    fn test_add_scalar() {
        let v = Vector::from_slice(&[1.0_f32, 2.0]);
        let shifted = v.add_scalar(0.5);
        assert_eq!(shifted.as_slice(), &[1.5, 2.5]);
    }

    #[test]
    fn test_slice() {
        let v = Vector::from_slice(&[1.0_f32, 2.0, 3.0, 4.0]);
        let s = v.slice(1, 3);
        assert_eq!(s.as_slice(), &[2.0, 3.0]);
    }

    #[test]
    fn test_variance_constant() {
        let v = Vector::from_slice(&[3.0_f32; 5]);
        assert_eq!(v.variance(), 0.0);
    }
}
