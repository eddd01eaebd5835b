//! Physical data types
//!
//! This module provides a small container for physical quantities that can be
//! either a single uniform value or a vector over the stages of the column.

use nalgebra::DVector;
use std::fmt;

/// Physical data container
///
/// # Storage Types
///
/// - **Scalar**: Single uniform value (0D)
/// - **Vector**: 1D array, e.g. concentration per stage and species
///
/// # Memory Layout
///
/// - **Scalar**: 8 bytes
/// - **Vector[n]**: 8n bytes
///
/// # Examples
///
/// ```rust
/// use chrom_twin::physics::PhysicalData;
///
/// // 50 stages × 2 species, column initially empty
/// let state = PhysicalData::uniform_vector(100, 0.0);
/// assert_eq!(state.len(), 100);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicalData {
    /// Scalar value (0D) - 8 bytes
    Scalar(f64),

    /// Vector (1D) - 8n bytes
    ///
    /// Example: concentration in every stage of the cascade
    Vector(DVector<f64>),
}

impl PhysicalData {

    // ======================================= constructors =======================================

    /// Create from scalar
    pub fn from_scalar(value: f64) -> Self {
        Self::Scalar(value)
    }

    /// Create from vector
    pub fn from_vec(vector: Vec<f64>) -> Self {
        Self::Vector(DVector::from_vec(vector))
    }

    /// Create from DVector
    pub fn from_vector(vector: DVector<f64>) -> Self {
        Self::Vector(vector)
    }

    /// Create uniform vector
    pub fn uniform_vector(size: usize, value: f64) -> Self {
        Self::Vector(DVector::from_element(size, value))
    }

    // ========================================== Queries ==========================================

    /// Check data is scalar
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Check data is a vector
    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Vector(_))
    }

    /// Get length
    pub fn len(&self) -> usize {
        match self {
            PhysicalData::Scalar(_) => 1,
            PhysicalData::Vector(v) => v.len(),
        }
    }

    /// Check emptiness
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when every stored value is finite (no NaN, no ±Inf)
    pub fn is_finite(&self) -> bool {
        self.as_slice().iter().all(|x| x.is_finite())
    }

    // ======================================== Extractions ========================================

    /// Try to extract as a scalar
    pub fn try_as_scalar(&self) -> Option<f64> {
        match self {
            PhysicalData::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    /// Try to extract as a DVector
    pub fn try_as_vector(&self) -> Option<&DVector<f64>> {
        match self {
            PhysicalData::Vector(value) => Some(value),
            _ => None,
        }
    }

    /// Contiguous view over the stored values, whatever the storage type
    pub fn as_slice(&self) -> &[f64] {
        match self {
            PhysicalData::Scalar(value) => std::slice::from_ref(value),
            PhysicalData::Vector(value) => value.as_slice(),
        }
    }

    /// Mutable contiguous view over the stored values
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        match self {
            PhysicalData::Scalar(value) => std::slice::from_mut(value),
            PhysicalData::Vector(value) => value.as_mut_slice(),
        }
    }

    // ====================================== Apply functions ======================================

    /// Apply a function f to data
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        self.as_mut_slice().iter_mut().for_each(|x| *x = f(*x));
    }
}

// ================================== Simple arithmetic functions ==================================

impl std::ops::Add for PhysicalData {
    type Output = PhysicalData;
    fn add(self, rhs: Self) -> Self::Output {
        use PhysicalData::*;
        match (self, rhs) {
            (Scalar(x), Scalar(y)) => Scalar(x + y),
            (Scalar(x), Vector(y)) |
            (Vector(y), Scalar(x)) => Vector(y.map(|e| e + x)),
            (Vector(x), Vector(y)) => {
                assert_eq!(x.len(), y.len(), "Vector length must match");
                Vector(x + y)
            }
        }
    }
}

impl std::ops::Mul<f64> for PhysicalData {
    type Output = PhysicalData;
    fn mul(self, scalar: f64) -> Self::Output {
        match self {
            PhysicalData::Scalar(x) => PhysicalData::Scalar(x * scalar),
            PhysicalData::Vector(x) => PhysicalData::Vector(x * scalar),
        }
    }
}

impl std::ops::Mul<PhysicalData> for f64 {
    type Output = PhysicalData;
    fn mul(self, rhs: PhysicalData) -> Self::Output {
        rhs * self
    }
}

// ======================== Display ============================

impl fmt::Display for PhysicalData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalData::Scalar(value) => write!(f, "Scalar ({})", value),
            PhysicalData::Vector(value) => write!(f, "Vector [{}]", value.len()),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar() {
        let data = PhysicalData::from_scalar(42.0);
        assert!(data.is_scalar());
        assert_eq!(data.len(), 1);
        assert_eq!(data.as_slice(), &[42.0]);
    }

    #[test]
    fn test_vector() {
        let data = PhysicalData::uniform_vector(100, 1.0);
        assert!(data.is_vector());
        assert_eq!(data.len(), 100);
        assert!(data.try_as_scalar().is_none());
    }

    #[test]
    fn test_addition() {
        let a = PhysicalData::from_vec(vec![1.0, 2.0]);
        let b = PhysicalData::from_vec(vec![0.5, -2.0]);
        let c = a + b;
        assert_eq!(c.as_slice(), &[1.5, 0.0]);

        let shifted = PhysicalData::from_vec(vec![1.0, 2.0]) + PhysicalData::Scalar(1.0);
        assert_eq!(shifted.as_slice(), &[2.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "Vector length must match")]
    fn test_addition_length_mismatch() {
        let _ = PhysicalData::uniform_vector(2, 1.0) + PhysicalData::uniform_vector(3, 1.0);
    }

    #[test]
    fn test_multiplication() {
        let data = PhysicalData::uniform_vector(10, 2.0);
        let result = 3.0 * data;
        assert_eq!(result.as_slice()[0], 6.0);
    }

    #[test]
    fn test_apply_and_finiteness() {
        let mut data = PhysicalData::from_vec(vec![1.0, 4.0, 9.0]);
        data.apply(f64::sqrt);
        assert_eq!(data.as_slice(), &[1.0, 2.0, 3.0]);
        assert!(data.is_finite());

        data.apply(|x| x / 0.0);
        assert!(!data.is_finite());
    }
}
