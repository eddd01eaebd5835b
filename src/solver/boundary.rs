//! Domain boundaries of a time evolution
//!
//! The column model is a system of ODEs, so the only boundary is temporal:
//! the state at `t = 0`. Boundaries are still stored per named dimension so
//! the solver does not need to know how the scenario was built.

use crate::error::{Result, TwinError};
use crate::physics::PhysicalState;

/// Name of the temporal dimension
pub const TIME_DIMENSION: &str = "t";

// =================================================================================================
// Domain Boundaries
// =================================================================================================

/// Domain boundaries
///
/// Stores boundary states directly as vectors of `PhysicalState`. For the
/// temporal dimension the first state is the initial condition.
///
/// # Examples
///
/// ```rust
/// use chrom_twin::physics::{PhysicalData, PhysicalQuantity, PhysicalState};
/// use chrom_twin::solver::DomainBoundaries;
///
/// let initial = PhysicalState::new(
///     PhysicalQuantity::Concentration,
///     PhysicalData::uniform_vector(100, 0.0),
/// );
/// let boundaries = DomainBoundaries::temporal(initial);
///
/// assert_eq!(boundaries.ndim(), 1);
/// assert!(boundaries.is_time_dependent());
/// assert!(boundaries.initial_condition().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DomainBoundaries {
    /// Boundaries for each dimension
    pub dimensions: Vec<DimensionBoundary>,
}

impl DomainBoundaries {
    /// Create from explicit dimensions
    pub fn new(dimensions: Vec<DimensionBoundary>) -> Self {
        Self { dimensions }
    }

    /// Create temporal-only domain (ODE)
    pub fn temporal(initial: PhysicalState) -> Self {
        Self::new(vec![DimensionBoundary::new(TIME_DIMENSION, vec![initial])])
    }

    // ===================================== Query methods =========================================

    pub fn ndim(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_time_dependent(&self) -> bool {
        self.time_boundary().is_some()
    }

    pub fn time_boundary(&self) -> Option<&DimensionBoundary> {
        self.dimensions.iter().find(|boundary| boundary.name == TIME_DIMENSION)
    }

    /// State at `t = 0`
    pub fn initial_condition(&self) -> Option<&PhysicalState> {
        self.time_boundary().and_then(DimensionBoundary::first)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dimensions.is_empty() {
            return Err(TwinError::configuration("Dimension boundaries cannot be empty"));
        }

        for dimension in &self.dimensions {
            dimension.validate()?;
        }

        let unique: std::collections::HashSet<&str> =
            self.dimensions.iter().map(|d| d.name.as_str()).collect();

        if unique.len() != self.dimensions.len() {
            return Err(TwinError::configuration(
                "Two dimensions cannot share the same name",
            ));
        }

        Ok(())
    }
}

// =================================================================================================
// Dimension Boundary
// =================================================================================================

/// Boundary states along one named dimension
#[derive(Debug, Clone)]
pub struct DimensionBoundary {
    pub name: String,

    pub states: Vec<PhysicalState>,
}

impl DimensionBoundary {
    pub fn new(name: impl Into<String>, states: Vec<PhysicalState>) -> Self {
        Self { name: name.into(), states }
    }

    pub fn first(&self) -> Option<&PhysicalState> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&PhysicalState> {
        self.states.last()
    }

    pub fn size(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(TwinError::configuration(format!(
                "Dimension '{}' must have at least one boundary state",
                self.name
            )));
        }

        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{PhysicalData, PhysicalQuantity};

    fn state(values: &[f64]) -> PhysicalState {
        PhysicalState::new(PhysicalQuantity::Concentration, PhysicalData::from_vec(values.to_vec()))
    }

    #[test]
    fn test_dimension_boundary_content() {
        let dimension = DimensionBoundary::new("t", vec![state(&[1., 2.]), state(&[3., 4.])]);

        assert_eq!(dimension.size(), 2);
        assert_eq!(
            dimension.first().unwrap().get(PhysicalQuantity::Concentration).unwrap().as_slice(),
            &[1., 2.]
        );
        assert_eq!(
            dimension.last().unwrap().get(PhysicalQuantity::Concentration).unwrap().as_slice(),
            &[3., 4.]
        );
    }

    #[test]
    fn test_empty_dimension_is_invalid() {
        let dimension = DimensionBoundary::new("t", vec![]);
        assert!(dimension.first().is_none());
        assert!(dimension.validate().is_err());
    }

    #[test]
    fn test_temporal_boundaries() {
        let boundaries = DomainBoundaries::temporal(state(&[0.0; 4]));
        assert!(boundaries.validate().is_ok());
        assert!(boundaries.is_time_dependent());
        assert_eq!(boundaries.initial_condition().unwrap(), &state(&[0.0; 4]));
    }

    #[test]
    fn test_default_boundaries_are_invalid() {
        let boundaries = DomainBoundaries::default();
        assert!(!boundaries.is_time_dependent());
        assert!(boundaries.initial_condition().is_none());
        assert!(boundaries.validate().is_err());
    }

    #[test]
    fn test_duplicate_dimension_names() {
        let boundaries = DomainBoundaries::new(vec![
            DimensionBoundary::new("t", vec![state(&[0.0])]),
            DimensionBoundary::new("t", vec![state(&[1.0])]),
        ]);
        let err = boundaries.validate().unwrap_err();
        assert!(err.to_string().contains("same name"));
    }
}
