//! Simulation scenario definition
//!
//! A scenario combines a physical model with boundary conditions.
use crate::error::{Result, TwinError};
use crate::physics::PhysicalModel;
use crate::solver::boundary::DomainBoundaries;

/// Simulation scenario
///
/// Defines a specific case to simulate:
/// - Physical model (equations)
/// - Boundary conditions (initial state)
///
/// The same scenario can be solved with different numerical methods.
/// This is the "WHAT to solve" (not "HOW to solve").
pub struct Scenario {
    /// Physical model (equations)
    pub model: Box<dyn PhysicalModel>,

    /// Conditions and boundaries
    pub conditions: DomainBoundaries,
}

impl Scenario {
    /// Create a scenario
    pub fn new(model: Box<dyn PhysicalModel>, conditions: DomainBoundaries) -> Self {
        Self { model, conditions }
    }

    /// Create a scenario starting from the model's own initial state
    pub fn from_model(model: Box<dyn PhysicalModel>) -> Self {
        let conditions = DomainBoundaries::temporal(model.setup_initial_state());
        Self::new(model, conditions)
    }

    /// Verify boundaries, and that the initial state matches the model size
    pub fn validate(&self) -> Result<()> {
        self.conditions.validate()?;

        if let Some(initial) = self.conditions.initial_condition() {
            let points = self.model.points();
            for (quantity, data) in initial.iter() {
                if data.is_vector() && data.len() != points {
                    return Err(TwinError::configuration(format!(
                        "Initial {} has {} values, model '{}' expects {}",
                        quantity,
                        data.len(),
                        self.model.name(),
                        points
                    )));
                }
            }
        }

        Ok(())
    }

    /// Get model name
    pub fn get_model_name(&self) -> &str {
        self.model.name()
    }

    /// Time dependent equations
    pub fn is_time_dependent(&self) -> bool {
        self.conditions.is_time_dependent()
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.get_model_name())
            .field("points", &self.model.points())
            .field("is time dependent", &self.is_time_dependent())
            .field("Boundaries / conditions", &self.conditions)
            .finish()
    }
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{PhysicalData, PhysicalQuantity, PhysicalState};

    struct MockModel;

    impl PhysicalModel for MockModel {
        fn points(&self) -> usize {
            10
        }

        fn compute_physics(&self, state: &PhysicalState) -> PhysicalState {
            state.clone()
        }

        fn setup_initial_state(&self) -> PhysicalState {
            PhysicalState::new(PhysicalQuantity::Concentration, PhysicalData::uniform_vector(10, 0.0))
        }

        fn name(&self) -> &str {
            "MockModel"
        }
    }

    #[test]
    fn test_scenario_creation() {
        let scenario = Scenario::from_model(Box::new(MockModel));
        assert_eq!(scenario.get_model_name(), "MockModel");
        assert!(scenario.is_time_dependent());
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_scenario_rejects_size_mismatch() {
        let initial = PhysicalState::new(PhysicalQuantity::Concentration, PhysicalData::uniform_vector(3, 0.0));
        let scenario = Scenario::new(Box::new(MockModel), DomainBoundaries::temporal(initial));

        let err = scenario.validate().unwrap_err();
        assert!(err.to_string().contains("expects 10"));
    }

    #[test]
    fn test_scenario_without_boundaries() {
        let scenario = Scenario::new(Box::new(MockModel), DomainBoundaries::default());
        assert!(scenario.validate().is_err());
    }
}
