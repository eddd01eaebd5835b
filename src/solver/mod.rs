//! Numerical solvers
//!
//! This module provides traits and implementations for numerical solvers.
//! A numerical solver applies a numerical method to the equations provided by
//! a physical model within a specific scenario.
//!
//! # The Architecture (WHAT vs HOW)
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - Physical model (equations)
//!    - Domain boundaries (initial state)
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to solve
//!    - Solver type (fixed or adaptive time evolution)
//!    - Numerical parameters (steps, tolerances, output grid)
//!
//! 3. **Solver** (`Solver` trait) - The numerical method
//!    - Applies the numerical scheme
//!    - Returns the sampled solution
//!    - Independent of physics
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │  Physical Model │  (equations)
//! └────────┬────────┘
//!          │
//!          ├──────────────┐
//!          │              │
//! ┌────────▼────────┐ ┌──▼──────────────┐
//! │ Domain          │ │ Scenario        │ ← WHAT to solve
//! │ Boundaries      │ │ (model + bounds)│
//! └─────────────────┘ └────────┬────────┘
//!                              │
//!                     ┌────────▼─────────────┐
//!                     │ Solver Configuration │ ← HOW to solve
//!                     │ (type + parameters)  │
//!                     └────────┬─────────────┘
//!                              │
//!                     ┌────────▼──────────────┐
//!                     │ Numerical Solver      │ ← The method
//!                     │ (Dormand-Prince, RK4) │
//!                     └────────┬──────────────┘
//!                              │
//!                     ┌────────▼────────────┐
//!                     │ Simulation Result   │ ← The solution
//!                     │ (trajectory + meta) │
//!                     └─────────────────────┘
//! ```
//!
//! # Quick Start Example
//!
//! ```rust
//! use chrom_twin::models::{ColumnConfig, TankCascade};
//! use chrom_twin::solver::{DormandPrinceSolver, Scenario, Solver, SolverConfiguration};
//!
//! let model = TankCascade::new(&ColumnConfig::default(), 1.0).unwrap();
//! let scenario = Scenario::from_model(Box::new(model));
//!
//! // 21 samples, one every 0.1 min, internal step ≤ 0.05 min
//! let config = SolverConfiguration::adaptive_time_evolution(0.1, 21, 0.05, 1e-6, 1e-9);
//! let result = DormandPrinceSolver::new().solve(&scenario, &config).unwrap();
//!
//! assert_eq!(result.len(), 21);
//! ```
//!
//! # Error Handling
//!
//! All solver methods return [`crate::error::Result`]:
//! - invalid configuration or scenario → `TwinError::Configuration`
//! - NaN / Inf in the state, step budget exhausted → `TwinError::Simulation`

// =================================================================================================
// Module Declarations
// =================================================================================================
mod traits;
mod boundary;
mod scenario;
mod methods;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use traits::{
    SimulationResult,
    Solver,
    SolverConfiguration,
    SolverType,
};

pub use boundary::{DimensionBoundary, DomainBoundaries, TIME_DIMENSION};
pub use scenario::Scenario;

pub use methods::{DormandPrinceSolver, RK4Solver};

// =================================================================================================
// Helper Functions
// =================================================================================================

use crate::error::{Result, TwinError};
use crate::physics::PhysicalState;

/// Validate physical state for numerical issues
///
/// Checks that the state does not contain NaN or Inf values, which would
/// indicate numerical instability or errors in the physics computation.
///
/// # Arguments
///
/// * `state` - Physical state to validate
/// * `step` - Current step (for error reporting)
///
/// # Example
///
/// ```rust,ignore
/// validate_state(&state, 42)?;  // Validates state at step 42
/// ```
pub(crate) fn validate_state(state: &PhysicalState, step: usize) -> Result<()> {
    match state.first_non_finite() {
        Some(quantity) => Err(TwinError::simulation(format!(
            "Non-finite value detected in {} at step {} (t = {}). \
             The integration is unstable or the model produced NaN.",
            quantity,
            step,
            state.time()
        ))),
        None => Ok(()),
    }
}

// =================================================================================================
// Tests
// =================================================================================================
