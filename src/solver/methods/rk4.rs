//! Classical fourth-order Runge-Kutta method (RK4)
//!
//! # Mathematical Background
//!
//! For `dy/dt = f(y, t)`:
//!
//! ```text
//! k₁ = f(yₙ, tₙ)
//! k₂ = f(yₙ + dt/2·k₁, tₙ + dt/2)
//! k₃ = f(yₙ + dt/2·k₂, tₙ + dt/2)
//! k₄ = f(yₙ + dt·k₃, tₙ + dt)
//! yₙ₊₁ = yₙ + dt/6·(k₁ + 2k₂ + 2k₃ + k₄)
//! ```
//!
//! Fixed step, fourth order. Used as a cross-check of the adaptive
//! integrator: it has no error control, so `dt` must resolve both the
//! stage exchange rate and the edges of the feed pulse.

use crate::error::{Result, TwinError};
use crate::physics::PhysicalState;
use crate::solver::{validate_state, Scenario, SimulationResult, Solver, SolverConfiguration, SolverType};

// =================================================================================================
// RK4 Solver
// =================================================================================================

/// Fixed-step fourth-order Runge-Kutta integrator
///
/// Only accepts [`SolverType::TimeEvolution`]. Every step is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4Solver;

impl RK4Solver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for RK4Solver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration
    ) -> Result<SimulationResult> {

        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        let (total_time, time_steps) = match &config.solver_type {
            SolverType::TimeEvolution { total_time, time_steps } => {
                (*total_time, *time_steps)
            }
            other => {
                return Err(TwinError::configuration(format!(
                    "RK4Solver only supports TimeEvolution configuration, got {}",
                    other.name()
                )));
            }
        };

        // ====== Step 2: Setup ======

        let dt = total_time / (time_steps as f64);

        let mut state = match scenario.conditions.initial_condition() {
            Some(initial_state) => initial_state.clone(),
            None => return Err(TwinError::configuration("No initial condition found in domain boundaries")),
        };
        state.set_time(0.0);

        let mut time_points = Vec::with_capacity(time_steps + 1);
        let mut state_trajectory = Vec::with_capacity(time_steps + 1);

        time_points.push(0.0);
        state_trajectory.push(state.clone());

        // ====== Step 3: Time Integration ======

        let model = &scenario.model;

        for step in 0..time_steps {

            let t = (step as f64) * dt;

            // Stage 1: slope at beginning of interval
            let k1 = model.compute_physics(&state);

            // Stage 2: slope at midpoint using k₁
            let mut state_k2 = state.clone() + k1.clone() * (dt / 2.0);
            state_k2.set_time(t + dt / 2.0);
            let k2 = model.compute_physics(&state_k2);

            // Stage 3: slope at midpoint using k₂
            let mut state_k3 = state.clone() + k2.clone() * (dt / 2.0);
            state_k3.set_time(t + dt / 2.0);
            let k3 = model.compute_physics(&state_k3);

            // Stage 4: slope at end using k₃
            let mut state_k4 = state.clone() + k3.clone() * dt;
            state_k4.set_time(t + dt);
            let k4 = model.compute_physics(&state_k4);

            // ====== RK4 Update ======

            let weighted_slope = k1 + k2 * 2.0 + k3 * 2.0 + k4;
            state = state + weighted_slope * (dt / 6.0);

            // Computed from the index so the last point is exactly total_time
            let t_next = (step as f64 + 1.0) * dt;
            state.set_time(t_next);

            validate_state(&state, step + 1)?;

            time_points.push(t_next);
            state_trajectory.push(state.clone());
        }

        // ====== Step 4: Build Result ======

        let mut result = SimulationResult::new(time_points, state_trajectory, state);

        result.add_metadata("solver", self.name());
        result.add_metadata("time steps", &time_steps.to_string());
        result.add_metadata("dt", &dt.to_string());
        result.add_metadata("total time", &total_time.to_string());
        result.add_metadata("function evaluations", &(4 * time_steps).to_string());

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Runge Kutta (RK4)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
