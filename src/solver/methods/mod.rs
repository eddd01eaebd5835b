//! Numerical methods for solving differential equations
//!
//! This module contains concrete implementations of the [`Solver`](crate::solver::Solver) trait.
//!
//! # Available Methods
//!
//! - **[`DormandPrinceSolver`]**: Adaptive Dormand-Prince 5(4)
//!   - Order: fifth order with embedded fourth-order error estimate
//!   - Cost: 6 function evaluations per accepted step (FSAL)
//!   - Use: **Production simulations**, reports on a uniform output grid
//!
//! - **[`RK4Solver`]**: Classical fourth-order Runge-Kutta
//!   - Order: Fourth-order O(dt⁴)
//!   - Cost: 4 function evaluations per step
//!   - Use: Fixed-step cross-check of the adaptive method
//!
//! # Design
//!
//! Each solver is:
//! - **Self-contained**: No shared mutable state
//! - **Stateless**: Can be reused for multiple simulations and shared across threads

mod dopri5;
mod rk4;

// Re-exports for convenience
pub use dopri5::DormandPrinceSolver;
pub use rk4::RK4Solver;
