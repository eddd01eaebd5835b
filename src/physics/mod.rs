//! Physical models
//!
//! This module provides traits and types for physical models.
//! A physical model encapsulates the equations of a system
//! (here: transport through a cascade of well-mixed stages).
//!
//! # Core Concepts
//!
//! - **Physical Model**: Computes the right-hand side of the equations at a given state
//! - **Physical State**: Container for all physical quantities plus metadata (time)
//! - **Physical Quantity**: Type-safe identifier for physical variables
//!
//! # Architecture
//!
//! Physical models are **separate from numerical solvers**:
//! - The model provides the **equations** (physics)
//! - The solver provides the **method** to integrate them (numerics)
//!
//! # Example
//!
//! ```rust
//! use chrom_twin::physics::{PhysicalModel, PhysicalState, PhysicalQuantity, PhysicalData};
//!
//! struct Decay;
//!
//! impl PhysicalModel for Decay {
//!     fn points(&self) -> usize { 1 }
//!     fn compute_physics(&self, state: &PhysicalState) -> PhysicalState { state.clone() * -1.0 }
//!     fn setup_initial_state(&self) -> PhysicalState {
//!         PhysicalState::new(PhysicalQuantity::Concentration, PhysicalData::from_vec(vec![1.0]))
//!     }
//!     fn name(&self) -> &str { "Decay" }
//! }
//!
//! let model = Decay;
//! let initial_state = model.setup_initial_state();
//! let rate = model.compute_physics(&initial_state);
//! assert_eq!(rate.get(PhysicalQuantity::Concentration).unwrap().as_slice(), &[-1.0]);
//! ```

// module declaration
pub mod traits;
pub mod data;

// re-export commonly used types for convenience
pub use data::PhysicalData;
pub use traits::{
    PhysicalModel,
    PhysicalQuantity,
    PhysicalState,
    TIME_KEY,
};
