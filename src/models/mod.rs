//! Physical models of the separation column
//!
//! All models implement the [`PhysicalModel`](crate::physics::PhysicalModel) trait.
//! The solver calls `compute_physics` at each stage of each step. Models are
//! responsible for the physics (stage exchange, feed), the solver for the time
//! integration.
//!
//! # Available Models
//!
//! ## [`TankCascade`]: two species, tanks in series
//!
//! Target and impurity travel through the same cascade of ideally mixed
//! stages. The aging factor of the column inflates each species' effective
//! stage volume, which sets how fast the species breaks through.
//!
//! # Injection
//!
//! [`TemporalInjection`] defines the feed concentration at the inlet as a
//! function of time. The solver writes the current time into the
//! `PhysicalState` metadata before each call to `compute_physics`.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod injection;
pub mod cascade;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use injection::TemporalInjection;
pub use cascade::{
    CascadeSpecies,
    ColumnConfig,
    TankCascade,
    IMPURITY_FEED,
    PULSE_END,
    PULSE_START,
    TARGET_FEED,
};
