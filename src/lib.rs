//! chrom-twin: digital twin of an aging separation column
//!
//! Estimates how far a chromatography column has aged from its outlet signal
//! and recommends when to start collecting product.
//!
//! # Architecture
//!
//! The crate keeps the physics and the numerics apart:
//!
//! - [`models`] define the equations (a tanks-in-series cascade)
//! - [`solver`] integrates them (adaptive Dormand-Prince, fixed-step RK4)
//!
//! On top of those, the twin pipeline:
//!
//! ```text
//! raw signal ──► denoise ──► estimate_aging ──► decide_control ──► cut point
//!                               │
//!                               └── simulate (one run per hypothesis)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chrom_twin::{decide_control, denoise, estimate_aging, simulate};
//! use chrom_twin::estimation::LossWeighting;
//! use chrom_twin::models::ColumnConfig;
//! use chrom_twin::noise::add_gaussian_noise;
//! use chrom_twin::simulation::SimulationSettings;
//!
//! # fn main() -> chrom_twin::Result<()> {
//! let config = ColumnConfig::default();
//!
//! // plant data: aged column plus sensor noise
//! let clean = simulate(&config, 0.65, &SimulationSettings::default())?;
//! let measured = add_gaussian_noise(&clean, 0.7, 42)?;
//!
//! let (filtered, _plan) = denoise(&measured, 100)?;
//! let estimation = estimate_aging(&filtered, &config, LossWeighting::ConcentrationWeighted)?;
//! let decision = decide_control(&estimation, &config)?;
//!
//! println!("aging {:.3}, cut at {:.2} min", estimation.aging_estimate, decision.cut_point);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: model trait and state containers
//! - [`models`]: column configuration and transport model
//! - [`solver`]: scenarios and integrators
//! - [`simulation`]: one simulation per `(config, aging)` pair
//! - [`denoise`]: adaptive zero-phase Savitzky-Golay filter
//! - [`estimation`]: two-phase aging estimator
//! - [`control`]: cut-point decision
//! - [`evaluation`]: scoring against a known truth
//! - [`noise`]: synthetic sensor noise

pub mod error;

// Core modules
pub mod physics;
pub mod models;
pub mod solver;

// Twin pipeline
pub mod simulation;
pub mod denoise;
pub mod estimation;
pub mod control;
pub mod evaluation;
pub mod noise;

pub use control::decide_control;
pub use denoise::denoise;
pub use error::{Result, TwinError};
pub use estimation::estimate_aging;
pub use simulation::simulate;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use chrom_twin::prelude::*;
    //! ```
    pub use crate::control::{decide_control, ControlDecision, MarginSchedule};
    pub use crate::denoise::{denoise, DenoiseSettings, FilterPlan};
    pub use crate::error::{Result, TwinError};
    pub use crate::estimation::{estimate_aging, EstimationResult, LossWeighting};
    pub use crate::evaluation::PerformanceReport;
    pub use crate::models::ColumnConfig;
    pub use crate::noise::add_gaussian_noise;
    pub use crate::simulation::{simulate, SimulationSettings, Trajectory};
}
