//! Inverse estimation of the aging factor
//!
//! Given an observed outlet trajectory, find the aging factor whose
//! simulation reproduces it best.
//!
//! # Components
//!
//! - [`AgingObjective`]: simulate one hypothesis and score it ([`Loss`])
//! - [`CoarseGrid`]: global phase, 20 points over `[0.1, 2.0]`
//! - [`NelderMead`]: local phase, simplex refinement from the grid winner
//! - [`AgingEstimator`]: chains any [`SeedStage`] with any [`RefineStage`]
//!
//! # Example
//!
//! ```rust,no_run
//! use chrom_twin::estimation::{estimate_aging, LossWeighting};
//! use chrom_twin::models::ColumnConfig;
//! use chrom_twin::simulation::{simulate, SimulationSettings};
//!
//! let config = ColumnConfig::default();
//! let observed = simulate(&config, 0.65, &SimulationSettings::default()).unwrap();
//!
//! let result = estimate_aging(&observed, &config, LossWeighting::Uniform).unwrap();
//! println!("aging {:.4} after {} simulations", result.aging_estimate, result.simulations);
//! ```

mod coarse;
mod nelder_mead;
mod objective;
mod stages;

pub use coarse::CoarseGrid;
pub use nelder_mead::{Minimum, NelderMead};
pub use objective::{is_feasible, AgingObjective, Loss, LossWeighting, MAX_AGING};
pub use stages::{AgingEstimator, Candidate, EstimationResult, RefineStage, Refinement, SeedStage};

use crate::error::Result;
use crate::models::ColumnConfig;
use crate::simulation::Trajectory;

impl Default for AgingEstimator<CoarseGrid, NelderMead> {
    fn default() -> Self {
        Self::new(CoarseGrid::default(), NelderMead::default())
    }
}

/// Estimate the aging factor behind `observed`
///
/// Coarse grid then Nelder-Mead. Candidates are simulated on the observed
/// time grid, which must be uniform and start at 0 (see [`AgingObjective::new`]).
///
/// # Errors
///
/// - invalid configuration or observation, including an irregular time grid
/// - any simulation failure
/// - no feasible seed
pub fn estimate_aging(
    observed: &Trajectory,
    config: &ColumnConfig,
    weighting: LossWeighting,
) -> Result<EstimationResult> {
    let objective = AgingObjective::new(observed, *config, weighting)?;
    AgingEstimator::default().estimate(&objective)
}
