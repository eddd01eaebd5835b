//! Search stages and the estimator that chains them
//!
//! The inverse problem is solved in two phases:
//!
//! ```text
//! ┌──────────────┐  seed   ┌───────────────┐  refined
//! │  SeedStage   │ ──────► │  RefineStage  │ ─────────► EstimationResult
//! │ (global)     │         │ (local)       │
//! └──────────────┘         └───────────────┘
//! ```
//!
//! Any seed stage can be combined with any refine stage.

use crate::error::{Result, TwinError};
use crate::estimation::objective::{AgingObjective, Loss};

/// One scored aging hypothesis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub aging: f64,
    pub loss: Loss,
}

impl Candidate {
    pub fn new(aging: f64, loss: Loss) -> Self {
        Self { aging, loss }
    }

    /// Evaluate `aging` against `objective`
    pub fn evaluate(objective: &AgingObjective<'_>, aging: f64) -> Result<Self> {
        Ok(Self::new(aging, objective.evaluate(aging)?))
    }
}

/// Outcome of a local refinement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refinement {
    /// Best point found
    pub best: Candidate,

    /// Iterations performed
    pub iterations: usize,

    /// `false` when a budget ran out before the tolerances were met
    pub converged: bool,
}

/// Global phase: produce a starting point
pub trait SeedStage {
    fn seed(&self, objective: &AgingObjective<'_>) -> Result<Candidate>;

    fn name(&self) -> &'static str;
}

/// Local phase: improve a starting point
pub trait RefineStage {
    fn refine(&self, objective: &AgingObjective<'_>, seed: Candidate) -> Result<Refinement>;

    fn name(&self) -> &'static str;
}

// =================================================================================================
// Estimation result
// =================================================================================================

/// Recovered aging factor plus diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimationResult {
    /// Refined aging factor
    pub aging_estimate: f64,

    /// Loss at `aging_estimate`
    pub residual_error: f64,

    /// Starting point produced by the seed stage
    pub seed: Candidate,

    /// Refinement iterations
    pub iterations: usize,

    /// Whether the refinement met its tolerances
    pub converged: bool,

    /// Total simulations over both phases
    pub simulations: usize,
}

// =================================================================================================
// Estimator
// =================================================================================================

/// Seed stage followed by refine stage
///
/// # Example
///
/// ```rust,no_run
/// use chrom_twin::estimation::{AgingEstimator, AgingObjective, CoarseGrid, LossWeighting, NelderMead};
/// use chrom_twin::models::ColumnConfig;
/// use chrom_twin::simulation::{simulate, SimulationSettings};
///
/// let config = ColumnConfig::default();
/// let observed = simulate(&config, 0.65, &SimulationSettings::default()).unwrap();
/// let objective = AgingObjective::new(&observed, config, LossWeighting::Uniform).unwrap();
///
/// let estimator = AgingEstimator::new(CoarseGrid::default(), NelderMead::default());
/// let result = estimator.estimate(&objective).unwrap();
/// assert!((result.aging_estimate - 0.65).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgingEstimator<S, R> {
    pub seed_stage: S,
    pub refine_stage: R,
}

impl<S: SeedStage, R: RefineStage> AgingEstimator<S, R> {
    pub fn new(seed_stage: S, refine_stage: R) -> Self {
        Self { seed_stage, refine_stage }
    }

    /// Run both phases against `objective`
    ///
    /// # Errors
    ///
    /// - any simulation failure
    /// - the seed stage found no feasible point
    /// - the refinement ended on an infeasible point
    pub fn estimate(&self, objective: &AgingObjective<'_>) -> Result<EstimationResult> {
        let seed = self.seed_stage.seed(objective)?;
        if !seed.loss.is_feasible() {
            return Err(TwinError::estimation(format!(
                "{} produced an infeasible seed ({})",
                self.seed_stage.name(),
                seed.aging
            )));
        }

        log::info!(
            "{}: seed aging {:.4} (loss {})",
            self.seed_stage.name(),
            seed.aging,
            seed.loss
        );

        let refinement = self.refine_stage.refine(objective, seed)?;
        let residual_error = refinement.best.loss.value().ok_or_else(|| {
            TwinError::estimation(format!(
                "{} ended on an infeasible point ({})",
                self.refine_stage.name(),
                refinement.best.aging
            ))
        })?;

        let result = EstimationResult {
            aging_estimate: refinement.best.aging,
            residual_error,
            seed,
            iterations: refinement.iterations,
            converged: refinement.converged,
            simulations: objective.simulations(),
        };

        log::info!(
            "{}: aging {:.6}, residual {:.6e}, {} iterations, {} simulations",
            self.refine_stage.name(),
            result.aging_estimate,
            result.residual_error,
            result.iterations,
            result.simulations
        );

        Ok(result)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
