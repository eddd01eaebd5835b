//! Aging-factor objective
//!
//! Scores a hypothesised aging factor by simulating the column and comparing
//! the target outlet with the observed one.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, TwinError};
use crate::models::ColumnConfig;
use crate::simulation::{simulate, SimulationSettings, Trajectory};

/// Largest aging factor the estimator will consider
pub const MAX_AGING: f64 = 2.0;

/// `true` for aging factors in `(0, MAX_AGING]`
pub fn is_feasible(aging: f64) -> bool {
    aging.is_finite() && aging > 0.0 && aging <= MAX_AGING
}

// =================================================================================================
// Loss
// =================================================================================================

/// Outcome of scoring one hypothesis
///
/// Out-of-domain hypotheses are not simulated; they are `Infeasible` and rank
/// behind every feasible loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Loss {
    /// Mean (weighted) squared error
    Feasible(f64),

    /// Aging factor outside `(0, MAX_AGING]`
    Infeasible,
}

impl Loss {
    /// Value used for ranking: the error itself, `+∞` when infeasible
    pub fn score(&self) -> f64 {
        match self {
            Loss::Feasible(value) => *value,
            Loss::Infeasible => f64::INFINITY,
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, Loss::Feasible(_))
    }

    /// The error, if feasible
    pub fn value(&self) -> Option<f64> {
        match self {
            Loss::Feasible(value) => Some(*value),
            Loss::Infeasible => None,
        }
    }

    /// Inverse of [`score`](Self::score)
    pub fn from_score(score: f64) -> Self {
        if score.is_finite() {
            Loss::Feasible(score)
        } else {
            Loss::Infeasible
        }
    }
}

impl std::fmt::Display for Loss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Loss::Feasible(value) => write!(f, "{value:.6e}"),
            Loss::Infeasible => write!(f, "infeasible"),
        }
    }
}

/// Per-sample weight of the squared error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LossWeighting {
    /// Plain mean squared error
    #[default]
    Uniform,

    /// Squared error × `(observed + 1)`: emphasises the peak over the
    /// baseline, used on denoised measurements
    ConcentrationWeighted,
}

impl LossWeighting {
    fn weight(&self, observed: f64) -> f64 {
        match self {
            LossWeighting::Uniform => 1.0,
            LossWeighting::ConcentrationWeighted => observed + 1.0,
        }
    }
}

// =================================================================================================
// Objective
// =================================================================================================

/// Loss of an aging hypothesis against an observed trajectory
///
/// Counts the simulations it performs, so callers can check that infeasible
/// hypotheses were short-circuited. Safe to share across threads.
///
/// # Example
///
/// ```rust
/// use chrom_twin::estimation::{AgingObjective, Loss, LossWeighting};
/// use chrom_twin::models::ColumnConfig;
/// use chrom_twin::simulation::Trajectory;
///
/// let observed = Trajectory::new(vec![0.0, 0.1], vec![0.0, 0.0], vec![0.0, 0.0]).unwrap();
/// // the simulation grid follows the observation: two samples, 0.1 min apart
/// let objective = AgingObjective::new(&observed, ColumnConfig::default(), LossWeighting::Uniform).unwrap();
///
/// assert_eq!(objective.evaluate(-1.0).unwrap(), Loss::Infeasible);
/// assert_eq!(objective.simulations(), 0);
/// ```
#[derive(Debug)]
pub struct AgingObjective<'a> {
    observed: &'a Trajectory,
    config: ColumnConfig,
    settings: SimulationSettings,
    weighting: LossWeighting,
    simulations: AtomicUsize,
}

impl<'a> AgingObjective<'a> {
    /// Objective on the observation's own time grid
    ///
    /// The simulation horizon and sampling are taken from `observed`:
    /// `dt = time[1] - time[0]` and `t_max = len · dt`, with the default
    /// integrator tolerances. A single sample uses the default `dt`.
    ///
    /// # Errors
    ///
    /// - invalid `config`
    /// - empty or non-finite observed target channel
    /// - observed time grid not of the form `k · dt`
    pub fn new(observed: &'a Trajectory, config: ColumnConfig, weighting: LossWeighting) -> Result<Self> {
        config.validate()?;

        if observed.is_empty() {
            return Err(TwinError::estimation("observed trajectory is empty"));
        }
        if let Some(index) = observed.target().iter().position(|v| !v.is_finite()) {
            return Err(TwinError::estimation(format!(
                "observed target is not finite at sample {index}"
            )));
        }

        let settings = observed_settings(observed)?;
        check_grid(observed, &settings)?;

        Ok(Self {
            observed,
            config,
            settings,
            weighting,
            simulations: AtomicUsize::new(0),
        })
    }

    /// Replace the simulation settings
    ///
    /// # Errors
    ///
    /// - invalid `settings`
    /// - `settings.sample_times()` differs from the observed time grid
    pub fn with_settings(mut self, settings: SimulationSettings) -> Result<Self> {
        settings.validate()?;
        check_grid(self.observed, &settings)?;
        self.settings = settings;
        Ok(self)
    }

    pub fn config(&self) -> &ColumnConfig {
        &self.config
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn weighting(&self) -> LossWeighting {
        self.weighting
    }

    pub fn observed(&self) -> &Trajectory {
        self.observed
    }

    /// Number of simulations run so far
    pub fn simulations(&self) -> usize {
        self.simulations.load(Ordering::Relaxed)
    }

    /// Score an aging hypothesis
    ///
    /// # Errors
    ///
    /// - simulation failure (never turned into `Infeasible`)
    /// - simulated and observed trajectories of different lengths
    pub fn evaluate(&self, aging: f64) -> Result<Loss> {
        if !is_feasible(aging) {
            return Ok(Loss::Infeasible);
        }

        self.simulations.fetch_add(1, Ordering::Relaxed);
        let simulated = simulate(&self.config, aging, &self.settings)?;

        if simulated.len() != self.observed.len() {
            return Err(TwinError::estimation(format!(
                "simulation produced {} samples, observation has {}",
                simulated.len(),
                self.observed.len()
            )));
        }

        let total: f64 = self
            .observed
            .target()
            .iter()
            .zip(simulated.target())
            .map(|(obs, sim)| (obs - sim) * (obs - sim) * self.weighting.weight(*obs))
            .sum();

        Ok(Loss::Feasible(total / self.observed.len() as f64))
    }
}

/// Horizon and sampling implied by the observed time column
fn observed_settings(observed: &Trajectory) -> Result<SimulationSettings> {
    let time = observed.time();
    let dt = match time {
        [first, second, ..] => second - first,
        _ => SimulationSettings::default().dt,
    };

    if !dt.is_finite() || dt <= 0.0 {
        return Err(TwinError::estimation(format!(
            "observed time grid must be increasing, got a first step of {dt}"
        )));
    }

    Ok(SimulationSettings::new(time.len() as f64 * dt, dt))
}

/// The observation must be sampled at exactly the times the simulation reports
fn check_grid(observed: &Trajectory, settings: &SimulationSettings) -> Result<()> {
    let expected = settings.sample_times();

    if expected.len() != observed.len() {
        return Err(TwinError::estimation(format!(
            "settings sample {} points (t_max {}, dt {}), observation has {}",
            expected.len(),
            settings.t_max,
            settings.dt,
            observed.len()
        )));
    }

    let tolerance = 1e-9 * settings.dt;
    let mismatch = observed
        .time()
        .iter()
        .zip(&expected)
        .position(|(obs, sim)| !obs.is_finite() || (obs - sim).abs() > tolerance);

    match mismatch {
        Some(index) => Err(TwinError::estimation(format!(
            "observed time {} at sample {index} is off the simulation grid (expected {})",
            observed.time()[index],
            expected[index]
        ))),
        None => Ok(()),
    }
}

// =================================================================================================
// Tests
// =================================================================================================
