//! Simulation engine
//!
//! Integrates the [`TankCascade`] for one `(config, aging_factor)` pair and
//! exposes the outlet of both species as a [`Trajectory`].
//!
//! # Example
//!
//! ```rust
//! use chrom_twin::models::ColumnConfig;
//! use chrom_twin::simulation::{simulate, SimulationSettings};
//!
//! let settings = SimulationSettings::new(60.0, 0.1);
//! let trajectory = simulate(&ColumnConfig::default(), 0.65, &settings).unwrap();
//!
//! assert_eq!(trajectory.len(), 600);
//! let (peak_time, _) = trajectory.peak().unwrap();
//! assert!(peak_time > 30.0 && peak_time < 55.0);
//! ```

use crate::error::{Result, TwinError};
use crate::models::{ColumnConfig, TankCascade};
use crate::physics::PhysicalQuantity;
use crate::solver::{
    DormandPrinceSolver, RK4Solver, Scenario, SimulationResult, Solver, SolverConfiguration, SolverType,
};

// =================================================================================================
// Trajectory
// =================================================================================================

/// Outlet concentrations of both species on a uniform time grid
///
/// Samples are `time[k] = k · dt`. The three columns always have the same
/// length.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    time: Vec<f64>,
    target: Vec<f64>,
    impurity: Vec<f64>,
}

impl Trajectory {
    /// Build a trajectory from its columns
    ///
    /// # Errors
    ///
    /// Columns of different lengths.
    pub fn new(time: Vec<f64>, target: Vec<f64>, impurity: Vec<f64>) -> Result<Self> {
        if time.len() != target.len() || time.len() != impurity.len() {
            return Err(TwinError::configuration(format!(
                "trajectory columns differ in length: time {}, target {}, impurity {}",
                time.len(),
                target.len(),
                impurity.len()
            )));
        }

        Ok(Self { time, target, impurity })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sample times \[min\]
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Target outlet concentration
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Impurity outlet concentration
    pub fn impurity(&self) -> &[f64] {
        &self.impurity
    }

    /// Same time grid and impurity, new target channel
    ///
    /// # Errors
    ///
    /// `target` does not have one value per sample.
    pub fn with_target(&self, target: Vec<f64>) -> Result<Self> {
        Self::new(self.time.clone(), target, self.impurity.clone())
    }

    /// `(time, value)` of the target maximum
    ///
    /// Ties resolve to the earliest sample. `None` for an empty trajectory.
    pub fn peak(&self) -> Option<(f64, f64)> {
        let mut best: Option<(usize, f64)> = None;

        for (index, &value) in self.target.iter().enumerate() {
            match best {
                Some((_, current)) if value <= current => {}
                _ => best = Some((index, value)),
            }
        }

        best.map(|(index, value)| (self.time[index], value))
    }

    /// Time of the target maximum
    pub fn peak_time(&self) -> Option<f64> {
        self.peak().map(|(time, _)| time)
    }
}

// =================================================================================================
// Settings
// =================================================================================================

/// Largest internal integrator step accepted by [`SimulationSettings`] \[min\]
pub const MAX_INTERNAL_STEP: f64 = 0.05;

/// Horizon, sampling and integrator tolerances
///
/// | Field       | Default     |
/// |-------------|-------------|
/// | `t_max`     | 100.0 min   |
/// | `dt`        | 0.1 min     |
/// | `max_step`  | 0.05 min    |
/// | `rtol`      | 1e-6        |
/// | `atol`      | 1e-9        |
/// | `max_steps` | 1 000 000   |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    /// Horizon, exclusive \[min\]
    pub t_max: f64,

    /// Sample spacing \[min\]
    pub dt: f64,

    /// Upper bound on the internal integrator step \[min\], at most
    /// [`MAX_INTERNAL_STEP`]
    pub max_step: f64,

    pub rtol: f64,

    pub atol: f64,

    /// Safety limit on integrator steps (accepted + rejected)
    pub max_steps: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            t_max: 100.0,
            dt: 0.1,
            max_step: MAX_INTERNAL_STEP,
            rtol: 1e-6,
            atol: 1e-9,
            max_steps: SolverConfiguration::DEFAULT_MAX_STEPS,
        }
    }
}

impl SimulationSettings {
    /// Default tolerances with a custom horizon and sampling
    pub fn new(t_max: f64, dt: f64) -> Self {
        Self { t_max, dt, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.t_max.is_finite() || self.t_max <= 0.0 {
            return Err(TwinError::configuration(format!(
                "t_max must be finite and positive, got {}",
                self.t_max
            )));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(TwinError::configuration(format!(
                "dt must be finite and positive, got {}",
                self.dt
            )));
        }
        if self.max_step > MAX_INTERNAL_STEP {
            return Err(TwinError::configuration(format!(
                "max_step must not exceed {MAX_INTERNAL_STEP} min, got {}",
                self.max_step
            )));
        }
        self.solver_configuration().validate()
    }

    /// Number of samples covering `[0, t_max)`
    pub fn sample_count(&self) -> usize {
        // t_max / dt is often a hair above an integer (100 / 0.1)
        ((self.t_max / self.dt) * (1.0 - 1e-12)).ceil() as usize
    }

    /// Sample times `k · dt`
    pub fn sample_times(&self) -> Vec<f64> {
        (0..self.sample_count()).map(|k| k as f64 * self.dt).collect()
    }

    fn solver_configuration(&self) -> SolverConfiguration {
        SolverConfiguration::new(SolverType::AdaptiveTimeEvolution {
            output_interval: self.dt,
            output_samples: self.sample_count(),
            max_step: self.max_step,
            rtol: self.rtol,
            atol: self.atol,
            max_steps: self.max_steps,
        })
    }
}

// =================================================================================================
// Simulation
// =================================================================================================

/// Simulate the column for one aging factor
///
/// Starts from an empty column and integrates with the adaptive
/// Dormand-Prince solver. Stateless: equal inputs give bit-identical output.
///
/// # Errors
///
/// - invalid `config`, `settings`, or an aging factor that is not finite and
///   strictly positive → `TwinError::Configuration`
/// - integration failure → `TwinError::Simulation`
pub fn simulate(config: &ColumnConfig, aging_factor: f64, settings: &SimulationSettings) -> Result<Trajectory> {
    settings.validate()?;
    let model = TankCascade::new(config, aging_factor)?;
    let outlets = (model.target_outlet_index(), model.impurity_outlet_index());

    let scenario = Scenario::from_model(Box::new(model));
    let result = DormandPrinceSolver::new().solve(&scenario, &settings.solver_configuration())?;

    log::debug!(
        "simulated aging {:.6}: {} samples, {} accepted / {} rejected steps",
        aging_factor,
        result.len(),
        result.get_metadata("accepted steps").unwrap_or("?"),
        result.get_metadata("rejected steps").unwrap_or("?")
    );

    outlet_trajectory(&result, settings, 1, outlets)
}

/// [`simulate`] with default tolerances over `[0, t_max)` sampled every `dt`
pub fn simulate_horizon(config: &ColumnConfig, aging_factor: f64, t_max: f64, dt: f64) -> Result<Trajectory> {
    simulate(config, aging_factor, &SimulationSettings::new(t_max, dt))
}

/// Simulate with the fixed-step RK4 integrator
///
/// Each sample interval is split into `substeps` equal steps. Tolerances in
/// `settings` are ignored. Used to cross-check [`simulate`].
pub fn simulate_fixed_step(
    config: &ColumnConfig,
    aging_factor: f64,
    settings: &SimulationSettings,
    substeps: usize,
) -> Result<Trajectory> {
    settings.validate()?;
    if substeps == 0 {
        return Err(TwinError::configuration("substeps must be at least 1"));
    }

    let model = TankCascade::new(config, aging_factor)?;
    let outlets = (model.target_outlet_index(), model.impurity_outlet_index());
    let samples = settings.sample_count();

    if samples < 2 {
        // empty column at t = 0
        return Trajectory::new(vec![0.0], vec![0.0], vec![0.0]);
    }

    let intervals = samples - 1;
    let scenario = Scenario::from_model(Box::new(model));
    let configuration = SolverConfiguration::time_evolution(intervals as f64 * settings.dt, intervals * substeps);
    let result = RK4Solver::new().solve(&scenario, &configuration)?;

    outlet_trajectory(&result, settings, substeps, outlets)
}

/// Pick every `stride`-th state and read both outlets
fn outlet_trajectory(
    result: &SimulationResult,
    settings: &SimulationSettings,
    stride: usize,
    (target_index, impurity_index): (usize, usize),
) -> Result<Trajectory> {
    let samples = settings.sample_count();
    let mut target = Vec::with_capacity(samples);
    let mut impurity = Vec::with_capacity(samples);

    for state in result.trajectory.iter().step_by(stride).take(samples) {
        let concentration = state
            .get(PhysicalQuantity::Concentration)
            .ok_or_else(|| TwinError::simulation("solver returned a state without concentration"))?
            .as_slice();

        match (concentration.get(target_index), concentration.get(impurity_index)) {
            (Some(&t), Some(&i)) => {
                target.push(t);
                impurity.push(i);
            }
            _ => {
                return Err(TwinError::simulation(format!(
                    "state of length {} has no outlet at {} / {}",
                    concentration.len(),
                    target_index,
                    impurity_index
                )))
            }
        }
    }

    if target.len() != samples {
        return Err(TwinError::simulation(format!(
            "solver reported {} samples, expected {}",
            target.len(),
            samples
        )));
    }

    Trajectory::new(settings.sample_times(), target, impurity)
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn short() -> SimulationSettings {
        SimulationSettings::new(20.0, 0.1)
    }

    #[test]
    fn test_default_settings() {
        let settings = SimulationSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.sample_count(), 1000);

        let times = settings.sample_times();
        assert_eq!(times[0], 0.0);
        assert_eq!(times[999], 999.0 * 0.1);
    }

    #[test]
    fn test_sample_count_rounding() {
        assert_eq!(SimulationSettings::new(1.0, 0.3).sample_count(), 4);
        assert_eq!(SimulationSettings::new(0.05, 0.1).sample_count(), 1);
        assert_eq!(SimulationSettings::new(10.0, 0.1).sample_count(), 100);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(SimulationSettings::new(0.0, 0.1).validate().is_err());
        assert!(SimulationSettings::new(10.0, -0.1).validate().is_err());
        let settings = SimulationSettings { max_step: 0.0, ..SimulationSettings::default() };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_max_step_limit() {
        let coarse = SimulationSettings { max_step: 2.0, ..SimulationSettings::default() };
        let err = coarse.validate().unwrap_err();
        assert!(matches!(err, TwinError::Configuration(_)));
        assert!(simulate(&ColumnConfig::default(), 1.0, &coarse).is_err());

        let finer = SimulationSettings { max_step: 0.01, ..short() };
        assert!(finer.validate().is_ok());
        let at_limit = SimulationSettings { max_step: MAX_INTERNAL_STEP, ..short() };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_trajectory_length_mismatch() {
        let err = Trajectory::new(vec![0.0, 0.1], vec![0.0], vec![0.0, 0.0]).unwrap_err();
        assert!(matches!(err, TwinError::Configuration(_)));
    }

    #[test]
    fn test_peak_first_occurrence() {
        let trajectory = Trajectory::new(
            vec![0.0, 1.0, 2.0, 3.0],
            vec![0.0, 2.0, 2.0, 1.0],
            vec![0.0; 4],
        )
        .unwrap();

        assert_eq!(trajectory.peak(), Some((1.0, 2.0)));
        assert_eq!(trajectory.peak_time(), Some(1.0));
    }

    #[test]
    fn test_peak_of_empty_trajectory() {
        let trajectory = Trajectory::new(vec![], vec![], vec![]).unwrap();
        assert!(trajectory.is_empty());
        assert_eq!(trajectory.peak(), None);
    }

    #[test]
    fn test_with_target() {
        let trajectory = Trajectory::new(vec![0.0, 1.0], vec![1.0, 2.0], vec![3.0, 4.0]).unwrap();
        let replaced = trajectory.with_target(vec![5.0, 6.0]).unwrap();
        assert_eq!(replaced.target(), &[5.0, 6.0]);
        assert_eq!(replaced.impurity(), &[3.0, 4.0]);
        assert!(trajectory.with_target(vec![1.0]).is_err());
    }

    #[test]
    fn test_simulate_rejects_bad_aging() {
        let config = ColumnConfig::default();
        for aging in [0.0, -1.0, f64::NAN] {
            let err = simulate(&config, aging, &short()).unwrap_err();
            assert!(matches!(err, TwinError::Configuration(_)));
        }
    }

    #[test]
    fn test_simulate_starts_empty_and_stays_non_negative() {
        let trajectory = simulate(&ColumnConfig::default(), 1.0, &short()).unwrap();

        assert_eq!(trajectory.len(), 200);
        assert_eq!(trajectory.target()[0], 0.0);
        assert_eq!(trajectory.impurity()[0], 0.0);
        assert!(trajectory.target().iter().all(|&c| c > -1e-6));
        assert!(trajectory.impurity().iter().all(|&c| c > -1e-6));
    }

    #[test]
    fn test_impurity_elutes_first() {
        // smaller rate constant, smaller effective volume, earlier peak
        let settings = SimulationSettings::new(100.0, 0.1);
        let trajectory = simulate(&ColumnConfig::default(), 1.0, &settings).unwrap();

        let target_peak = trajectory.peak_time().unwrap();
        let impurity_peak = trajectory
            .impurity()
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &c)| if c > best.1 { (i, c) } else { best })
            .0 as f64
            * 0.1;
        assert!(impurity_peak < target_peak);
    }

    #[test]
    fn test_eluted_amount_matches_dose() {
        let config = ColumnConfig::default();
        let model = TankCascade::new(&config, 0.65).unwrap();
        let settings = SimulationSettings::new(150.0, 0.1);
        let trajectory = simulate(&config, 0.65, &settings).unwrap();

        let trapezoid = |values: &[f64]| -> f64 {
            values.windows(2).map(|w| 0.5 * (w[0] + w[1]) * settings.dt).sum()
        };

        assert_relative_eq!(trapezoid(trajectory.target()), model.target().injection.dose(), max_relative = 1e-2);
        assert_relative_eq!(trapezoid(trajectory.impurity()), model.impurity().injection.dose(), max_relative = 1e-2);
    }

    #[test]
    fn test_fixed_step_matches_adaptive() {
        let config = ColumnConfig::default();
        let settings = short();

        let adaptive = simulate(&config, 0.65, &settings).unwrap();
        let fixed = simulate_fixed_step(&config, 0.65, &settings, 10).unwrap();

        assert_eq!(adaptive.time(), fixed.time());
        for (a, b) in adaptive.target().iter().zip(fixed.target()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_fixed_step_rejects_zero_substeps() {
        assert!(simulate_fixed_step(&ColumnConfig::default(), 1.0, &short(), 0).is_err());
    }
}
