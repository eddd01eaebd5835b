//! Numerical solver traits and types
//!
//! # Design
//!
//! This module follows the same pattern as `PhysicalQuantity`:
//! - Central enum `SolverType` defines the type of numerical solution
//! - `SolverConfiguration` carries the `SolverType` and its parameters
//! - `SimulationResult` holds the sampled trajectory plus string metadata

use std::collections::HashMap;

use crate::error::{Result, TwinError};
use crate::physics::PhysicalState;
use crate::solver::Scenario;

// =================================================================================================
// Central Solver Type Enumeration (Like PhysicalQuantity)
// =================================================================================================

/// Type of numerical solution method
///
/// Each variant carries the data specific to that solution type.
///
/// # Examples
///
/// ```rust
/// use chrom_twin::solver::SolverType;
///
/// // Fixed-step time evolution
/// let fixed = SolverType::TimeEvolution {
///     total_time: 10.0,
///     time_steps: 1000,
/// };
/// assert!(fixed.validate().is_ok());
///
/// // Adaptive time evolution sampled every 0.1 min
/// let adaptive = SolverType::AdaptiveTimeEvolution {
///     output_interval: 0.1,
///     output_samples: 1000,
///     max_step: 0.05,
///     rtol: 1e-6,
///     atol: 1e-9,
///     max_steps: 1_000_000,
/// };
/// assert_eq!(adaptive.name(), "AdaptiveTimeEvolution");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum SolverType {

    /// Fixed-step time evolution
    ///
    /// Used by: RK4
    ///
    /// # Parameters
    /// - `total_time`: Total simulation time \[min\]
    /// - `time_steps`: Number of time steps
    TimeEvolution {
        total_time: f64,
        time_steps: usize,
    },

    /// Adaptive time evolution sampled on a uniform output grid
    ///
    /// Used by: Dormand-Prince
    ///
    /// The state is reported at `t_k = k · output_interval` for
    /// `k = 0 .. output_samples`. The internal step never exceeds `max_step`.
    ///
    /// # Parameters
    /// - `output_interval`: Spacing of the output grid \[min\]
    /// - `output_samples`: Number of reported samples (including `t = 0`)
    /// - `max_step`: Upper bound on the internal step size \[min\]
    /// - `rtol`, `atol`: Relative and absolute local error tolerances
    /// - `max_steps`: Safety limit on accepted + rejected steps
    AdaptiveTimeEvolution {
        output_interval: f64,
        output_samples: usize,
        max_step: f64,
        rtol: f64,
        atol: f64,
        max_steps: usize,
    },
}

impl SolverType {
    /// Get name identifier
    pub fn name(&self) -> &str {
        match self {
            SolverType::TimeEvolution { .. } => "TimeEvolution",
            SolverType::AdaptiveTimeEvolution { .. } => "AdaptiveTimeEvolution",
        }
    }

    /// Validate that parameters are numerically meaningful
    pub fn validate(&self) -> Result<()> {
        match self {
            SolverType::TimeEvolution { total_time, time_steps } => {
                if !total_time.is_finite() || *total_time <= 0.0 {
                    return Err(TwinError::configuration("Total time must be positive"));
                }
                if *time_steps == 0 {
                    return Err(TwinError::configuration("Time steps must be greater than 0"));
                }
                Ok(())
            }
            SolverType::AdaptiveTimeEvolution {
                output_interval,
                output_samples,
                max_step,
                rtol,
                atol,
                max_steps,
            } => {
                let positives = [
                    ("Output interval", *output_interval),
                    ("Maximum step", *max_step),
                    ("Relative tolerance", *rtol),
                    ("Absolute tolerance", *atol),
                ];
                for (name, value) in positives {
                    if !value.is_finite() || value <= 0.0 {
                        return Err(TwinError::configuration(format!(
                            "{name} must be positive, got {value}"
                        )));
                    }
                }
                if *output_samples == 0 {
                    return Err(TwinError::configuration("Output samples must be greater than 0"));
                }
                if *max_steps == 0 {
                    return Err(TwinError::configuration("Maximum steps must be greater than 0"));
                }
                Ok(())
            }
        }
    }
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Configuration for numerical solver
///
/// # Examples
///
/// ```rust
/// use chrom_twin::solver::SolverConfiguration;
///
/// let fixed = SolverConfiguration::time_evolution(10.0, 1000);
/// assert!(fixed.validate().is_ok());
///
/// let adaptive = SolverConfiguration::adaptive_time_evolution(0.1, 1000, 0.05, 1e-6, 1e-9);
/// assert!(adaptive.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfiguration {
    /// Type of solver and its parameters
    pub solver_type: SolverType,
}

impl SolverConfiguration {
    /// Default safety limit on adaptive steps
    pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

    /// Create a new configuration with a given solver type
    pub fn new(solver_type: SolverType) -> Self {
        Self { solver_type }
    }

    /// Create a fixed-step time evolution configuration
    pub fn time_evolution(total_time: f64, time_steps: usize) -> Self {
        Self::new(SolverType::TimeEvolution { total_time, time_steps })
    }

    /// Create an adaptive time evolution configuration
    pub fn adaptive_time_evolution(
        output_interval: f64,
        output_samples: usize,
        max_step: f64,
        rtol: f64,
        atol: f64,
    ) -> Self {
        Self::new(SolverType::AdaptiveTimeEvolution {
            output_interval,
            output_samples,
            max_step,
            rtol,
            atol,
            max_steps: Self::DEFAULT_MAX_STEPS,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.solver_type.validate()
    }
}

// =================================================================================================
// Simulation result
// =================================================================================================

/// Sampled solution of a time evolution
///
/// `trajectory[i]` is the state at `time_points[i]`. The first entry is the
/// initial condition.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// Reported times
    pub time_points: Vec<f64>,

    /// State at each reported time
    pub trajectory: Vec<PhysicalState>,

    /// State at the last reported time
    pub final_state: PhysicalState,

    /// Free-form solver statistics (method, step counts, ...)
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    /// Create a result without metadata
    pub fn new(
        time_points: Vec<f64>,
        trajectory: Vec<PhysicalState>,
        final_state: PhysicalState,
    ) -> Self {
        Self {
            time_points,
            trajectory,
            final_state,
            metadata: HashMap::new(),
        }
    }

    /// Number of reported samples
    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    /// `true` when nothing was reported
    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }

    /// Attach a metadata entry
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Read a metadata entry
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

// =================================================================================================
// Solver trait
// =================================================================================================

/// Numerical method applied to a [`Scenario`]
///
/// Solvers are stateless: the same instance can be shared across threads and
/// reused for any number of scenarios.
pub trait Solver: Send + Sync {
    /// Integrate the scenario according to `config`
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration) -> Result<SimulationResult>;

    /// Display name of the method
    fn name(&self) -> &'static str;
}

// =================================================================================================
// Tests
// =================================================================================================
