//! Tanks-in-series transport model for two co-eluting species
//!
//! # Physical background
//!
//! The column is represented as a cascade of $N$ ideally mixed stages. Each
//! species flows through the same stages but is held up differently by the
//! stationary phase, which is modelled as an inflated **effective volume**
//! per stage:
//!
//! $$V_{eff} = \frac{V_{total}}{N} \cdot (1 + k \cdot a)$$
//!
//! where $k$ is the species rate constant and $a$ the **aging factor** of the
//! column. A larger $a$ means more holdup, a longer residence time per stage
//! and a later peak; a degraded column ($a < 1$) elutes earlier.
//!
//! # Model equations
//!
//! For each species independently, with $r = Q / V_{eff}$:
//!
//! - Stage 0: $\dot{C}_0 = r \cdot (C_{in}(t) - C_0)$
//! - Stage $i > 0$: $\dot{C}_i = r \cdot (C_{i-1} - C_i)$
//!
//! # State layout
//!
//! Concentrations are stored in a single flat vector of length $2N$:
//!
//! ```text
//! [ T_0, T_1, ..., T_{N-1}, I_0, I_1, ..., I_{N-1} ]
//!   └──── target ────────┘  └──── impurity ──────┘
//! ```
//!
//! The **outlet** signal of each species is its last stage.
//!
//! # Injection
//!
//! Both species are fed through a rectangular pulse over $t \in [0.5, 1.0]$ min
//! (target 100, impurity 50). The pulse is part of the model, not of the
//! configuration. The solver writes the current time into the state metadata
//! before each call to `compute_physics`.
//!
//! # Example
//!
//! ```rust
//! use chrom_twin::models::{ColumnConfig, TankCascade};
//! use chrom_twin::physics::PhysicalModel;
//!
//! let config = ColumnConfig::default();
//! let model = TankCascade::new(&config, 0.65).unwrap();
//!
//! assert_eq!(model.points(), 100);
//! assert!(model.target().residence_time() < 1.2); // aged column, faster stages
//! ```

use nalgebra::DVector;

use crate::error::{Result, TwinError};
use crate::models::injection::TemporalInjection;
use crate::physics::{PhysicalData, PhysicalModel, PhysicalQuantity, PhysicalState};

/// Feed window start \[min\]
pub const PULSE_START: f64 = 0.5;

/// Feed window end \[min\], inclusive
pub const PULSE_END: f64 = 1.0;

/// Target concentration fed during the pulse
pub const TARGET_FEED: f64 = 100.0;

/// Impurity concentration fed during the pulse
pub const IMPURITY_FEED: f64 = 50.0;

// =================================================================================================
// ColumnConfig: structural parameters
// =================================================================================================

/// Structural parameters of the column
///
/// The aging factor is **not** part of this struct; it is passed to every
/// simulation.
///
/// | Parameter                | Default | Meaning                          |
/// |--------------------------|---------|----------------------------------|
/// | `stage_count`            | 50      | Number of mixed stages $N$       |
/// | `total_volume`           | 10.0    | Column volume $V_{total}$        |
/// | `flow_rate`              | 1.0     | Volumetric flow rate $Q$         |
/// | `target_rate_constant`   | 5.0     | Holdup constant of the target    |
/// | `impurity_rate_constant` | 3.0     | Holdup constant of the impurity  |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnConfig {
    /// Number of stages $N$
    pub stage_count: usize,

    /// Total column volume
    pub total_volume: f64,

    /// Volumetric flow rate $Q$
    pub flow_rate: f64,

    /// Rate constant $k$ of the target species
    pub target_rate_constant: f64,

    /// Rate constant $k$ of the impurity
    pub impurity_rate_constant: f64,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self::new(50, 10.0, 1.0)
    }
}

impl ColumnConfig {
    /// Creates a configuration with the standard rate constants (5.0 and 3.0)
    ///
    /// Does not validate. Call [`validate`](Self::validate) before simulating.
    pub fn new(stage_count: usize, total_volume: f64, flow_rate: f64) -> Self {
        Self {
            stage_count,
            total_volume,
            flow_rate,
            target_rate_constant: 5.0,
            impurity_rate_constant: 3.0,
        }
    }

    /// Validates the structural parameters
    ///
    /// # Rules
    ///
    /// - at least one stage
    /// - volume, flow rate and both rate constants finite and strictly positive
    pub fn validate(&self) -> Result<()> {
        if self.stage_count == 0 {
            return Err(TwinError::configuration("stage count must be at least 1"));
        }

        let positives = [
            ("total volume", self.total_volume),
            ("flow rate", self.flow_rate),
            ("target rate constant", self.target_rate_constant),
            ("impurity rate constant", self.impurity_rate_constant),
        ];

        for (name, value) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(TwinError::configuration(format!(
                    "{name} must be finite and strictly positive, got {value}"
                )));
            }
        }

        Ok(())
    }

    /// Geometric volume of one stage, $V_{total} / N$
    pub fn stage_volume(&self) -> f64 {
        self.total_volume / self.stage_count as f64
    }

    /// Effective stage volume for a species with `rate_constant` at `aging_factor`
    pub fn effective_volume(&self, rate_constant: f64, aging_factor: f64) -> f64 {
        self.stage_volume() * (1.0 + rate_constant * aging_factor)
    }

    /// Length of the flat state vector, $2N$
    pub fn state_len(&self) -> usize {
        2 * self.stage_count
    }
}

// =================================================================================================
// CascadeSpecies: one species travelling through the stages
// =================================================================================================

/// Per-species transport parameters, precomputed for a given aging factor
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeSpecies {
    /// Species name (used for logging)
    pub name: &'static str,

    /// Effective stage volume $V_{eff}$
    pub effective_volume: f64,

    /// Exchange rate $Q / V_{eff}$ \[1/min\]
    pub exchange_rate: f64,

    /// Feed profile at the inlet
    pub injection: TemporalInjection,
}

impl CascadeSpecies {
    /// Mean residence time in one stage, $V_{eff} / Q$
    pub fn residence_time(&self) -> f64 {
        1.0 / self.exchange_rate
    }

    /// Writes the stage derivatives of this species into `rate`
    ///
    /// `conc` and `rate` are the species' own slice of the state (length $N$).
    fn derivatives(&self, t: f64, conc: &[f64], rate: &mut [f64]) {
        let mut upstream = self.injection.evaluate(t);

        for (c, dc) in conc.iter().zip(rate.iter_mut()) {
            *dc = self.exchange_rate * (upstream - c);
            upstream = *c;
        }
    }
}

// =================================================================================================
// TankCascade: complete physical model
// =================================================================================================

/// Two-species tanks-in-series model of an aging column
///
/// The aging factor is fixed at construction; the simulation engine builds one
/// model per `(config, aging_factor)` pair.
#[derive(Debug, Clone)]
pub struct TankCascade {
    /// Number of stages $N$
    stage_count: usize,

    /// Aging factor the model was built for
    aging_factor: f64,

    /// Target species (first half of the state)
    target: CascadeSpecies,

    /// Impurity species (second half of the state)
    impurity: CascadeSpecies,
}

impl TankCascade {
    /// Creates the model for a column configuration and an aging factor
    ///
    /// # Errors
    ///
    /// - the configuration is invalid (see [`ColumnConfig::validate`])
    /// - `aging_factor` is not finite or not strictly positive
    pub fn new(config: &ColumnConfig, aging_factor: f64) -> Result<Self> {
        config.validate()?;

        if !aging_factor.is_finite() || aging_factor <= 0.0 {
            return Err(TwinError::configuration(format!(
                "aging factor must be finite and strictly positive, got {aging_factor}"
            )));
        }

        let species = |name, rate_constant, feed| {
            let effective_volume = config.effective_volume(rate_constant, aging_factor);
            CascadeSpecies {
                name,
                effective_volume,
                exchange_rate: config.flow_rate / effective_volume,
                injection: TemporalInjection::rectangle(PULSE_START, PULSE_END, feed),
            }
        };

        Ok(Self {
            stage_count: config.stage_count,
            aging_factor,
            target: species("target", config.target_rate_constant, TARGET_FEED),
            impurity: species("impurity", config.impurity_rate_constant, IMPURITY_FEED),
        })
    }

    /// Aging factor the model was built for
    pub fn aging_factor(&self) -> f64 {
        self.aging_factor
    }

    /// Number of stages
    pub fn stage_count(&self) -> usize {
        self.stage_count
    }

    /// Target species parameters
    pub fn target(&self) -> &CascadeSpecies {
        &self.target
    }

    /// Impurity species parameters
    pub fn impurity(&self) -> &CascadeSpecies {
        &self.impurity
    }

    /// Index of the target outlet (last target stage) in the flat state
    pub fn target_outlet_index(&self) -> usize {
        self.stage_count - 1
    }

    /// Index of the impurity outlet (last impurity stage) in the flat state
    pub fn impurity_outlet_index(&self) -> usize {
        2 * self.stage_count - 1
    }
}

// =================================================================================================
// PhysicalModel implementation
// =================================================================================================

impl PhysicalModel for TankCascade {
    /// Length of the flat concentration vector, $2N$
    fn points(&self) -> usize {
        2 * self.stage_count
    }

    /// Computes $\partial C / \partial t$ for every stage of both species
    ///
    /// A state without a concentration vector of the expected length yields a
    /// NaN derivative, which the solver reports as a numerical failure.
    fn compute_physics(&self, state: &PhysicalState) -> PhysicalState {
        let t = state.time();
        let n = self.stage_count;

        let conc = match state.get(PhysicalQuantity::Concentration) {
            Some(data) if data.len() == 2 * n => data.as_slice(),
            other => {
                log::error!(
                    "TankCascade: expected {} concentrations, got {:?}",
                    2 * n,
                    other.map(PhysicalData::len)
                );
                return PhysicalState::new(
                    PhysicalQuantity::Concentration,
                    PhysicalData::uniform_vector(2 * n, f64::NAN),
                );
            }
        };

        let mut rate = DVector::zeros(2 * n);
        let (target_rate, impurity_rate) = rate.as_mut_slice().split_at_mut(n);

        self.target.derivatives(t, &conc[..n], target_rate);
        self.impurity.derivatives(t, &conc[n..], impurity_rate);

        PhysicalState::new(PhysicalQuantity::Concentration, PhysicalData::from_vector(rate))
    }

    /// Column initially empty of both species
    fn setup_initial_state(&self) -> PhysicalState {
        PhysicalState::new(
            PhysicalQuantity::Concentration,
            PhysicalData::uniform_vector(2 * self.stage_count, 0.0),
        )
    }

    fn name(&self) -> &str {
        "Tanks-in-series cascade"
    }

    fn description(&self) -> Option<&str> {
        Some(
            "Two-species cascade of ideally mixed stages with aging-dependent \
             effective volume and a rectangular inlet pulse.",
        )
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn state_at(values: Vec<f64>, t: f64) -> PhysicalState {
        let mut state = PhysicalState::new(PhysicalQuantity::Concentration, PhysicalData::from_vec(values));
        state.set_time(t);
        state
    }

    fn rates(model: &TankCascade, state: &PhysicalState) -> Vec<f64> {
        model
            .compute_physics(state)
            .get(PhysicalQuantity::Concentration)
            .unwrap()
            .as_slice()
            .to_vec()
    }

    // ── ColumnConfig ──────────────────────────────────────────────────────────

    #[test]
    fn test_default_config() {
        let config = ColumnConfig::default();
        assert_eq!(config.stage_count, 50);
        assert_eq!(config.total_volume, 10.0);
        assert_eq!(config.flow_rate, 1.0);
        assert_eq!(config.target_rate_constant, 5.0);
        assert_eq!(config.impurity_rate_constant, 3.0);
        assert!(config.validate().is_ok());
        assert_eq!(config.state_len(), 100);
    }

    #[test]
    fn test_config_rejects_zero_stages() {
        let config = ColumnConfig::new(0, 10.0, 1.0);
        assert!(matches!(config.validate(), Err(TwinError::Configuration(_))));
    }

    #[test]
    fn test_config_rejects_non_positive_flow() {
        let err = ColumnConfig::new(50, 10.0, 0.0).validate().unwrap_err();
        assert!(err.to_string().contains("flow rate"));

        let err = ColumnConfig::new(50, f64::NAN, 1.0).validate().unwrap_err();
        assert!(err.to_string().contains("total volume"));
    }

    #[test]
    fn test_effective_volume() {
        let config = ColumnConfig::default();
        assert_relative_eq!(config.stage_volume(), 0.2);
        // new column: target 0.2 × (1 + 5), impurity 0.2 × (1 + 3)
        assert_relative_eq!(config.effective_volume(5.0, 1.0), 1.2, epsilon = 1e-12);
        assert_relative_eq!(config.effective_volume(3.0, 1.0), 0.8, epsilon = 1e-12);
        // aged column holds up less
        assert!(config.effective_volume(5.0, 0.65) < config.effective_volume(5.0, 1.0));
    }

    // ── TankCascade construction ──────────────────────────────────────────────

    #[test]
    fn test_model_rejects_bad_aging() {
        let config = ColumnConfig::default();
        assert!(TankCascade::new(&config, 0.0).is_err());
        assert!(TankCascade::new(&config, -0.5).is_err());
        assert!(TankCascade::new(&config, f64::INFINITY).is_err());
        assert!(TankCascade::new(&config, 0.65).is_ok());
    }

    #[test]
    fn test_model_layout() {
        let model = TankCascade::new(&ColumnConfig::default(), 1.0).unwrap();
        assert_eq!(model.points(), 100);
        assert_eq!(model.target_outlet_index(), 49);
        assert_eq!(model.impurity_outlet_index(), 99);
        assert_relative_eq!(model.target().residence_time(), 1.2, epsilon = 1e-12);
        assert_relative_eq!(model.impurity().residence_time(), 0.8, epsilon = 1e-12);

        let initial = model.setup_initial_state();
        let conc = initial.get(PhysicalQuantity::Concentration).unwrap();
        assert_eq!(conc.len(), 100);
        assert!(conc.as_slice().iter().all(|&c| c == 0.0));
    }

    // ── compute_physics ───────────────────────────────────────────────────────

    #[test]
    fn test_pulse_feeds_first_stage_only() {
        let model = TankCascade::new(&ColumnConfig::default(), 1.0).unwrap();
        let dc = rates(&model, &state_at(vec![0.0; 100], 0.75));

        assert_relative_eq!(dc[0], 100.0 / 1.2, epsilon = 1e-10);
        assert_relative_eq!(dc[50], 50.0 / 0.8, epsilon = 1e-10);
        assert!(dc[1..50].iter().all(|&x| x == 0.0));
        assert!(dc[51..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_no_feed_outside_pulse() {
        let model = TankCascade::new(&ColumnConfig::default(), 1.0).unwrap();
        for t in [0.0, 0.49, 1.01, 50.0] {
            let dc = rates(&model, &state_at(vec![0.0; 100], t));
            assert!(dc.iter().all(|&x| x == 0.0), "unexpected feed at t={t}");
        }
    }

    #[test]
    fn test_stage_to_stage_transfer() {
        let model = TankCascade::new(&ColumnConfig::default(), 1.0).unwrap();
        let mut values = vec![0.0; 100];
        values[10] = 2.0;
        let dc = rates(&model, &state_at(values, 20.0));

        let r = 1.0 / 1.2;
        assert_relative_eq!(dc[10], -2.0 * r, epsilon = 1e-12);
        assert_relative_eq!(dc[11], 2.0 * r, epsilon = 1e-12);
        assert_eq!(dc[9], 0.0);
        assert_eq!(dc[60], 0.0);
    }

    #[test]
    fn test_species_do_not_mix() {
        let model = TankCascade::new(&ColumnConfig::default(), 1.0).unwrap();
        let mut values = vec![0.0; 100];
        // last target stage must not leak into the first impurity stage
        values[49] = 1.0;
        let dc = rates(&model, &state_at(values, 20.0));

        assert!(dc[49] < 0.0);
        assert_eq!(dc[50], 0.0);
    }

    #[test]
    fn test_mass_balance() {
        // Σ dC_i/dt = r · (C_in − C_{N−1}) for each species
        let model = TankCascade::new(&ColumnConfig::default(), 0.8).unwrap();
        let values: Vec<f64> = (0..100).map(|i| (i as f64 * 0.37).sin().abs()).collect();
        let dc = rates(&model, &state_at(values.clone(), 0.6));

        let target_sum: f64 = dc[..50].iter().sum();
        let expected = model.target().exchange_rate * (TARGET_FEED - values[49]);
        assert_relative_eq!(target_sum, expected, epsilon = 1e-9);

        let impurity_sum: f64 = dc[50..].iter().sum();
        let expected = model.impurity().exchange_rate * (IMPURITY_FEED - values[99]);
        assert_relative_eq!(impurity_sum, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_malformed_state_yields_nan() {
        let model = TankCascade::new(&ColumnConfig::default(), 1.0).unwrap();
        let result = model.compute_physics(&state_at(vec![0.0; 3], 0.0));
        assert!(result.first_non_finite().is_some());
    }
}
