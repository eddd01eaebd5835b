//! Cut-point decision
//!
//! Turns an aging estimate into the time at which product collection should
//! begin. The column is re-simulated at the estimate, its target peak located,
//! and a safety margin that depends on the aging factor is subtracted:
//!
//! ```text
//! margin    = 9.0 − 5.0 · a      [min]
//! cut_point = peak_time − margin [min]
//! ```
//!
//! The same rule applied to a known aging factor gives the reference
//! "golden time" used when scoring a decision (see [`golden_time`]).

use crate::error::{Result, TwinError};
use crate::estimation::EstimationResult;
use crate::models::ColumnConfig;
use crate::simulation::{simulate, SimulationSettings};

/// Base margin at zero aging \[min\]
pub const MARGIN_BASE: f64 = 9.0;

/// Margin reduction per unit of aging \[min\]
pub const MARGIN_SLOPE: f64 = 5.0;

/// How far before the peak the cut is placed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MarginSchedule {
    /// `9 − 5a`
    #[default]
    Adaptive,

    /// Constant margin in minutes, whatever the aging
    Fixed(f64),
}

impl MarginSchedule {
    /// Margin \[min\] for aging factor `aging`
    ///
    /// ```rust
    /// use chrom_twin::control::MarginSchedule;
    ///
    /// assert_eq!(MarginSchedule::Adaptive.margin(1.0), 4.0);
    /// assert_eq!(MarginSchedule::Fixed(5.0).margin(1.0), 5.0);
    /// ```
    pub fn margin(&self, aging: f64) -> f64 {
        match self {
            MarginSchedule::Adaptive => MARGIN_BASE - aging * MARGIN_SLOPE,
            MarginSchedule::Fixed(margin) => *margin,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            MarginSchedule::Fixed(margin) if !margin.is_finite() => Err(TwinError::configuration(format!(
                "fixed margin must be finite, got {margin}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Reference cut point for a column of known aging
pub fn golden_time(peak_time: f64, aging: f64) -> f64 {
    peak_time - MarginSchedule::Adaptive.margin(aging)
}

/// Result of the control step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlDecision {
    /// Aging factor the decision is based on
    pub aging_estimate: f64,

    /// Peak of the re-simulated target outlet \[min\]
    pub peak_time: f64,

    /// Margin subtracted from the peak \[min\]
    pub margin: f64,

    /// Recommended cut point \[min\]
    pub cut_point: f64,
}

/// Decide the cut point with the default horizon and the adaptive margin
///
/// # Errors
///
/// Simulation failure at the estimated aging factor.
pub fn decide_control(estimation: &EstimationResult, config: &ColumnConfig) -> Result<ControlDecision> {
    decide_control_with(
        estimation,
        config,
        &SimulationSettings::default(),
        MarginSchedule::default(),
    )
}

/// [`decide_control`] with explicit simulation settings and margin schedule
pub fn decide_control_with(
    estimation: &EstimationResult,
    config: &ColumnConfig,
    settings: &SimulationSettings,
    schedule: MarginSchedule,
) -> Result<ControlDecision> {
    schedule.validate()?;

    let aging = estimation.aging_estimate;
    let trajectory = simulate(config, aging, settings)?;
    let (peak_time, peak_value) = trajectory
        .peak()
        .ok_or_else(|| TwinError::simulation("simulation produced no samples"))?;

    let margin = schedule.margin(aging);
    let decision = ControlDecision {
        aging_estimate: aging,
        peak_time,
        margin,
        cut_point: peak_time - margin,
    };

    log::info!(
        "control: aging {:.4}, peak {:.2} min ({:.3}), margin {:.2} min, cut at {:.2} min",
        aging,
        peak_time,
        peak_value,
        margin,
        decision.cut_point
    );

    Ok(decision)
}

// =================================================================================================
// Tests
// =================================================================================================
