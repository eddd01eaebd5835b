//! Scoring a decision against the ground truth
//!
//! In a validation run the true aging factor is known. [`PerformanceReport`]
//! compares the twin's estimate and cut point with it, and with a fixed
//! legacy cut point that ignores aging.

use crate::control::{golden_time, ControlDecision};
use crate::error::{Result, TwinError};
use crate::estimation::EstimationResult;
use crate::simulation::Trajectory;

/// Cut point of the legacy fixed recipe \[min\]
pub const LEGACY_CUT_POINT: f64 = 55.0;

/// Errors of one estimate/decision pair, relative to the truth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceReport {
    pub true_aging: f64,
    pub estimated_aging: f64,

    /// `|true − estimate| / true × 100`
    pub aging_error_percent: f64,

    pub true_peak_time: f64,
    pub estimated_peak_time: f64,

    /// Peak-time error \[s\]
    pub peak_error_seconds: f64,

    /// Ideal cut point for the true column \[min\]
    pub true_golden_time: f64,

    pub cut_point: f64,

    /// Distance between the cut point and the golden time \[s\]
    pub control_error_seconds: f64,

    pub legacy_cut_point: f64,

    /// How much closer to the golden time the twin cut is than the legacy
    /// cut \[min\]. Negative when the twin does worse.
    pub improvement_minutes: f64,
}

impl PerformanceReport {
    /// Build a report with the default legacy cut point
    ///
    /// # Errors
    ///
    /// `true_aging` not finite and positive, or `true_trajectory` empty.
    pub fn new(
        true_aging: f64,
        true_trajectory: &Trajectory,
        estimation: &EstimationResult,
        decision: &ControlDecision,
    ) -> Result<Self> {
        Self::with_legacy_cut_point(true_aging, true_trajectory, estimation, decision, LEGACY_CUT_POINT)
    }

    pub fn with_legacy_cut_point(
        true_aging: f64,
        true_trajectory: &Trajectory,
        estimation: &EstimationResult,
        decision: &ControlDecision,
        legacy_cut_point: f64,
    ) -> Result<Self> {
        if !true_aging.is_finite() || true_aging <= 0.0 {
            return Err(TwinError::configuration(format!(
                "true aging factor must be finite and positive, got {true_aging}"
            )));
        }

        let true_peak_time = true_trajectory
            .peak_time()
            .ok_or_else(|| TwinError::configuration("true trajectory is empty"))?;
        let true_golden_time = golden_time(true_peak_time, true_aging);

        let control_error = (decision.cut_point - true_golden_time).abs();
        let legacy_error = (legacy_cut_point - true_golden_time).abs();

        Ok(Self {
            true_aging,
            estimated_aging: estimation.aging_estimate,
            aging_error_percent: (true_aging - estimation.aging_estimate).abs() / true_aging * 100.0,
            true_peak_time,
            estimated_peak_time: decision.peak_time,
            peak_error_seconds: (true_peak_time - decision.peak_time).abs() * 60.0,
            true_golden_time,
            cut_point: decision.cut_point,
            control_error_seconds: control_error * 60.0,
            legacy_cut_point,
            improvement_minutes: legacy_error - control_error,
        })
    }
}

impl std::fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "aging factor     true {:.4}  estimated {:.4}  error {:.2} %",
            self.true_aging, self.estimated_aging, self.aging_error_percent
        )?;
        writeln!(
            f,
            "peak time        true {:.2} min  estimated {:.2} min  error {:.1} s",
            self.true_peak_time, self.estimated_peak_time, self.peak_error_seconds
        )?;
        writeln!(
            f,
            "cut point        golden {:.2} min  twin {:.2} min  error {:.1} s",
            self.true_golden_time, self.cut_point, self.control_error_seconds
        )?;
        write!(
            f,
            "legacy recipe    cut {:.2} min  improvement {:+.2} min",
            self.legacy_cut_point, self.improvement_minutes
        )
    }
}

// =================================================================================================
// Tests
// =================================================================================================
