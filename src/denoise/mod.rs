//! Adaptive zero-lag denoiser
//!
//! Measures the noise floor of a measured trajectory, sizes a Savitzky-Golay
//! window from it and smooths the target channel forward and backward so the
//! peak is not delayed.
//!
//! # Procedure
//!
//! 1. `noise_sigma` = population standard deviation of the first
//!    `baseline_samples` target values (the column is still empty there, so
//!    everything measured is noise).
//! 2. `window = round(60 · noise_sigma + 9)`, bumped to the next odd number.
//! 3. Degree-3 Savitzky-Golay coefficients for that window, applied with
//!    [`filtfilt`].
//!
//! A window that does not exceed the polynomial order is clamped to
//! `poly_order + 2` (odd), logged and flagged in the [`FilterPlan`].
//!
//! # Example
//!
//! ```rust
//! use chrom_twin::denoise::{DenoiseSettings, plan_filter};
//!
//! let quiet = vec![0.0; 200];
//! let plan = plan_filter(&quiet, &DenoiseSettings::default()).unwrap();
//!
//! assert_eq!(plan.noise_sigma, 0.0);
//! assert_eq!(plan.window_length, 9);
//! assert!(!plan.clamped);
//! ```

mod savgol;
mod zero_phase;

pub use savgol::savgol_coefficients;
pub use zero_phase::{edge_padding, filtfilt, zero_phase_smooth};

use crate::error::{Result, TwinError};
use crate::simulation::Trajectory;

// =================================================================================================
// Settings and plan
// =================================================================================================

/// Parameters of the adaptive denoiser
///
/// | Field              | Default |
/// |--------------------|---------|
/// | `baseline_samples` | 100     |
/// | `poly_order`       | 3       |
/// | `window_slope`     | 60.0    |
/// | `window_intercept` | 9.0     |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DenoiseSettings {
    /// Leading samples used to measure the noise floor
    pub baseline_samples: usize,

    /// Savitzky-Golay polynomial degree
    pub poly_order: usize,

    /// Window samples added per unit of noise sigma
    pub window_slope: f64,

    /// Window length at zero noise
    pub window_intercept: f64,
}

impl Default for DenoiseSettings {
    fn default() -> Self {
        Self {
            baseline_samples: 100,
            poly_order: 3,
            window_slope: 60.0,
            window_intercept: 9.0,
        }
    }
}

impl DenoiseSettings {
    /// Default heuristic with a custom baseline length
    pub fn with_baseline(baseline_samples: usize) -> Self {
        Self { baseline_samples, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.baseline_samples == 0 {
            return Err(TwinError::filter("baseline must contain at least one sample"));
        }
        if !self.window_slope.is_finite() || !self.window_intercept.is_finite() {
            return Err(TwinError::configuration(format!(
                "window heuristic must be finite, got slope {} and intercept {}",
                self.window_slope, self.window_intercept
            )));
        }
        Ok(())
    }

    /// Smallest admissible window: `poly_order + 2`, rounded up to odd
    pub fn minimum_window(&self) -> usize {
        odd_ceil(self.poly_order + 2)
    }
}

/// Filter parameters chosen for one measured trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterPlan {
    /// Population standard deviation of the baseline
    pub noise_sigma: f64,

    /// Odd Savitzky-Golay window length
    pub window_length: usize,

    pub poly_order: usize,

    /// `true` when the heuristic window was too small and got clamped
    pub clamped: bool,
}

fn odd_ceil(n: usize) -> usize {
    if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}

/// Population standard deviation (divides by `n`)
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n).sqrt()
}

// =================================================================================================
// Planning and filtering
// =================================================================================================

/// Measure the baseline noise of `signal` and size the smoothing window
///
/// # Errors
///
/// - invalid settings
/// - baseline longer than the signal
/// - non-finite noise sigma (NaN or infinite samples in the baseline)
pub fn plan_filter(signal: &[f64], settings: &DenoiseSettings) -> Result<FilterPlan> {
    settings.validate()?;

    let baseline = signal.get(..settings.baseline_samples).ok_or_else(|| {
        TwinError::filter(format!(
            "baseline of {} samples exceeds signal length {}",
            settings.baseline_samples,
            signal.len()
        ))
    })?;

    let noise_sigma = population_std(baseline);
    if !noise_sigma.is_finite() {
        return Err(TwinError::filter(format!("noise sigma is not finite ({noise_sigma})")));
    }

    let heuristic = (settings.window_slope * noise_sigma + settings.window_intercept).round();
    let mut window_length = if heuristic < 1.0 { 1 } else { odd_ceil(heuristic as usize) };

    let clamped = window_length <= settings.poly_order;
    if clamped {
        let minimum = settings.minimum_window();
        log::warn!(
            "smoothing window {} does not exceed polynomial order {}, clamped to {}",
            window_length,
            settings.poly_order,
            minimum
        );
        window_length = minimum;
    }

    Ok(FilterPlan {
        noise_sigma,
        window_length,
        poly_order: settings.poly_order,
        clamped,
    })
}

/// Denoise the target channel of `raw` with the default heuristic
///
/// The impurity channel and the time grid are passed through unchanged.
pub fn denoise(raw: &Trajectory, baseline_samples: usize) -> Result<(Trajectory, FilterPlan)> {
    denoise_with(raw, &DenoiseSettings::with_baseline(baseline_samples))
}

/// Denoise the target channel of `raw` with explicit settings
///
/// # Errors
///
/// See [`plan_filter`]; additionally a trajectory not longer than
/// `3 · window_length` cannot be padded and is rejected.
pub fn denoise_with(raw: &Trajectory, settings: &DenoiseSettings) -> Result<(Trajectory, FilterPlan)> {
    let plan = plan_filter(raw.target(), settings)?;

    log::info!(
        "noise sigma {:.4}, Savitzky-Golay window {} (order {}){}",
        plan.noise_sigma,
        plan.window_length,
        plan.poly_order,
        if plan.clamped { ", clamped" } else { "" }
    );

    let smoothed = zero_phase_smooth(raw.target(), plan.window_length, plan.poly_order)?;
    Ok((raw.with_target(smoothed)?, plan))
}

// =================================================================================================
// Tests
// =================================================================================================
