//! Forward-backward (zero-phase) FIR filtering
//!
//! The filter runs once forward and once over the reversed output, so the
//! phase shifts cancel and features stay where they are.
//!
//! # Edge handling
//!
//! Before filtering, the signal is extended on both ends by `3 · taps`
//! samples using an odd reflection about the end points:
//!
//! ```text
//! left[j]  = 2·x[0]   − x[pad − j]        j = 0 .. pad
//! right[j] = 2·x[n−1] − x[n − 2 − j]      j = 0 .. pad
//! ```
//!
//! Each pass starts in steady state, i.e. as if the input had been constant at
//! its first value forever. The padding is trimmed from the result.

use crate::error::{Result, TwinError};

/// Number of samples added to each end for `taps` coefficients
pub fn edge_padding(taps: usize) -> usize {
    3 * taps
}

/// Causal FIR pass with the history held at `x[0]`
fn causal_pass(coefficients: &[f64], x: &[f64]) -> Vec<f64> {
    let Some(&first) = x.first() else {
        return Vec::new();
    };

    (0..x.len())
        .map(|n| {
            coefficients
                .iter()
                .enumerate()
                .map(|(j, b)| b * if n >= j { x[n - j] } else { first })
                .sum()
        })
        .collect()
}

/// Odd extension by `pad` samples on both sides
fn odd_extension(x: &[f64], pad: usize) -> Vec<f64> {
    let n = x.len();
    let (head, tail) = (x[0], x[n - 1]);

    let mut extended = Vec::with_capacity(n + 2 * pad);
    extended.extend((1..=pad).rev().map(|i| 2.0 * head - x[i]));
    extended.extend_from_slice(x);
    extended.extend((1..=pad).map(|i| 2.0 * tail - x[n - 1 - i]));
    extended
}

/// Apply the FIR `coefficients` forward and backward
///
/// Output has the same length as `signal`.
///
/// # Errors
///
/// - empty `coefficients`
/// - `signal.len() <= 3 · coefficients.len()`: too short for the edge padding
pub fn filtfilt(coefficients: &[f64], signal: &[f64]) -> Result<Vec<f64>> {
    if coefficients.is_empty() {
        return Err(TwinError::filter("filter has no coefficients"));
    }

    let pad = edge_padding(coefficients.len());
    if signal.len() <= pad {
        return Err(TwinError::filter(format!(
            "signal of {} samples is too short for {} taps (needs more than {})",
            signal.len(),
            coefficients.len(),
            pad
        )));
    }

    let extended = odd_extension(signal, pad);

    let mut forward = causal_pass(coefficients, &extended);
    forward.reverse();

    let mut backward = causal_pass(coefficients, &forward);
    backward.reverse();

    Ok(backward[pad..pad + signal.len()].to_vec())
}

/// Savitzky-Golay smoothing without phase shift
///
/// # Errors
///
/// Invalid window / order (see [`savgol_coefficients`](super::savgol_coefficients))
/// or a signal too short for [`filtfilt`].
///
/// # Example
///
/// ```rust
/// use chrom_twin::denoise::zero_phase_smooth;
///
/// let ramp: Vec<f64> = (0..100).map(|i| i as f64).collect();
/// let smoothed = zero_phase_smooth(&ramp, 9, 3).unwrap();
/// assert!((smoothed[50] - 50.0).abs() < 1e-9);
/// ```
pub fn zero_phase_smooth(signal: &[f64], window: usize, poly_order: usize) -> Result<Vec<f64>> {
    let coefficients = super::savgol_coefficients(window, poly_order)?;
    filtfilt(&coefficients, signal)
}

// =================================================================================================
// Tests
// =================================================================================================
