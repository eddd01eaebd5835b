//! Savitzky-Golay smoothing coefficients
//!
//! Fits a polynomial of degree `p` by least squares to a window of
//! `2m + 1` samples and evaluates it at the centre. The fitted value is a
//! fixed linear combination of the window samples; those weights are the
//! coefficients returned here.
//!
//! With `J[i][k] = ((i − m) / m)^k`, the centre value of the fit is the first row
//! of `(JᵀJ)⁻¹ Jᵀ`. The window is symmetric, so the coefficients are too and
//! convolution and correlation coincide.

use nalgebra::{DMatrix, DVector};

use crate::error::{Result, TwinError};

/// Smoothing coefficients for an odd `window` and polynomial `poly_order`
///
/// # Errors
///
/// - `window` is even or zero
/// - `poly_order >= window` (the fit is not overdetermined)
///
/// # Example
///
/// ```rust
/// use chrom_twin::denoise::savgol_coefficients;
///
/// let c = savgol_coefficients(5, 2).unwrap();
/// // classic 5-point quadratic smoother: (-3, 12, 17, 12, -3) / 35
/// assert!((c[2] - 17.0 / 35.0).abs() < 1e-12);
/// ```
pub fn savgol_coefficients(window: usize, poly_order: usize) -> Result<Vec<f64>> {
    if window == 0 || window % 2 == 0 {
        return Err(TwinError::filter(format!(
            "Savitzky-Golay window must be odd and positive, got {window}"
        )));
    }
    if poly_order >= window {
        return Err(TwinError::filter(format!(
            "polynomial order {poly_order} must be smaller than window {window}"
        )));
    }

    let half = (window / 2) as f64;
    let scale = half.max(1.0);
    let terms = poly_order + 1;

    // abscissae scaled to [-1, 1]; the centre value does not depend on the scale
    let vandermonde = DMatrix::from_fn(window, terms, |i, k| ((i as f64 - half) / scale).powi(k as i32));
    let normal = vandermonde.transpose() * &vandermonde;

    let mut unit = DVector::zeros(terms);
    unit[0] = 1.0;

    // JᵀJ is symmetric positive definite for distinct abscissae
    let row = normal
        .cholesky()
        .ok_or_else(|| TwinError::filter("Savitzky-Golay normal matrix is singular"))?
        .solve(&unit);

    Ok((&vandermonde * row).iter().copied().collect())
}

// =================================================================================================
// Tests
// =================================================================================================
