//! Synthetic sensor noise
//!
//! Builds noisy "plant" measurements from a clean simulation. Only the target
//! channel is perturbed; the impurity channel is left as simulated.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::{Result, TwinError};
use crate::simulation::Trajectory;

/// Add seeded `N(0, σ²)` noise to the target channel
///
/// Equal seeds give identical noise.
///
/// ```rust
/// use chrom_twin::noise::add_gaussian_noise;
/// use chrom_twin::simulation::Trajectory;
///
/// let clean = Trajectory::new(vec![0.0, 0.1, 0.2], vec![0.0; 3], vec![0.0; 3]).unwrap();
/// let a = add_gaussian_noise(&clean, 0.7, 42).unwrap();
/// let b = add_gaussian_noise(&clean, 0.7, 42).unwrap();
/// assert_eq!(a, b);
/// ```
///
/// # Errors
///
/// `sigma` negative or not finite.
pub fn add_gaussian_noise(trajectory: &Trajectory, sigma: f64, seed: u64) -> Result<Trajectory> {
    let normal = Normal::new(0.0, sigma)
        .map_err(|e| TwinError::configuration(format!("invalid noise level {sigma}: {e}")))?;
    if !sigma.is_finite() {
        return Err(TwinError::configuration(format!("noise level must be finite, got {sigma}")));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let noisy = trajectory
        .target()
        .iter()
        .map(|&value| value + normal.sample(&mut rng))
        .collect();

    trajectory.with_target(noisy)
}

// =================================================================================================
// Tests
// =================================================================================================
