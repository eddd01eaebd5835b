//! Common utilities for integration tests

#![allow(dead_code)]

pub mod mock_models;

pub use mock_models::ExponentialDecay;

use chrom_twin::models::ColumnConfig;
use chrom_twin::simulation::{simulate, SimulationSettings, Trajectory};

/// Aging factor of the "aged" column used throughout the scenarios
pub const AGED: f64 = 0.65;

/// Noise-free outlet over the default 100-min horizon
pub fn reference_trajectory(aging: f64) -> Trajectory {
    simulate(&ColumnConfig::default(), aging, &SimulationSettings::default()).unwrap()
}

/// Index of the first maximum
pub fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

/// Gaussian bump of unit height centred on sample `centre`
pub fn gaussian_signal(len: usize, centre: f64, sigma: f64) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let x = (i as f64 - centre) / sigma;
            (-0.5 * x * x).exp()
        })
        .collect()
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}
