//! Properties of the simulation and estimation pipeline
//!
//! Determinism, monotonic aging-to-peak relation, rejection of out-of-domain
//! hypotheses and recovery of a noise-free aging factor.

use chrom_twin::estimation::{estimate_aging, AgingEstimator, AgingObjective, Loss, LossWeighting};
use chrom_twin::models::ColumnConfig;
use chrom_twin::simulation::{simulate, SimulationSettings, Trajectory};
use chrom_twin::TwinError;

mod common;
use common::{reference_trajectory, AGED};

#[test]
fn test_simulation_is_deterministic() {
    let first = reference_trajectory(AGED);
    let second = reference_trajectory(AGED);

    assert_eq!(first.len(), 1000);
    assert_eq!(first, second);
    assert!(first
        .target()
        .iter()
        .zip(second.target())
        .all(|(a, b)| a.to_bits() == b.to_bits()));
}

#[test]
fn test_lower_aging_peaks_earlier() {
    // the most aged column still peaks well inside 150 min
    let settings = SimulationSettings::new(150.0, 0.1);
    let config = ColumnConfig::default();

    let peaks: Vec<f64> = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0]
        .iter()
        .map(|&aging| simulate(&config, aging, &settings).unwrap().peak_time().unwrap())
        .collect();

    for pair in peaks.windows(2) {
        assert!(pair[0] < pair[1], "peaks not increasing: {peaks:?}");
    }
}

#[test]
fn test_out_of_domain_hypotheses_are_not_simulated() {
    let observed = reference_trajectory(1.0);
    let objective = AgingObjective::new(&observed, ColumnConfig::default(), LossWeighting::Uniform).unwrap();

    for aging in [0.0, -1.0, 2.5] {
        assert_eq!(objective.evaluate(aging).unwrap(), Loss::Infeasible);
    }
    assert_eq!(objective.simulations(), 0);
}

#[test]
fn test_recovers_noise_free_aging() {
    let config = ColumnConfig::default();
    let observed = reference_trajectory(AGED);

    let result = estimate_aging(&observed, &config, LossWeighting::Uniform).unwrap();

    assert!(
        (result.aging_estimate - AGED).abs() < 1e-3,
        "estimate {} (seed {})",
        result.aging_estimate,
        result.seed.aging
    );
    assert!(result.residual_error <= result.seed.loss.score());
    assert!(result.simulations > 20);
}

#[test]
fn test_recovers_aging_on_finer_grid() {
    // 1000 samples, but 0.05 min apart over 50 min
    let config = ColumnConfig::default();
    let observed = simulate(&config, AGED, &SimulationSettings::new(50.0, 0.05)).unwrap();
    assert_eq!(observed.len(), 1000);

    let result = estimate_aging(&observed, &config, LossWeighting::Uniform).unwrap();

    assert!((result.aging_estimate - AGED).abs() < 1e-3, "estimate {}", result.aging_estimate);
}

#[test]
fn test_irregular_grid_is_rejected_before_simulating() {
    let reference = reference_trajectory(AGED);
    let mut time = reference.time().to_vec();
    time[500] += 0.03;
    let observed = Trajectory::new(time, reference.target().to_vec(), reference.impurity().to_vec()).unwrap();

    let err = estimate_aging(&observed, &ColumnConfig::default(), LossWeighting::Uniform).unwrap_err();
    assert!(matches!(err, TwinError::Estimation(_)), "{err}");
    assert!(err.to_string().contains("sample 500"), "{err}");
}

#[test]
fn test_integration_failure_surfaces_from_estimator() {
    let observed = reference_trajectory(AGED);
    let starved = SimulationSettings { max_steps: 100, ..SimulationSettings::default() };
    let objective = AgingObjective::new(&observed, ColumnConfig::default(), LossWeighting::Uniform)
        .unwrap()
        .with_settings(starved)
        .unwrap();

    let err = AgingEstimator::default().estimate(&objective).unwrap_err();
    assert!(matches!(err, TwinError::Simulation(_)), "{err}");
}
