//! Performance benchmarks for the twin pipeline
//!
//! # What We're Measuring
//!
//! 1. **Simulation**: one adaptive Dormand-Prince run of the cascade over the
//!    default 100-min horizon, for stage counts 10 to 100. Cost grows with the
//!    state size (2N) and with the number of steps, which `max_step` bounds
//!    from below.
//! 2. **Solver comparison**: the same 20-min run with the adaptive solver and
//!    with fixed-step RK4 (10 substeps per sample).
//! 3. **Denoising**: plan plus zero-phase Savitzky-Golay on 1000 noisy samples.
//! 4. **Estimation**: full coarse grid plus Nelder-Mead refinement. Dominated
//!    by simulations (roughly 20 for the grid and 20-40 for the simplex).
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench --bench twin_performance
//!
//! # Only the simulation group
//! cargo bench --bench twin_performance simulation
//!
//! # Coarse grid on the rayon pool
//! cargo bench --bench twin_performance --features parallel estimation
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::time::Duration;

use chrom_twin::denoise::denoise;
use chrom_twin::estimation::{estimate_aging, LossWeighting};
use chrom_twin::models::ColumnConfig;
use chrom_twin::noise::add_gaussian_noise;
use chrom_twin::simulation::{simulate, simulate_fixed_step, SimulationSettings};

const AGING: f64 = 0.65;

// =================================================================================================
// Benchmark Functions
// =================================================================================================

/// Scaling of one simulation with the number of stages
fn benchmark_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation");
    let settings = SimulationSettings::default();

    for stages in [10, 25, 50, 100] {
        let config = ColumnConfig::new(stages, 10.0, 1.0);

        group.bench_with_input(BenchmarkId::from_parameter(stages), &config, |b, config| {
            b.iter(|| simulate(black_box(config), black_box(AGING), &settings).unwrap());
        });
    }

    group.finish();
}

/// Adaptive vs fixed-step integration of the same problem
fn benchmark_solver_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver comparison");
    let config = ColumnConfig::default();
    let settings = SimulationSettings::new(20.0, 0.1);

    group.bench_function("Dormand-Prince 5(4)", |b| {
        b.iter(|| simulate(black_box(&config), AGING, &settings).unwrap());
    });

    group.bench_function("Runge-Kutta 4, 10 substeps", |b| {
        b.iter(|| simulate_fixed_step(black_box(&config), AGING, &settings, 10).unwrap());
    });

    group.finish();
}

fn benchmark_denoise(c: &mut Criterion) {
    let clean = simulate(&ColumnConfig::default(), AGING, &SimulationSettings::default()).unwrap();

    let mut group = c.benchmark_group("denoise");
    for sigma in [0.1, 0.7] {
        let noisy = add_gaussian_noise(&clean, sigma, 42).unwrap();

        group.bench_with_input(BenchmarkId::new("noise", sigma), &noisy, |b, noisy| {
            b.iter(|| denoise(black_box(noisy), 100).unwrap());
        });
    }
    group.finish();
}

/// Full inverse problem, noise free and noisy
fn benchmark_estimation(c: &mut Criterion) {
    let config = ColumnConfig::default();
    let clean = simulate(&config, AGING, &SimulationSettings::default()).unwrap();
    let noisy = add_gaussian_noise(&clean, 0.7, 42).unwrap();
    let (filtered, _) = denoise(&noisy, 100).unwrap();

    let mut group = c.benchmark_group("estimation");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(30));

    group.bench_function("noise free", |b| {
        b.iter(|| estimate_aging(black_box(&clean), &config, LossWeighting::Uniform).unwrap());
    });

    group.bench_function("denoised", |b| {
        b.iter(|| estimate_aging(black_box(&filtered), &config, LossWeighting::ConcentrationWeighted).unwrap());
    });

    group.finish();
}

// =================================================================================================
// Criterion Configuration
// =================================================================================================

criterion_group!(
    benches,
    benchmark_simulation,
    benchmark_solver_comparison,
    benchmark_denoise,
    benchmark_estimation,
);
criterion_main!(benches);
