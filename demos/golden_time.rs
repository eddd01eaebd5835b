//! Example: golden-time control of an aged column
//!
//! Runs the three scenarios of a validation campaign:
//!
//! 1. **Reference**: a fresh column (a = 1.0) and an aged one (a = 0.65),
//!    noise free. The aged column elutes earlier.
//! 2. **Noisy plant**: the aged column measured with Gaussian sensor noise
//!    (σ = 0.7), denoised, then fed to the estimator.
//! 3. **Control**: cut point from the estimate, scored against the true
//!    golden time and against the legacy 55-min recipe.
//!
//! ```bash
//! RUST_LOG=info cargo run --release --example golden_time
//! ```

use chrom_twin::{
    decide_control, denoise, estimate_aging,
    estimation::LossWeighting,
    evaluation::PerformanceReport,
    models::ColumnConfig,
    noise::add_gaussian_noise,
    simulation::{simulate, SimulationSettings},
};

use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("═══════════════════════════════════════════════════════");
    println!("  Digital Twin - Golden Time Control");
    println!("═══════════════════════════════════════════════════════\n");

    // ====== Column and scenario parameters ======

    let config = ColumnConfig::default();
    let settings = SimulationSettings::default();
    let true_aging = 0.65;
    let noise_level = 0.7;
    let seed = 42;

    println!("Column:");
    println!("  Stages         : {}", config.stage_count);
    println!("  Volume         : {}", config.total_volume);
    println!("  Flow rate      : {}", config.flow_rate);
    println!("  Horizon        : {} min, sampled every {} min\n", settings.t_max, settings.dt);

    // =============================================================================================
    // Scenario 1: reference
    // =============================================================================================

    let fresh = simulate(&config, 1.0, &settings)?;
    let aged = simulate(&config, true_aging, &settings)?;

    let (fresh_peak, fresh_height) = fresh.peak().ok_or("empty trajectory")?;
    let (aged_peak, aged_height) = aged.peak().ok_or("empty trajectory")?;

    println!("Reference peaks:");
    println!("  a = 1.00 : {:6.2} min (height {:.3})", fresh_peak, fresh_height);
    println!("  a = {:.2} : {:6.2} min (height {:.3})", true_aging, aged_peak, aged_height);
    println!("  Shift    : {:6.2} min\n", fresh_peak - aged_peak);

    // =============================================================================================
    // Scenario 2: noisy plant data
    // =============================================================================================

    let measured = add_gaussian_noise(&aged, noise_level, seed)?;
    let (filtered, plan) = denoise(&measured, 100)?;

    println!("Denoiser:");
    println!("  Noise σ        : {:.4}", plan.noise_sigma);
    println!("  Window         : {} (poly {})\n", plan.window_length, plan.poly_order);

    let start = Instant::now();
    let estimation = estimate_aging(&filtered, &config, LossWeighting::ConcentrationWeighted)?;
    let elapsed = start.elapsed();

    println!("Estimator:");
    println!("  Seed           : {:.4}", estimation.seed.aging);
    println!("  Estimate       : {:.4}", estimation.aging_estimate);
    println!("  Residual       : {:.4e}", estimation.residual_error);
    println!("  Simulations    : {}", estimation.simulations);
    println!("  Time           : {:.2?}\n", elapsed);

    // =============================================================================================
    // Scenario 3: control
    // =============================================================================================

    let decision = decide_control(&estimation, &config)?;

    println!("Decision:");
    println!("  Peak           : {:.2} min", decision.peak_time);
    println!("  Margin         : {:.2} min", decision.margin);
    println!("  Cut point      : {:.2} min\n", decision.cut_point);

    let report = PerformanceReport::new(true_aging, &aged, &estimation, &decision)?;

    println!("═══════════════════════════════════════════════════════");
    println!("  Performance");
    println!("═══════════════════════════════════════════════════════\n");
    println!("{report}");

    Ok(())
}
