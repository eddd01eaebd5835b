//! Adaptive Dormand-Prince 5(4) integrator
//!
//! # Mathematical Background
//!
//! Seven-stage explicit Runge-Kutta pair. The fifth-order solution advances
//! the state (local extrapolation) and the difference with the embedded
//! fourth-order solution estimates the local error:
//!
//! ```text
//! err = ‖ (y₅ − y₄) / (atol + rtol · max(|yₙ|, |yₙ₊₁|)) ‖_rms
//! ```
//!
//! A step is accepted when `err ≤ 1`. The next step is scaled by
//! `0.9 · err^(-1/5)`, clamped to `[0.2, 5]`. The last stage of an accepted
//! step is the first stage of the next one (FSAL), so an accepted step costs
//! six evaluations.
//!
//! # Output grid
//!
//! The state is reported on the uniform grid `t_k = k · output_interval`.
//! Steps are shortened so that every grid time is hit exactly. No
//! interpolation is involved, so the reported values are the integrator's
//! own solution at those times.
//!
//! # Step cap
//!
//! The internal step never exceeds `max_step`. The feed pulse switches on
//! and off discontinuously, and a capped step guarantees the integrator
//! cannot step over it.

use crate::error::{Result, TwinError};
use crate::physics::PhysicalState;
use crate::solver::{validate_state, Scenario, SimulationResult, Solver, SolverConfiguration, SolverType};

// Dormand–Prince tableau
const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

// 4th-order weights (error estimate)
const B1: f64 = 5179.0 / 57600.0;
const B3: f64 = 7571.0 / 16695.0;
const B4: f64 = 393.0 / 640.0;
const B5: f64 = -92097.0 / 339200.0;
const B6: f64 = 187.0 / 2100.0;
const B7: f64 = 1.0 / 40.0;

// 5th-order weights (advancing solution)
const BH1: f64 = 35.0 / 384.0;
const BH3: f64 = 500.0 / 1113.0;
const BH4: f64 = 125.0 / 192.0;
const BH5: f64 = -2187.0 / 6784.0;
const BH6: f64 = 11.0 / 84.0;

// y5 - y4
const E1: f64 = BH1 - B1;
const E3: f64 = BH3 - B3;
const E4: f64 = BH4 - B4;
const E5: f64 = BH5 - B5;
const E6: f64 = BH6 - B6;
const E7: f64 = -B7;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Smallest step before the integration is declared failed
const H_MIN: f64 = 1e-14;

// =================================================================================================
// Dormand-Prince Solver
// =================================================================================================

/// Adaptive explicit integrator with error control
///
/// Only accepts [`SolverType::AdaptiveTimeEvolution`].
///
/// # Example
///
/// ```rust
/// use chrom_twin::models::{ColumnConfig, TankCascade};
/// use chrom_twin::solver::{DormandPrinceSolver, Scenario, Solver, SolverConfiguration};
///
/// let model = TankCascade::new(&ColumnConfig::default(), 0.65).unwrap();
/// let scenario = Scenario::from_model(Box::new(model));
/// let config = SolverConfiguration::adaptive_time_evolution(0.1, 11, 0.05, 1e-6, 1e-9);
///
/// let result = DormandPrinceSolver::new().solve(&scenario, &config).unwrap();
/// assert_eq!(result.time_points.last(), Some(&1.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DormandPrinceSolver;

impl DormandPrinceSolver {
    pub fn new() -> Self {
        Self
    }
}

/// `base + Σ coeff · k`, keeping the metadata of `base`
fn combine(base: &PhysicalState, terms: &[(&PhysicalState, f64)]) -> PhysicalState {
    terms
        .iter()
        .fold(base.clone(), |acc, (k, coeff)| acc + (*k).clone() * *coeff)
}

/// RMS of `err / (atol + rtol · max(|y|, |y_new|))` over every value of every quantity
fn error_norm(
    err: &PhysicalState,
    y: &PhysicalState,
    y_new: &PhysicalState,
    rtol: f64,
    atol: f64,
) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;

    for (quantity, e) in err.iter() {
        let (Some(y0), Some(y1)) = (y.get(*quantity), y_new.get(*quantity)) else {
            continue;
        };

        for ((ei, a), b) in e.as_slice().iter().zip(y0.as_slice()).zip(y1.as_slice()) {
            let scale = atol + rtol * a.abs().max(b.abs());
            let r = ei / scale;
            sum += r * r;
            count += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        (sum / count as f64).sqrt()
    }
}

impl Solver for DormandPrinceSolver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult> {

        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        let (output_interval, output_samples, max_step, rtol, atol, max_steps) = match &config.solver_type {
            SolverType::AdaptiveTimeEvolution {
                output_interval,
                output_samples,
                max_step,
                rtol,
                atol,
                max_steps,
            } => (*output_interval, *output_samples, *max_step, *rtol, *atol, *max_steps),
            other => {
                return Err(TwinError::configuration(format!(
                    "DormandPrinceSolver only supports AdaptiveTimeEvolution configuration, got {}",
                    other.name()
                )));
            }
        };

        // ====== Step 2: Setup ======

        let mut state = match scenario.conditions.initial_condition() {
            Some(initial_state) => initial_state.clone(),
            None => return Err(TwinError::configuration("No initial condition found in domain boundaries")),
        };
        state.set_time(0.0);
        validate_state(&state, 0)?;

        let mut time_points = Vec::with_capacity(output_samples);
        let mut trajectory = Vec::with_capacity(output_samples);
        time_points.push(0.0);
        trajectory.push(state.clone());

        let model = &scenario.model;
        let evaluate = |y: &PhysicalState, t: f64| {
            let mut stage = y.clone();
            stage.set_time(t);
            model.compute_physics(&stage)
        };

        let mut t = 0.0;
        let mut h = max_step.min(output_interval);
        let mut k1 = evaluate(&state, t);
        let mut evaluations = 1usize;
        let mut accepted = 0usize;
        let mut rejected = 0usize;
        let mut next_output = 1usize;

        // ====== Step 3: Adaptive integration ======

        while next_output < output_samples {
            if accepted + rejected >= max_steps {
                return Err(TwinError::simulation(format!(
                    "exceeded {} steps at t = {:.6} before reaching t = {:.6}",
                    max_steps,
                    t,
                    (output_samples - 1) as f64 * output_interval
                )));
            }

            let t_target = next_output as f64 * output_interval;
            let remaining = t_target - t;
            let mut h_try = h.min(max_step);
            let hits_output = h_try >= remaining - 1e-12 * t_target.max(1.0);
            if hits_output {
                h_try = remaining;
            }

            // ====== Stages ======

            let y2 = combine(&state, &[(&k1, h_try * A21)]);
            let k2 = evaluate(&y2, t + C2 * h_try);

            let y3 = combine(&state, &[(&k1, h_try * A31), (&k2, h_try * A32)]);
            let k3 = evaluate(&y3, t + C3 * h_try);

            let y4 = combine(&state, &[(&k1, h_try * A41), (&k2, h_try * A42), (&k3, h_try * A43)]);
            let k4 = evaluate(&y4, t + C4 * h_try);

            let y5 = combine(
                &state,
                &[(&k1, h_try * A51), (&k2, h_try * A52), (&k3, h_try * A53), (&k4, h_try * A54)],
            );
            let k5 = evaluate(&y5, t + C5 * h_try);

            let y6 = combine(
                &state,
                &[
                    (&k1, h_try * A61),
                    (&k2, h_try * A62),
                    (&k3, h_try * A63),
                    (&k4, h_try * A64),
                    (&k5, h_try * A65),
                ],
            );
            let k6 = evaluate(&y6, t + h_try);

            let y_new = combine(
                &state,
                &[
                    (&k1, h_try * BH1),
                    (&k3, h_try * BH3),
                    (&k4, h_try * BH4),
                    (&k5, h_try * BH5),
                    (&k6, h_try * BH6),
                ],
            );
            let k7 = evaluate(&y_new, t + h_try);
            evaluations += 6;

            let err = k1.clone() * (h_try * E1)
                + k3.clone() * (h_try * E3)
                + k4 * (h_try * E4)
                + k5 * (h_try * E5)
                + k6 * (h_try * E6)
                + k7.clone() * (h_try * E7);
            let err_norm = error_norm(&err, &state, &y_new, rtol, atol);

            if !err_norm.is_finite() {
                // NaN in a stage: shrink until the step underflows, then report
                rejected += 1;
                h = h_try * MIN_FACTOR;
                if h < H_MIN {
                    let mut failed = y_new;
                    failed.set_time(t + h_try);
                    validate_state(&failed, accepted + rejected)?;
                    return Err(TwinError::simulation(format!(
                        "error estimate is not finite at t = {t:.6}"
                    )));
                }
                continue;
            }

            let factor = if err_norm == 0.0 {
                MAX_FACTOR
            } else {
                (SAFETY * err_norm.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
            };

            if err_norm <= 1.0 {
                accepted += 1;
                t = if hits_output { t_target } else { t + h_try };
                state = y_new;
                state.set_time(t);
                k1 = k7;

                validate_state(&state, accepted)?;

                if hits_output {
                    time_points.push(t_target);
                    trajectory.push(state.clone());
                    next_output += 1;
                }

                // A step shortened to land on the grid says nothing about the
                // admissible step, so it never shrinks the proposal.
                let proposed = h_try * factor;
                h = if hits_output && factor >= 1.0 { proposed.max(h) } else { proposed };
                h = h.min(max_step);
            } else {
                rejected += 1;
                h = h_try * factor;
                if h < H_MIN {
                    return Err(TwinError::simulation(format!(
                        "step size underflow at t = {t:.6} (error norm {err_norm:.3e})"
                    )));
                }
            }
        }

        log::debug!(
            "{}: {} accepted, {} rejected steps, {} evaluations",
            scenario.get_model_name(),
            accepted,
            rejected,
            evaluations
        );

        // ====== Step 4: Build Result ======

        let mut result = SimulationResult::new(time_points, trajectory, state);

        result.add_metadata("solver", self.name());
        result.add_metadata("accepted steps", &accepted.to_string());
        result.add_metadata("rejected steps", &rejected.to_string());
        result.add_metadata("function evaluations", &evaluations.to_string());
        result.add_metadata("max step", &max_step.to_string());

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Dormand-Prince (RK45)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
