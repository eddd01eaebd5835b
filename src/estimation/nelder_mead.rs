//! Nelder-Mead simplex minimiser
//!
//! Derivative-free local search over `n` parameters with the standard
//! coefficients: reflection 1, expansion 2, contraction ½, shrink ½.
//!
//! # Initial simplex
//!
//! Vertex 0 is the start point. Vertex `k + 1` perturbs coordinate `k` by 5%
//! (or sets it to `0.00025` when it is zero).
//!
//! # Termination
//!
//! Stops when both hold:
//!
//! - every vertex is within `xatol` of the best one, in every coordinate
//! - every vertex value is within `fatol` of the best value
//!
//! or when the iteration or evaluation budget (default `200 · n` each) runs
//! out, which is logged as a warning.
//!
//! Infinite values (infeasible vertices) sort behind every finite one, so the
//! simplex is pushed back into the feasible region.

use std::cell::Cell;

use nalgebra::DVector;

use crate::error::{Result, TwinError};
use crate::estimation::objective::{AgingObjective, Loss};
use crate::estimation::stages::{Candidate, Refinement, RefineStage};

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Relative perturbation of non-zero start coordinates
const NONZERO_STEP: f64 = 0.05;

/// Absolute perturbation of zero start coordinates
const ZERO_STEP: f64 = 0.00025;

/// Nelder-Mead settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMead {
    /// Absolute tolerance on vertex coordinates
    pub xatol: f64,

    /// Absolute tolerance on vertex values
    pub fatol: f64,

    /// Iteration budget, `200 · n` when `None`
    pub max_iterations: Option<usize>,

    /// Evaluation budget, `200 · n` when `None`
    pub max_evaluations: Option<usize>,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self::with_tolerance(1e-5)
    }
}

/// Result of [`NelderMead::minimize`]
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub x: DVector<f64>,
    pub value: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
}

impl NelderMead {
    /// Same tolerance on coordinates and values
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            xatol: tolerance,
            fatol: tolerance,
            max_iterations: None,
            max_evaluations: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.xatol >= 0.0 && self.fatol >= 0.0) {
            return Err(TwinError::configuration(format!(
                "Nelder-Mead tolerances must be non-negative, got xatol {} and fatol {}",
                self.xatol, self.fatol
            )));
        }
        if self.max_iterations == Some(0) || self.max_evaluations == Some(0) {
            return Err(TwinError::configuration("Nelder-Mead budgets must be positive"));
        }
        Ok(())
    }

    fn initial_simplex(x0: &DVector<f64>) -> Vec<DVector<f64>> {
        let mut simplex = Vec::with_capacity(x0.len() + 1);
        simplex.push(x0.clone());

        for k in 0..x0.len() {
            let mut vertex = x0.clone();
            vertex[k] = if vertex[k] != 0.0 { (1.0 + NONZERO_STEP) * vertex[k] } else { ZERO_STEP };
            simplex.push(vertex);
        }

        simplex
    }

    /// Minimise `f` starting from `x0`
    ///
    /// `f` may return `f64::INFINITY` for points outside its domain. Errors
    /// from `f` abort the search.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chrom_twin::estimation::NelderMead;
    /// use nalgebra::DVector;
    ///
    /// let start = DVector::from_vec(vec![1.0, 1.0]);
    /// let minimum = NelderMead::with_tolerance(1e-8)
    ///     .minimize(&start, |x| Ok((x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2)))
    ///     .unwrap();
    ///
    /// assert!((minimum.x[0] - 3.0).abs() < 1e-4);
    /// assert!((minimum.x[1] + 1.0).abs() < 1e-4);
    /// ```
    pub fn minimize<F>(&self, x0: &DVector<f64>, mut f: F) -> Result<Minimum>
    where
        F: FnMut(&DVector<f64>) -> Result<f64>,
    {
        self.validate()?;

        let n = x0.len();
        if n == 0 {
            return Err(TwinError::configuration("Nelder-Mead needs at least one parameter"));
        }

        let max_iterations = self.max_iterations.unwrap_or(200 * n);
        let max_evaluations = self.max_evaluations.unwrap_or(200 * n);

        let evaluations = Cell::new(0usize);
        let mut eval = |x: &DVector<f64>| -> Result<f64> {
            evaluations.set(evaluations.get() + 1);
            let value = f(x)?;
            // NaN would break the ordering
            Ok(if value.is_nan() { f64::INFINITY } else { value })
        };

        let mut simplex = Self::initial_simplex(x0);
        let mut values = simplex.iter().map(&mut eval).collect::<Result<Vec<f64>>>()?;
        sort_simplex(&mut simplex, &mut values);

        let mut iterations = 0usize;
        let mut converged = false;

        loop {
            if self.has_converged(&simplex, &values) {
                converged = true;
                break;
            }
            if iterations >= max_iterations || evaluations.get() >= max_evaluations {
                break;
            }

            let worst = n;
            let centroid = simplex[..n].iter().fold(DVector::zeros(n), |acc, v| acc + v) / n as f64;

            let reflected = &centroid * (1.0 + REFLECTION) - &simplex[worst] * REFLECTION;
            let f_reflected = eval(&reflected)?;

            if f_reflected < values[0] {
                let expanded = &centroid * (1.0 + REFLECTION * EXPANSION) - &simplex[worst] * (REFLECTION * EXPANSION);
                let f_expanded = eval(&expanded)?;

                if f_expanded < f_reflected {
                    simplex[worst] = expanded;
                    values[worst] = f_expanded;
                } else {
                    simplex[worst] = reflected;
                    values[worst] = f_reflected;
                }
            } else if f_reflected < values[n - 1] {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
            } else {
                let shrink = if f_reflected < values[worst] {
                    // outside contraction
                    let contracted = &centroid * (1.0 + CONTRACTION * REFLECTION)
                        - &simplex[worst] * (CONTRACTION * REFLECTION);
                    let f_contracted = eval(&contracted)?;

                    if f_contracted <= f_reflected {
                        simplex[worst] = contracted;
                        values[worst] = f_contracted;
                        false
                    } else {
                        true
                    }
                } else {
                    // inside contraction
                    let contracted = &centroid * (1.0 - CONTRACTION) + &simplex[worst] * CONTRACTION;
                    let f_contracted = eval(&contracted)?;

                    if f_contracted < values[worst] {
                        simplex[worst] = contracted;
                        values[worst] = f_contracted;
                        false
                    } else {
                        true
                    }
                };

                if shrink {
                    let best = simplex[0].clone();
                    for j in 1..=n {
                        simplex[j] = &best + (&simplex[j] - &best) * SHRINK;
                        values[j] = eval(&simplex[j])?;
                    }
                }
            }

            iterations += 1;
            sort_simplex(&mut simplex, &mut values);
        }

        if !converged {
            log::warn!(
                "Nelder-Mead stopped after {} iterations and {} evaluations without meeting \
                 xatol {:e} / fatol {:e}",
                iterations,
                evaluations.get(),
                self.xatol,
                self.fatol
            );
        }

        Ok(Minimum {
            x: simplex[0].clone(),
            value: values[0],
            iterations,
            evaluations: evaluations.get(),
            converged,
        })
    }

    fn has_converged(&self, simplex: &[DVector<f64>], values: &[f64]) -> bool {
        // an all-infeasible simplex has not converged
        if !values[0].is_finite() {
            return false;
        }

        let best = &simplex[0];
        let x_spread = simplex[1..]
            .iter()
            .map(|v| (v - best).amax())
            .fold(0.0, f64::max);
        let f_spread = values[1..]
            .iter()
            .map(|f| (f - values[0]).abs())
            .fold(0.0, f64::max);

        x_spread <= self.xatol && f_spread <= self.fatol
    }
}

/// Stable sort of vertices by value, best first
fn sort_simplex(simplex: &mut Vec<DVector<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}

impl RefineStage for NelderMead {
    fn refine(&self, objective: &AgingObjective<'_>, seed: Candidate) -> Result<Refinement> {
        let start = DVector::from_element(1, seed.aging);

        let minimum = self.minimize(&start, |x| {
            let loss = objective.evaluate(x[0])?;
            log::debug!("simplex vertex {:.6}: loss {}", x[0], loss);
            Ok(loss.score())
        })?;

        // never report something worse than the seed
        let refined = Candidate::new(minimum.x[0], Loss::from_score(minimum.value));
        let best = if refined.loss.score() <= seed.loss.score() { refined } else { seed };

        Ok(Refinement {
            best,
            iterations: minimum.iterations,
            converged: minimum.converged,
        })
    }

    fn name(&self) -> &'static str {
        "Nelder-Mead"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
