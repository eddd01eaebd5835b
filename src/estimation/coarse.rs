//! Coarse grid search
//!
//! Evaluates the objective on evenly spaced aging factors and keeps the best.
//! Far from the truth the simulated and observed peaks no longer overlap and
//! the loss flattens out, so the local search needs a seed from this grid.
//!
//! With the `parallel` feature the grid points are simulated on the rayon
//! thread pool. The result does not depend on evaluation order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Result, TwinError};
use crate::estimation::objective::AgingObjective;
use crate::estimation::stages::{Candidate, SeedStage};

/// Uniform grid over `[lower, upper]`, both ends included
///
/// Defaults to 20 points over `[0.1, 2.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoarseGrid {
    pub lower: f64,
    pub upper: f64,
    pub points: usize,
}

impl Default for CoarseGrid {
    fn default() -> Self {
        Self { lower: 0.1, upper: 2.0, points: 20 }
    }
}

impl CoarseGrid {
    pub fn new(lower: f64, upper: f64, points: usize) -> Self {
        Self { lower, upper, points }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(TwinError::configuration("grid bounds must be finite"));
        }
        if self.points == 0 {
            return Err(TwinError::configuration("grid needs at least one point"));
        }
        if self.points > 1 && self.upper <= self.lower {
            return Err(TwinError::configuration(format!(
                "grid upper bound {} must exceed lower bound {}",
                self.upper, self.lower
            )));
        }
        Ok(())
    }

    /// Grid values, `lower + i · (upper − lower) / (points − 1)`
    ///
    /// The last value is exactly `upper`.
    ///
    /// ```rust
    /// use chrom_twin::estimation::CoarseGrid;
    ///
    /// let grid = CoarseGrid::default().values();
    /// assert_eq!(grid.len(), 20);
    /// assert_eq!(grid[0], 0.1);
    /// assert_eq!(grid[19], 2.0);
    /// ```
    pub fn values(&self) -> Vec<f64> {
        if self.points == 1 {
            return vec![self.lower];
        }

        let last = self.points - 1;
        let step = (self.upper - self.lower) / last as f64;
        (0..self.points)
            .map(|i| if i == last { self.upper } else { self.lower + i as f64 * step })
            .collect()
    }

    fn evaluate_all(&self, objective: &AgingObjective<'_>, grid: &[f64]) -> Result<Vec<Candidate>> {
        #[cfg(feature = "parallel")]
        {
            grid.par_iter()
                .map(|&aging| Candidate::evaluate(objective, aging))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            grid.iter()
                .map(|&aging| Candidate::evaluate(objective, aging))
                .collect()
        }
    }
}

/// First candidate with strictly the smallest score
fn first_minimum(candidates: &[Candidate]) -> Option<Candidate> {
    candidates
        .iter()
        .filter(|c| c.loss.is_feasible())
        .fold(None, |best: Option<Candidate>, c| match best {
            Some(b) if c.loss.score() >= b.loss.score() => Some(b),
            _ => Some(*c),
        })
}

impl SeedStage for CoarseGrid {
    fn seed(&self, objective: &AgingObjective<'_>) -> Result<Candidate> {
        self.validate()?;

        let grid = self.values();
        let candidates = self.evaluate_all(objective, &grid)?;

        for candidate in &candidates {
            log::debug!("grid aging {:.4}: loss {}", candidate.aging, candidate.loss);
        }

        first_minimum(&candidates).ok_or_else(|| {
            TwinError::estimation(format!(
                "no feasible point on the grid [{}, {}]",
                self.lower, self.upper
            ))
        })
    }

    fn name(&self) -> &'static str {
        "coarse grid"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
