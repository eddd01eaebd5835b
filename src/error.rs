//! Error types
//!
//! Every fallible operation of the crate returns [`TwinError`]. Variants are
//! grouped by the stage that raised them so that callers can tell a bad
//! configuration apart from a numerical failure or a degenerate filter.
//!
//! Out-of-domain aging hypotheses are **not** errors: the estimator models
//! them as [`Loss::Infeasible`](crate::estimation::Loss::Infeasible).

use thiserror::Error;

/// Canonical error type of the digital twin
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TwinError {
    /// Invalid structural parameters or numerical settings
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Integration failed (non-finite state, step budget, step underflow)
    #[error("simulation error: {0}")]
    Simulation(String),

    /// Smoothing filter cannot be built or applied
    #[error("filter error: {0}")]
    Filter(String),

    /// Inverse problem is ill-posed for the given inputs
    #[error("estimation error: {0}")]
    Estimation(String),
}

impl TwinError {
    /// Shorthand for a [`TwinError::Configuration`]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Shorthand for a [`TwinError::Simulation`]
    pub fn simulation(message: impl Into<String>) -> Self {
        Self::Simulation(message.into())
    }

    /// Shorthand for a [`TwinError::Filter`]
    pub fn filter(message: impl Into<String>) -> Self {
        Self::Filter(message.into())
    }

    /// Shorthand for a [`TwinError::Estimation`]
    pub fn estimation(message: impl Into<String>) -> Self {
        Self::Estimation(message.into())
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, TwinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_stage_prefix() {
        let err = TwinError::simulation("NaN detected at step 4");
        assert_eq!(err.to_string(), "simulation error: NaN detected at step 4");

        let err = TwinError::filter("window too small");
        assert!(err.to_string().starts_with("filter error"));
    }

    #[test]
    fn test_variants_are_distinct() {
        assert_ne!(
            TwinError::configuration("x"),
            TwinError::simulation("x"),
        );
    }
}
