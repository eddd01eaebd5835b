//! Temporal injection profiles
//!
//! Defines how concentration at the column inlet (stage 0 feed) varies with TIME.
//!
//! # Use Case
//!
//! The feed is switched on for a fixed duration and then returns to a clean
//! carrier. Every species carries its own profile so that target and impurity
//! can be fed at different concentrations over the same window.
//!
//! # Example
//!
//! ```rust
//! use chrom_twin::models::TemporalInjection;
//!
//! // 100 units from t=0.5 to t=1.0 min, both ends included
//! let injection = TemporalInjection::rectangle(0.5, 1.0, 100.0);
//!
//! assert_eq!(injection.evaluate(0.4), 0.0);
//! assert_eq!(injection.evaluate(0.5), 100.0);
//! assert_eq!(injection.evaluate(1.0), 100.0);
//! assert_eq!(injection.evaluate(1.01), 0.0);
//! ```

/// Temporal injection profile at column inlet
///
/// # Types
///
/// - **Rectangle**: Constant feed over a closed time window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemporalInjection {
    /// Rectangular (constant) injection over `[start, end]`
    ///
    /// # Parameters
    ///
    /// - `start` : Start time \[min\]
    /// - `end` : End time \[min\], inclusive
    /// - `concentration` : Constant feed concentration during injection
    Rectangle {
        start: f64,
        end: f64,
        concentration: f64,
    },
}

impl TemporalInjection {
    /// Create a rectangular temporal injection
    ///
    /// # Arguments
    ///
    /// * `start` - Start time \[min\]
    /// * `end` - End time \[min\], inclusive
    /// * `concentration` - Constant concentration
    ///
    /// # Panics
    ///
    /// Panics when `end <= start`.
    pub fn rectangle(start: f64, end: f64, concentration: f64) -> Self {
        assert!(end > start, "Rectangle end must be > start");
        Self::Rectangle { start, end, concentration }
    }

    /// Evaluate the injection profile at a given time
    ///
    /// # Returns
    ///
    /// Concentration fed to the first stage at time `t`
    pub fn evaluate(&self, t: f64) -> f64 {
        match self {
            Self::Rectangle { start, end, concentration } => {
                if t >= *start && t <= *end {
                    *concentration
                } else {
                    0.0
                }
            }
        }
    }

    /// Duration of the feed window
    pub fn duration(&self) -> f64 {
        match self {
            Self::Rectangle { start, end, .. } => end - start,
        }
    }

    /// Time integral of the inlet concentration (concentration × duration)
    ///
    /// Every stage exchanges at the same flow rate, so this is also the
    /// time integral of the outlet concentration once the pulse has eluted.
    pub fn dose(&self) -> f64 {
        match self {
            Self::Rectangle { concentration, .. } => concentration * self.duration(),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_injection() {
        let injection = TemporalInjection::rectangle(0.5, 1.0, 50.0);

        // Before
        assert_eq!(injection.evaluate(0.0), 0.0);
        assert_eq!(injection.evaluate(0.499), 0.0);

        // During, both ends included
        assert_eq!(injection.evaluate(0.5), 50.0);
        assert_eq!(injection.evaluate(0.75), 50.0);
        assert_eq!(injection.evaluate(1.0), 50.0);

        // After
        assert_eq!(injection.evaluate(1.0001), 0.0);
        assert_eq!(injection.evaluate(99.9), 0.0);
    }

    #[test]
    fn test_dose() {
        let injection = TemporalInjection::rectangle(0.5, 1.0, 100.0);
        assert_eq!(injection.duration(), 0.5);
        assert_eq!(injection.dose(), 50.0);
    }

    #[test]
    #[should_panic(expected = "Rectangle end must be > start")]
    fn test_rectangle_invalid() {
        TemporalInjection::rectangle(1.0, 1.0, 100.0);
    }
}
