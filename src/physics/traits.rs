//! Physical models traits and types
//!
//! This module defines the core API for physical models:
//! - `PhysicalModel`: trait for all physical models
//! - `PhysicalState`: flexible state container
//! - `PhysicalQuantity`: type-safe quantity identifiers

use std::collections::HashMap;

use crate::physics::PhysicalData;

/// Metadata key under which solvers publish the current simulation time
pub const TIME_KEY: &str = "time";

// =================================================================================================
// Physical quantities (Type-safe Identifiers)
// =================================================================================================

/// Known physical quantities (type-safe enum)
///
/// # Example
/// ```
/// use chrom_twin::physics::{PhysicalData, PhysicalQuantity, PhysicalState};
///
/// let holdup = PhysicalQuantity::Custom("Holdup");
/// let mut state = PhysicalState::empty();
/// state.set(holdup, PhysicalData::uniform_vector(50, 0.0));
/// assert!(state.get(holdup).is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalQuantity {
    /// Concentration (arbitrary concentration units)
    Concentration,

    /// Custom quantity (for use extension)
    Custom(&'static str),
}

impl std::fmt::Display for PhysicalQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhysicalQuantity::Concentration => write!(f, "Concentration"),
            PhysicalQuantity::Custom(name) => write!(f, "{}", name),
        }
    }
}

// =================================================================================================
// Physical State (Flexible State Container)
// =================================================================================================

/// Physical state of the system
///
/// Contains all physical quantities at a given time, plus scalar metadata.
/// Solvers use the metadata to pass the current time to the model
/// (see [`TIME_KEY`]).
///
/// # Example
/// ```
/// use chrom_twin::physics::{PhysicalData, PhysicalQuantity, PhysicalState};
///
/// let mut state = PhysicalState::new(
///     PhysicalQuantity::Concentration,
///     PhysicalData::uniform_vector(100, 0.0),
/// );
/// state.set_time(0.5);
/// assert_eq!(state.time(), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalState {
    /// Physical quantities stored in a dictionary
    quantities: HashMap<PhysicalQuantity, PhysicalData>,

    /// Scalar metadata (e.g. current time)
    metadata: HashMap<String, f64>,
}

impl PhysicalState {
    /// Create a new state with primary quantity
    pub fn new(quantity: PhysicalQuantity, value: PhysicalData) -> Self {
        let mut quantities = HashMap::new();
        quantities.insert(quantity, value);

        Self {
            quantities,
            metadata: HashMap::new(),
        }
    }

    /// Create an empty state
    pub fn empty() -> Self {
        Self {
            quantities: HashMap::new(),
            metadata: HashMap::new(),
        }
    }

    /// Get a quantity by type
    pub fn get(&self, quantity: PhysicalQuantity) -> Option<&PhysicalData> {
        self.quantities.get(&quantity)
    }

    /// Get mutable reference to a quantity
    pub fn get_mut(&mut self, quantity: PhysicalQuantity) -> Option<&mut PhysicalData> {
        self.quantities.get_mut(&quantity)
    }

    /// Set a quantity
    pub fn set(&mut self, quantity: PhysicalQuantity, value: PhysicalData) {
        self.quantities.insert(quantity, value);
    }

    /// List of available physical state quantities
    pub fn available_quantities(&self) -> Vec<PhysicalQuantity> {
        self.quantities.keys().cloned().collect()
    }

    /// Iterate over `(quantity, data)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&PhysicalQuantity, &PhysicalData)> {
        self.quantities.iter()
    }

    /// Get a metadata
    pub fn get_metadata(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).copied()
    }

    /// Set a metadata
    pub fn set_metadata(&mut self, key: String, value: f64) {
        self.metadata.insert(key, value);
    }

    /// Current simulation time, `0.0` when no solver has set it yet
    pub fn time(&self) -> f64 {
        self.get_metadata(TIME_KEY).unwrap_or(0.0)
    }

    /// Publish the current simulation time
    pub fn set_time(&mut self, t: f64) {
        self.set_metadata(TIME_KEY.to_string(), t);
    }

    /// Returns the first quantity holding a NaN or infinite value, if any
    pub fn first_non_finite(&self) -> Option<PhysicalQuantity> {
        self.quantities
            .iter()
            .find(|(_, data)| !data.is_finite())
            .map(|(quantity, _)| *quantity)
    }
}

// Operator overloading for numerical operations

impl std::ops::Add for PhysicalState {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        for (quantity, value) in rhs.quantities {
            if let Some(existing_value) = self.quantities.remove(&quantity) {
                self.quantities.insert(quantity, existing_value + value);
            } else {
                self.quantities.insert(quantity, value);
            }
        }
        self
    }
}

impl std::ops::Mul<f64> for PhysicalState {
    type Output = Self;

    fn mul(mut self, scalar: f64) -> Self::Output {
        for data in self.quantities.values_mut() {
            data.apply(|x| x * scalar);
        }
        self
    }
}

// =================================================================================================
// Physical Model Trait
// =================================================================================================

/// Trait for physical models
///
/// # Responsibility
/// Computes the right-hand side `dy/dt = f(y, t)` of the system at a given
/// state. Does NOT integrate it (that's the Solver's job).
///
/// Time-dependent boundary conditions read the current time through
/// [`PhysicalState::time`]; solvers set it before every evaluation.
pub trait PhysicalModel: Send + Sync {

    /// Number of state values per quantity
    ///
    /// Used by the solver to allocate vectors
    fn points(&self) -> usize;

    /// Computes the physics at a given state
    ///
    /// Returns the time derivative of every quantity in `state`.
    fn compute_physics(&self, state: &PhysicalState) -> PhysicalState;

    /// Creates the initial state for this physical model
    fn setup_initial_state(&self) -> PhysicalState;

    /// Name of the model (used to display and logging)
    fn name(&self) -> &str;

    /// Description of the model (option)
    fn description(&self) -> Option<&str> {
        None
    }
}
