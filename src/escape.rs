//! Escape-time scalar field
//!
//! Iterates a quaternion map from the embedding of a field-space point
//! until the iterate's magnitude reaches the escape radius or the iteration
//! budget runs out, and reports `ln(|q|)` at loop exit. Larger values mean
//! faster escape; points that never escape stay near or below
//! `ln(escape_radius)`. The field is continuous in the final magnitude, which
//! is what surface extraction needs to place vertices between samples.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::field::ScalarField;
use crate::map::QuaternionMap;
use crate::quaternion::Quaternion;

/// Iteration limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscapeConfig {
    /// Iteration budget per point
    pub max_iterations: u32,
    /// Magnitude at which an orbit counts as escaped
    pub escape_radius: f64,
}

impl Default for EscapeConfig {
    fn default() -> Self {
        EscapeConfig {
            max_iterations: 3,
            escape_radius: 20.0,
        }
    }
}

/// Result of one orbit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscapeOutcome {
    /// Iterate at loop exit
    pub iterate: Quaternion,
    /// Magnitude of the final iterate
    pub magnitude: f64,
    /// Number of map applications performed
    pub iterations: u32,
}

impl EscapeOutcome {
    /// Whether the orbit crossed the escape radius
    pub fn escaped(&self, config: &EscapeConfig) -> bool {
        self.magnitude >= config.escape_radius
    }

    /// The field value: `ln(magnitude)`
    #[inline]
    pub fn value(&self) -> f64 {
        self.magnitude.ln()
    }
}

/// Escape-time field of a quaternion map
#[derive(Debug, Clone)]
pub struct EscapeTimeField<M> {
    map: M,
    config: EscapeConfig,
}

impl<M: QuaternionMap> EscapeTimeField<M> {
    /// Iterate `map` with the given limits
    pub fn new(map: M, config: EscapeConfig) -> Self {
        EscapeTimeField { map, config }
    }

    /// Iterated map
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Iteration limits
    pub fn config(&self) -> &EscapeConfig {
        &self.config
    }

    /// Run the orbit of `point` and report where it stopped
    pub fn trace(&self, point: DVec3) -> EscapeOutcome {
        let mut iterate = Quaternion::from_point(point);
        let mut magnitude = iterate.magnitude();
        let mut iterations = 0;

        while magnitude < self.config.escape_radius && iterations < self.config.max_iterations {
            iterate = self.map.apply(iterate);
            magnitude = iterate.magnitude();
            iterations += 1;
        }

        EscapeOutcome {
            iterate,
            magnitude,
            iterations,
        }
    }
}

impl<M: QuaternionMap> ScalarField for EscapeTimeField<M> {
    #[inline]
    fn value_at(&self, point: DVec3) -> f64 {
        self.trace(point).value()
    }
}
