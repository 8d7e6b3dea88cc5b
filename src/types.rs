//! Core types for shaped-julia
//!
//! Defines the field-space box shared by the distance field, the octree
//! partitioner, and the virtual sampling grid.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in field space
///
/// The box is a plain value: re-centering or resizing it never touches the
/// data of any grid it annotates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBox {
    /// Minimum corner
    pub min: DVec3,
    /// Maximum corner
    pub max: DVec3,
}

impl FieldBox {
    /// Create a new box from its corners
    pub fn new(min: DVec3, max: DVec3) -> Self {
        FieldBox { min, max }
    }

    /// Create from center and half-extents
    pub fn from_center_extents(center: DVec3, half_extents: DVec3) -> Self {
        FieldBox {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Cube `[-half, half]^3` centered at the origin
    pub fn cube(half: f64) -> Self {
        Self::from_center_extents(DVec3::ZERO, DVec3::splat(half))
    }

    /// Get center point
    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along each axis
    #[inline]
    pub fn span(&self) -> DVec3 {
        self.max - self.min
    }

    /// Get half-extents
    #[inline]
    pub fn half_extents(&self) -> DVec3 {
        self.span() * 0.5
    }

    /// Enclosed volume
    pub fn volume(&self) -> f64 {
        let s = self.span();
        s.x * s.y * s.z
    }

    /// Translate the box so that its center lands on `center`
    pub fn set_center(&mut self, center: DVec3) {
        let delta = center - self.center();
        self.min += delta;
        self.max += delta;
    }

    /// Resize the box around its current center
    pub fn set_span(&mut self, span: DVec3) {
        let center = self.center();
        self.min = center - span * 0.5;
        self.max = center + span * 0.5;
    }

    /// Grow the box by `delta` on every side
    pub fn padded(&self, delta: DVec3) -> Self {
        FieldBox {
            min: self.min - delta,
            max: self.max + delta,
        }
    }

    /// Check if point is inside (boundary inclusive)
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Map a point to `[0, 1]^3` box-local coordinates (unclamped)
    #[inline]
    pub fn to_unit(&self, point: DVec3) -> DVec3 {
        (point - self.min) / self.span()
    }

    /// Map `[0, 1]^3` box-local coordinates back to field space
    #[inline]
    pub fn from_unit(&self, unit: DVec3) -> DVec3 {
        self.min + unit * self.span()
    }
}

impl Default for FieldBox {
    fn default() -> Self {
        Self::cube(0.5)
    }
}
