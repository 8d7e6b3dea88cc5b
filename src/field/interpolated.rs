//! Continuous view over a lattice
//!
//! [`InterpolatedField`] maps any field-space point to fractional lattice
//! coordinates through its own box, then blends the surrounding samples.
//! The box starts as the lattice's native box but can be re-centered or
//! resized at any time without touching the samples, so one loaded distance
//! field can be reused at several spatial offsets.
//!
//! Points outside the lattice are clamped to the nearest cell: the guided
//! map probes the field at arbitrary off-grid positions during iteration.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{LatticeGrid, ScalarField};
use crate::types::FieldBox;

/// Reconstruction filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Trilinear blend of the 8 surrounding samples
    #[default]
    Linear,
    /// Value of the nearest sample
    Nearest,
}

/// Lattice sampled continuously through a re-mappable box
#[derive(Debug, Clone)]
pub struct InterpolatedField {
    grid: Arc<LatticeGrid>,
    map_box: FieldBox,
    mode: Interpolation,
}

impl InterpolatedField {
    /// View `grid` through its native box
    pub fn new(grid: Arc<LatticeGrid>, mode: Interpolation) -> Self {
        let map_box = grid.bounds();
        InterpolatedField {
            grid,
            map_box,
            mode,
        }
    }

    /// Underlying lattice
    pub fn grid(&self) -> &Arc<LatticeGrid> {
        &self.grid
    }

    /// Box the lattice is currently mapped to
    pub fn map_box(&self) -> FieldBox {
        self.map_box
    }

    /// Mutable access to the mapping box
    pub fn map_box_mut(&mut self) -> &mut FieldBox {
        &mut self.map_box
    }

    /// Replace the mapping box
    pub fn set_map_box(&mut self, map_box: FieldBox) {
        self.map_box = map_box;
    }

    /// Translate the mapping box so its center is `center`
    pub fn set_center(&mut self, center: DVec3) {
        self.map_box.set_center(center);
    }

    /// Reconstruction filter in use
    pub fn mode(&self) -> Interpolation {
        self.mode
    }

    /// Fractional lattice coordinates clamped to the valid sample range
    #[inline]
    fn clamped_index(&self, point: DVec3) -> DVec3 {
        let f = self.grid.field_to_index(&self.map_box, point);
        let hi = self.grid.resolution_f() - DVec3::ONE;
        let axis = |v: f64, hi: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, hi) };
        DVec3::new(axis(f.x, hi.x), axis(f.y, hi.y), axis(f.z, hi.z))
    }

    fn trilinear(&self, f: DVec3) -> f64 {
        let [nx, ny, nz] = self.grid.resolution();
        let x0 = f.x as i64;
        let y0 = f.y as i64;
        let z0 = f.z as i64;
        let x1 = (x0 + 1).min(nx as i64 - 1);
        let y1 = (y0 + 1).min(ny as i64 - 1);
        let z1 = (z0 + 1).min(nz as i64 - 1);

        let tx = f.x - x0 as f64;
        let ty = f.y - y0 as f64;
        let tz = f.z - z0 as f64;

        let g = &self.grid;
        let c000 = g.get_clamped(x0, y0, z0);
        let c100 = g.get_clamped(x1, y0, z0);
        let c010 = g.get_clamped(x0, y1, z0);
        let c110 = g.get_clamped(x1, y1, z0);
        let c001 = g.get_clamped(x0, y0, z1);
        let c101 = g.get_clamped(x1, y0, z1);
        let c011 = g.get_clamped(x0, y1, z1);
        let c111 = g.get_clamped(x1, y1, z1);

        let c00 = c000 * (1.0 - tx) + c100 * tx;
        let c10 = c010 * (1.0 - tx) + c110 * tx;
        let c01 = c001 * (1.0 - tx) + c101 * tx;
        let c11 = c011 * (1.0 - tx) + c111 * tx;

        let c0 = c00 * (1.0 - ty) + c10 * ty;
        let c1 = c01 * (1.0 - ty) + c11 * ty;

        c0 * (1.0 - tz) + c1 * tz
    }
}

impl ScalarField for InterpolatedField {
    fn value_at(&self, point: DVec3) -> f64 {
        let f = self.clamped_index(point);
        match self.mode {
            Interpolation::Linear => self.trilinear(f),
            Interpolation::Nearest => {
                let r = f.round();
                self.grid.get_clamped(r.x as i64, r.y as i64, r.z as i64)
            }
        }
    }
}
