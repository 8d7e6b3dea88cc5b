//! Dense scalar lattice
//!
//! Stores samples in a flat array with x-fastest ordering:
//! `index = i + j * nx + k * nx * ny`.
//!
//! The lattice carries a field-space box: index `(0, 0, 0)` maps to
//! `bounds.min` and index `(nx, ny, nz)` maps to `bounds.max`. Integer
//! lookups outside `[0, nx) x [0, ny) x [0, nz)` are handled according to the
//! [`EdgePolicy`] fixed at construction.

use glam::DVec3;
use thiserror::Error;

use super::ScalarField;
use crate::types::FieldBox;

/// Lattice construction and lookup errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Some axis has zero samples
    #[error("grid resolution must be positive on every axis, got {0:?}")]
    ZeroResolution([usize; 3]),

    /// Sample buffer length does not match the resolution
    #[error("expected {expected} samples, got {actual}")]
    SampleCountMismatch {
        /// `nx * ny * nz`
        expected: usize,
        /// Length of the provided buffer
        actual: usize,
    },

    /// Strict lattice queried outside its index range
    #[error("index {index:?} outside lattice of resolution {resolution:?}")]
    OutOfRange {
        /// Requested index
        index: [i64; 3],
        /// Lattice resolution
        resolution: [usize; 3],
    },
}

/// What an integer lookup outside the lattice does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Snap to the nearest valid sample
    #[default]
    Clamp,
    /// Report [`GridError::OutOfRange`]
    Strict,
}

/// Immutable dense lattice of `f64` samples
#[derive(Debug, Clone)]
pub struct LatticeGrid {
    data: Vec<f64>,
    resolution: [usize; 3],
    bounds: FieldBox,
    policy: EdgePolicy,
}

impl LatticeGrid {
    /// Wrap a sample buffer
    pub fn from_samples(
        resolution: [usize; 3],
        bounds: FieldBox,
        data: Vec<f64>,
        policy: EdgePolicy,
    ) -> Result<Self, GridError> {
        if resolution.iter().any(|&n| n == 0) {
            return Err(GridError::ZeroResolution(resolution));
        }
        let expected = resolution[0] * resolution[1] * resolution[2];
        if data.len() != expected {
            return Err(GridError::SampleCountMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(LatticeGrid {
            data,
            resolution,
            bounds,
            policy,
        })
    }

    /// Lattice filled by evaluating `f(i, j, k)` at every index
    pub fn from_fn(
        resolution: [usize; 3],
        bounds: FieldBox,
        f: impl Fn(usize, usize, usize) -> f64,
    ) -> Result<Self, GridError> {
        let [nx, ny, nz] = resolution;
        let mut data = Vec::with_capacity(nx * ny * nz);
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    data.push(f(i, j, k));
                }
            }
        }
        Self::from_samples(resolution, bounds, data, EdgePolicy::Clamp)
    }

    /// Same samples with a different edge policy
    pub fn with_policy(mut self, policy: EdgePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Samples along each axis
    #[inline]
    pub fn resolution(&self) -> [usize; 3] {
        self.resolution
    }

    /// Native field-space box
    #[inline]
    pub fn bounds(&self) -> FieldBox {
        self.bounds
    }

    /// Edge policy for integer lookups
    #[inline]
    pub fn policy(&self) -> EdgePolicy {
        self.policy
    }

    /// Flat sample buffer
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Total number of samples
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    fn flat(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.resolution[0] * (j + self.resolution[1] * k)
    }

    /// Sample at an integer index, following the edge policy
    pub fn get(&self, i: i64, j: i64, k: i64) -> Result<f64, GridError> {
        let [nx, ny, nz] = self.resolution;
        let inside = |v: i64, n: usize| v >= 0 && (v as u64) < n as u64;
        if inside(i, nx) && inside(j, ny) && inside(k, nz) {
            return Ok(self.data[self.flat(i as usize, j as usize, k as usize)]);
        }
        match self.policy {
            EdgePolicy::Clamp => Ok(self.get_clamped(i, j, k)),
            EdgePolicy::Strict => Err(GridError::OutOfRange {
                index: [i, j, k],
                resolution: self.resolution,
            }),
        }
    }

    /// Sample at the nearest valid index
    #[inline]
    pub fn get_clamped(&self, i: i64, j: i64, k: i64) -> f64 {
        let c = |v: i64, n: usize| v.clamp(0, n as i64 - 1) as usize;
        let [nx, ny, nz] = self.resolution;
        self.data[self.flat(c(i, nx), c(j, ny), c(k, nz))]
    }

    /// Fractional lattice coordinates of a field-space point under `bounds`
    #[inline]
    pub fn field_to_index(&self, bounds: &FieldBox, point: DVec3) -> DVec3 {
        bounds.to_unit(point) * self.resolution_f()
    }

    /// Field-space position of fractional lattice coordinates under `bounds`
    #[inline]
    pub fn index_to_field(&self, bounds: &FieldBox, index: DVec3) -> DVec3 {
        bounds.from_unit(index / self.resolution_f())
    }

    /// Resolution as a vector
    #[inline]
    pub fn resolution_f(&self) -> DVec3 {
        DVec3::new(
            self.resolution[0] as f64,
            self.resolution[1] as f64,
            self.resolution[2] as f64,
        )
    }

    /// Smallest and largest finite sample, `None` if there are none
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Nearest-sample lookup in the lattice's native box (always clamped)
impl ScalarField for LatticeGrid {
    fn value_at(&self, point: DVec3) -> f64 {
        let f = self.field_to_index(&self.bounds, point).round();
        self.get_clamped(f.x as i64, f.y as i64, f.z as i64)
    }
}
