//! Grid sampling with memoized field evaluation
//!
//! Surface extraction visits the 8 corners of every cell, and neighbouring
//! cells share corners, so a dense sweep would evaluate each lattice point
//! up to eight times. [`CachedVirtualGrid`] puts a bounded LRU cache keyed by
//! flat grid index in front of an arbitrary [`ScalarField`](crate::field::ScalarField).
//!
//! # Index space
//!
//! A sampler of resolution `[nx, ny, nz]` has `nx * ny * nz` cells and
//! `(nx + 1) * (ny + 1) * (nz + 1)` sample points. Sample `(0, 0, 0)` sits on
//! the box's min corner and `(nx, ny, nz)` on its max corner.
//!
//! # Concurrency
//!
//! The cache belongs to one sampler and is mutated through `&mut self`; it is
//! never shared across threads. Tiled runs get their parallelism from
//! independent samplers over disjoint octree boxes.

pub mod virtual_grid;
pub use virtual_grid::CachedVirtualGrid;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::types::FieldBox;

/// Integer-indexed view of a scalar field, as consumed by mesh extraction
pub trait GridSampler {
    /// Number of cells along each axis
    fn resolution(&self) -> [usize; 3];

    /// Field-space box covered by the grid
    fn bounds(&self) -> FieldBox;

    /// Field value at sample `(i, j, k)`
    fn value_at(&mut self, i: usize, j: usize, k: usize) -> f64;

    /// Field-space position of sample `(i, j, k)`
    fn index_to_field(&self, i: usize, j: usize, k: usize) -> DVec3 {
        self.grid_to_field(DVec3::new(i as f64, j as f64, k as f64))
    }

    /// Field-space position of fractional grid coordinates
    fn grid_to_field(&self, grid: DVec3) -> DVec3 {
        let [nx, ny, nz] = self.resolution();
        let cells = DVec3::new(nx as f64, ny as f64, nz as f64);
        self.bounds().from_unit(grid / cells)
    }
}

impl<S: GridSampler + ?Sized> GridSampler for &mut S {
    fn resolution(&self) -> [usize; 3] {
        (**self).resolution()
    }

    fn bounds(&self) -> FieldBox {
        (**self).bounds()
    }

    fn value_at(&mut self, i: usize, j: usize, k: usize) -> f64 {
        (**self).value_at(i, j, k)
    }

    fn index_to_field(&self, i: usize, j: usize, k: usize) -> DVec3 {
        (**self).index_to_field(i, j, k)
    }

    fn grid_to_field(&self, grid: DVec3) -> DVec3 {
        (**self).grid_to_field(grid)
    }
}

/// Cache sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum cached samples.
    ///
    /// `None` sizes the cache to two z-slices plus one row of samples, which
    /// is enough for a z-major sweep to evaluate every index exactly once.
    /// `Some(0)` disables caching.
    pub capacity: Option<usize>,
}

impl CacheConfig {
    /// Fixed capacity
    pub fn with_capacity(capacity: usize) -> Self {
        CacheConfig {
            capacity: Some(capacity),
        }
    }

    /// Capacity to use for a grid of `resolution` cells
    pub fn resolve(&self, resolution: [usize; 3]) -> usize {
        self.capacity.unwrap_or_else(|| {
            let row = resolution[0] + 1;
            let slice = row * (resolution[1] + 1);
            2 * slice + row + 2
        })
    }
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that evaluated the field
    pub misses: u64,
    /// Entries dropped to make room
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
