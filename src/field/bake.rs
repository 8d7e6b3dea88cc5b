//! Sample a scalar field into a lattice
//!
//! Fills a [`LatticeGrid`] with one field evaluation per sample, split into
//! z-slabs across the rayon pool. Sample `(i, j, k)` is taken at the same
//! position the lattice maps that index to, so nearest-sample lookups on
//! the result reproduce the field at sample points.

use glam::DVec3;
use rayon::prelude::*;

use super::{GridError, LatticeGrid, ScalarField};
use crate::types::FieldBox;

/// Evaluate `field` at every sample of a `resolution` lattice over `bounds`
pub fn bake_lattice<F: ScalarField + ?Sized>(
    field: &F,
    bounds: FieldBox,
    resolution: [usize; 3],
) -> Result<LatticeGrid, GridError> {
    let [nx, ny, nz] = resolution;
    if nx == 0 || ny == 0 || nz == 0 {
        return Err(GridError::ZeroResolution(resolution));
    }

    let step = bounds.span() / DVec3::new(nx as f64, ny as f64, nz as f64);
    let slice_size = nx * ny;
    let mut data = vec![0.0; slice_size * nz];

    data.par_chunks_mut(slice_size)
        .enumerate()
        .for_each(|(k, slice)| {
            let z = bounds.min.z + k as f64 * step.z;
            for j in 0..ny {
                let y = bounds.min.y + j as f64 * step.y;
                let row = &mut slice[j * nx..(j + 1) * nx];
                for (i, out) in row.iter_mut().enumerate() {
                    let x = bounds.min.x + i as f64 * step.x;
                    *out = field.value_at(DVec3::new(x, y, z));
                }
            }
        });

    tracing::debug!(?resolution, "baked lattice");
    LatticeGrid::from_samples(resolution, bounds, data, Default::default())
}
