//! # shaped-julia
//!
//! Quaternion Julia sets whose fractal boundary follows an arbitrary signed
//! distance field instead of a fixed sphere.
//!
//! ## Features
//!
//! - **Fields**: dense lattices, trilinear views with re-centerable boxes, baking
//! - **Maps**: Julia `q^2 + c`, root-factored polynomials, rational maps
//! - **Shaping**: distance-guided maps with guaranteed finite output
//! - **Escape time**: continuous `ln |q|` field for surface extraction
//! - **Tiling**: octree digit strings address independent sub-volumes
//! - **Sampling**: LRU-cached virtual grids feeding marching cubes
//! - **File I/O**: `.f3d` lattices, OBJ meshes, JSON maps, CSV map dumps
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use glam::DVec3;
//! use shaped_julia::prelude::*;
//!
//! // Distance to a sphere of radius 0.3, baked to a lattice
//! let sphere = FnField(|p: DVec3| p.length() - 0.3);
//! let grid = Arc::new(bake_lattice(&sphere, FieldBox::cube(0.5), [16, 16, 16]).unwrap());
//!
//! let config = RunConfig {
//!     resolution: 12,
//!     ..Default::default()
//! };
//! let out = generate_mesh(grid, JuliaMap::new(Quaternion::ZERO), &config).unwrap();
//! assert!(out.mesh.triangle_count() > 0);
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod escape;
pub mod field;
pub mod io;
pub mod map;
pub mod mesh;
pub mod octree;
pub mod pipeline;
pub mod quaternion;
pub mod types;

pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::cache::{CacheConfig, CacheStats, CachedVirtualGrid, GridSampler};
    pub use crate::escape::{EscapeConfig, EscapeOutcome, EscapeTimeField};
    pub use crate::field::{
        bake_lattice, Component, EdgePolicy, FnField, GridError, InterpolatedField,
        Interpolation, LatticeGrid, MagnitudeField, RotationComponentField, ScalarField,
    };
    pub use crate::io::{
        export_obj, load_f3d, load_map, save_f3d, save_map, write_map_csv, IoError,
        MapSampling, ObjConfig,
    };
    pub use crate::map::{
        DistanceGuidedMap, FactoredPolynomial, FnMap, GuidedMapConfig, JuliaMap,
        QuaternionMap, RationalMap, Root,
    };
    pub use crate::mesh::{marching_cubes, Mesh, Vertex};
    pub use crate::octree::{select_by_digits, subdivide, Octant, OctreeError};
    pub use crate::pipeline::{compute_bounds, generate_mesh, GeneratedMesh, RunConfig};
    pub use crate::quaternion::Quaternion;
    pub use crate::types::FieldBox;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_basic_workflow() {
        // Escape field of a plain Julia map, sampled and meshed by hand.
        let field = EscapeTimeField::new(
            JuliaMap::new(Quaternion::ZERO),
            EscapeConfig {
                max_iterations: 8,
                escape_radius: 20.0,
            },
        );
        let bounds = select_by_digits(&FieldBox::cube(1.5), "").unwrap();
        let mut grid = CachedVirtualGrid::new(field, [10, 10, 10], bounds, CacheConfig::default());
        let mut mesh = marching_cubes(&mut grid, 0.0);
        mesh.to_field_space(&grid);

        // q -> q^2 keeps |q| < 1 bounded: the level set is the unit sphere.
        assert!(mesh.triangle_count() > 0);
        for v in &mesh.vertices {
            assert!((v.position.length() - 1.0).abs() < 0.3);
        }
        assert!(grid.stats().hits > 0);
    }

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
