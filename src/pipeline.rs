//! End-to-end mesh generation
//!
//! One run turns a distance-field lattice and a quaternion map into a
//! field-space triangle mesh:
//!
//! 1. validate the octree digit string (before any sampling)
//! 2. view the lattice through a box of half-extent `field_half_extent`
//!    centred on `offset`
//! 3. take the run bounds as that box grown by `bounds_margin` on the max
//!    corner, then narrow them to the octree tile and pad by one cell
//! 4. wrap the map in a [`DistanceGuidedMap`] and iterate it in an
//!    [`EscapeTimeField`]
//! 5. sample that field through a [`CachedVirtualGrid`] and run
//!    [`marching_cubes`]
//! 6. move the mesh from grid index space into field space

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use crate::cache::{CacheConfig, CacheStats, CachedVirtualGrid, GridSampler};
use crate::error::{Error, Result};
use crate::escape::{EscapeConfig, EscapeTimeField};
use crate::field::{InterpolatedField, Interpolation, LatticeGrid};
use crate::io::IoError;
use crate::map::{DistanceGuidedMap, GuidedMapConfig, QuaternionMap};
use crate::mesh::{marching_cubes, Mesh};
use crate::octree;
use crate::types::FieldBox;

/// Parameters of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Cells along each axis of the sampling grid
    pub resolution: usize,
    /// Distance-guided map shaping
    pub guided: GuidedMapConfig,
    /// Escape-time limits
    pub escape: EscapeConfig,
    /// Half edge length of the box the distance field is mapped to
    pub field_half_extent: f64,
    /// Center of that box; moving it "dissolves" the shape
    pub offset: DVec3,
    /// Added to the max corner of the field box to get the run bounds
    pub bounds_margin: f64,
    /// Octree tile to compute, `None` for the whole volume
    pub octree: Option<String>,
    /// Level set to extract
    pub iso_level: f64,
    /// Distance field reconstruction
    pub interpolation: Interpolation,
    /// Sample cache sizing
    pub cache: CacheConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            resolution: 64,
            guided: GuidedMapConfig::default(),
            escape: EscapeConfig {
                max_iterations: 10,
                escape_radius: 20.0,
            },
            field_half_extent: 0.5,
            offset: DVec3::ZERO,
            bounds_margin: 0.25,
            octree: None,
            iso_level: 0.0,
            interpolation: Interpolation::Linear,
            cache: CacheConfig::default(),
        }
    }
}

impl RunConfig {
    /// Load from a JSON file; missing keys take their defaults
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, IoError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::result::Result<(), IoError> {
        let mut w = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut w, self)?;
        w.flush()?;
        Ok(())
    }

    /// Reject parameters that cannot produce a mesh
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(Error::InvalidConfig("resolution must be at least 1".into()));
        }
        if !(self.field_half_extent.is_finite() && self.field_half_extent > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "field half-extent must be positive, got {}",
                self.field_half_extent
            )));
        }
        if !self.bounds_margin.is_finite() || !self.offset.is_finite() {
            return Err(Error::InvalidConfig("bounds must be finite".into()));
        }
        if let Some(digits) = &self.octree {
            octree::parse_digits(digits)?;
        }
        Ok(())
    }

    /// Box the distance field is mapped to
    pub fn field_box(&self) -> FieldBox {
        FieldBox::from_center_extents(self.offset, DVec3::splat(self.field_half_extent))
    }
}

/// Output of [`generate_mesh`]
#[derive(Debug, Clone)]
pub struct GeneratedMesh {
    /// Field-space mesh
    pub mesh: Mesh,
    /// Box that was sampled
    pub bounds: FieldBox,
    /// Sample cache counters
    pub cache_stats: CacheStats,
}

/// Sampling bounds of a run, octree tile included
pub fn compute_bounds(config: &RunConfig) -> Result<FieldBox> {
    let path = octree::parse_digits(config.octree.as_deref().unwrap_or(""))?;

    let field_box = config.field_box();
    let mut bounds = FieldBox::new(
        field_box.min,
        field_box.max + DVec3::splat(config.bounds_margin),
    );

    if !path.is_empty() {
        bounds = octree::select_path(&bounds, &path);
        // One extra cell per side so neighbouring tiles overlap.
        bounds = octree::pad_by_cells(&bounds, [config.resolution; 3]);
    }
    Ok(bounds)
}

/// Distance field view used by a run
pub fn distance_field(grid: Arc<LatticeGrid>, config: &RunConfig) -> InterpolatedField {
    let mut field = InterpolatedField::new(grid, config.interpolation);
    field.set_map_box(config.field_box());
    field
}

/// Run the whole pipeline for `map` shaped by `grid`
pub fn generate_mesh<M: QuaternionMap>(
    grid: Arc<LatticeGrid>,
    map: M,
    config: &RunConfig,
) -> Result<GeneratedMesh> {
    config.validate()?;
    let bounds = compute_bounds(config)?;
    tracing::info!(
        resolution = config.resolution,
        c = config.guided.c,
        b = config.guided.b,
        offset = ?config.offset,
        octree = config.octree.as_deref().unwrap_or(""),
        "computing shaped julia set"
    );
    tracing::debug!(min = ?bounds.min, max = ?bounds.max, "sampling bounds");

    let distance = distance_field(grid, config);
    let guided = DistanceGuidedMap::new(map, distance, config.guided);
    let escape = EscapeTimeField::new(guided, config.escape);

    let mut sampler = CachedVirtualGrid::new(
        escape,
        [config.resolution; 3],
        bounds,
        config.cache,
    );
    let mut mesh = marching_cubes(&mut sampler, config.iso_level);
    mesh.to_field_space(&sampler);

    let cache_stats = sampler.stats();
    tracing::debug!(
        hits = cache_stats.hits,
        misses = cache_stats.misses,
        evictions = cache_stats.evictions,
        "sample cache"
    );
    tracing::info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "mesh extracted"
    );

    Ok(GeneratedMesh {
        mesh,
        bounds: sampler.bounds(),
        cache_stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::JuliaMap;
    use crate::quaternion::Quaternion;

    fn flat_grid() -> Arc<LatticeGrid> {
        Arc::new(LatticeGrid::from_fn([2, 2, 2], FieldBox::default(), |_, _, _| 0.0).unwrap())
    }

    #[test]
    fn test_default_bounds() {
        let b = compute_bounds(&RunConfig::default()).unwrap();
        assert_eq!(b.min, DVec3::splat(-0.5));
        assert_eq!(b.max, DVec3::splat(0.75));
    }

    #[test]
    fn test_offset_moves_bounds() {
        let config = RunConfig {
            offset: DVec3::new(1.0, 0.0, -1.0),
            ..Default::default()
        };
        let b = compute_bounds(&config).unwrap();
        assert_eq!(b.min, DVec3::new(0.5, -0.5, -1.5));
    }

    #[test]
    fn test_octree_tile_is_padded() {
        let config = RunConfig {
            resolution: 10,
            octree: Some("3".into()),
            ..Default::default()
        };
        let b = compute_bounds(&config).unwrap();
        // Octant 3 is the low x, low y, low z child of [-0.5, 0.75]^3.
        let tile = 0.625;
        let pad = tile / 10.0;
        assert!((b.min - DVec3::splat(-0.5 - pad)).length() < 1e-12);
        assert!((b.max - DVec3::splat(-0.5 + tile + pad)).length() < 1e-12);
    }

    #[test]
    fn test_invalid_digit_fails_before_sampling() {
        let config = RunConfig {
            octree: Some("12x".into()),
            ..Default::default()
        };
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let map = crate::map::FnMap(|q: Quaternion| {
            calls.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            q
        });
        let err = generate_mesh(flat_grid(), map, &config).unwrap_err();
        assert!(matches!(err, Error::Octree(_)));
        assert_eq!(calls.load(std::sync::atomic::Ordering::Relaxed), 0);
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let config = RunConfig {
            resolution: 0,
            ..Default::default()
        };
        let err = generate_mesh(flat_grid(), JuliaMap::new(Quaternion::ZERO), &config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_config_json_defaults() {
        let config: RunConfig = serde_json::from_str(r#"{"resolution": 32, "octree": "07"}"#).unwrap();
        assert_eq!(config.resolution, 32);
        assert_eq!(config.octree.as_deref(), Some("07"));
        assert_eq!(config.escape.max_iterations, 10);
        assert_eq!(config.guided.c, 300.0);
        assert_eq!(config.interpolation, Interpolation::Linear);
    }
}
