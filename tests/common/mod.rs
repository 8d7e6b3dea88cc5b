//! Common test helpers for shaped-julia integration tests

#![allow(dead_code)]

use glam::DVec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shaped_julia::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

// ============================================================================
// Standard distance fields
// ============================================================================

/// Radius of the standard sphere
pub const SPHERE_RADIUS: f64 = 0.3;

/// Signed distance to a sphere of [`SPHERE_RADIUS`] at the origin
pub fn sphere_field() -> FnField<impl Fn(DVec3) -> f64 + Send + Sync + Copy> {
    FnField(|p: DVec3| p.length() - SPHERE_RADIUS)
}

/// Sphere distance baked over `[-0.5, 0.5]^3` at `samples` per axis
pub fn sphere_lattice(samples: usize) -> Arc<LatticeGrid> {
    let grid = bake_lattice(&sphere_field(), FieldBox::cube(0.5), [samples; 3])
        .expect("bake sphere lattice");
    Arc::new(grid)
}

/// Polynomial with a fixed seed
pub fn seeded_polynomial(seed: u64, degree: usize) -> RationalMap {
    let mut rng = StdRng::seed_from_u64(seed);
    RationalMap::polynomial(FactoredPolynomial::random(&mut rng, degree, 0.5))
}

// ============================================================================
// Standard test points
// ============================================================================

/// Probe quaternions: zero, axes, mixed, large, tiny
pub fn test_quaternions() -> Vec<Quaternion> {
    vec![
        Quaternion::ZERO,
        Quaternion::IDENTITY,
        Quaternion::new(0.0, 1.0, 0.0, 0.0),
        Quaternion::new(0.0, 0.0, 0.0, 1.0),
        Quaternion::new(0.1, -0.2, 0.3, -0.4),
        Quaternion::new(-0.25, 0.25, 0.1, 0.0),
        Quaternion::new(1e6, -1e6, 1e6, 0.0),
        Quaternion::new(1e-300, 0.0, 1e-300, 0.0),
    ]
}

// ============================================================================
// Files and assertions
// ============================================================================

/// Per-process temp file path
pub fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("shaped_julia_integration");
    std::fs::create_dir_all(&dir).ok();
    dir.join(format!("{}_{}", std::process::id(), name))
}

/// Assert two f64 values are close within tolerance
pub fn assert_close(a: f64, b: f64, tol: f64, msg: &str) {
    assert!(
        (a - b).abs() < tol,
        "{}: {} vs {} (diff={}, tol={})",
        msg,
        a,
        b,
        (a - b).abs(),
        tol
    );
}

/// Mean vertex position
pub fn centroid(mesh: &Mesh) -> DVec3 {
    let sum: DVec3 = mesh.vertices.iter().map(|v| v.position).sum();
    sum / mesh.vertex_count().max(1) as f64
}
