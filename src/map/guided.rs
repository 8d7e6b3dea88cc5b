//! Distance-guided quaternion map
//!
//! Wraps an arbitrary quaternion map so that its escape shell follows an
//! iso-surface of a distance field instead of a fixed sphere. The direction
//! of each output comes from the inner map; the magnitude is blended in
//! log-space toward a target radius `exp(c * (d - b))`, where `d` is the
//! distance field sampled at the 3D projection of the input.
//!
//! # Degenerate inputs
//!
//! The map never returns a non-finite quaternion:
//!
//! 1. A non-finite inner output is replaced by the input itself.
//! 2. If that cannot be normalized, the input's direction is used.
//! 3. If the input cannot be normalized either, the direction is `(1, 0, 0, 0)`.
//!
//! The blended log-radius is capped at [`MAX_LOG_RADIUS`] and a NaN blend
//! (e.g. `-inf` and `+inf` logs mixed at `0 < fit_scale < 1`) collapses to a
//! unit radius. Geometry in degenerate regions changes silently as a result.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::QuaternionMap;
use crate::field::ScalarField;
use crate::quaternion::Quaternion;

/// Largest log-radius the map will scale to.
///
/// Just below `ln(f64::MAX) ~ 709.78`: `exp(709) ~ 8.2e307`, so a unit
/// direction times the radius stays finite.
pub const MAX_LOG_RADIUS: f64 = 709.0;

/// Shaping parameters for [`DistanceGuidedMap`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuidedMapConfig {
    /// Radius growth rate: how sharply the target radius reacts to distance
    pub c: f64,
    /// Radius offset: distance value at which the target radius is 1
    pub b: f64,
    /// Blend between the inner map's magnitude (0) and the target radius (1)
    pub fit_scale: f64,
}

impl Default for GuidedMapConfig {
    fn default() -> Self {
        GuidedMapConfig {
            c: 300.0,
            b: 0.0,
            fit_scale: 1.0,
        }
    }
}

/// Inner map with its output magnitude steered by a distance field
#[derive(Debug, Clone)]
pub struct DistanceGuidedMap<M, F> {
    inner: M,
    distance: F,
    config: GuidedMapConfig,
}

impl<M: QuaternionMap, F: ScalarField> DistanceGuidedMap<M, F> {
    /// Wrap `inner`, reading `distance` as the guiding distance field
    pub fn new(inner: M, distance: F, config: GuidedMapConfig) -> Self {
        DistanceGuidedMap {
            inner,
            distance,
            config,
        }
    }

    /// Wrapped map
    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// Guiding distance field
    pub fn distance_field(&self) -> &F {
        &self.distance
    }

    /// Shaping parameters
    pub fn config(&self) -> &GuidedMapConfig {
        &self.config
    }

    /// `c * (d - b)` with `d` sampled at `point`
    #[inline]
    pub fn log_target_radius(&self, point: DVec3) -> f64 {
        self.config.c * (self.distance.value_at(point) - self.config.b)
    }

    /// `exp(c * (d - b))` with `d` sampled at `point`
    #[inline]
    pub fn target_radius(&self, point: DVec3) -> f64 {
        self.log_target_radius(point).exp()
    }

    /// Log-space blend of an inner-map magnitude with a target log-radius.
    ///
    /// At `fit_scale == 0` this is exactly `magnitude`, at `fit_scale == 1`
    /// exactly `exp(log_target)`, both subject to the [`MAX_LOG_RADIUS`] cap.
    pub fn blended_radius(&self, magnitude: f64, log_target: f64) -> f64 {
        let fit = self.config.fit_scale;
        let log_magnitude = magnitude.ln();

        // Zero weights are skipped so that 0 * inf never turns into NaN.
        let log_radius = if fit == 0.0 {
            log_magnitude
        } else if fit == 1.0 {
            log_target
        } else {
            (1.0 - fit) * log_magnitude + fit * log_target
        };

        if log_radius.is_nan() {
            1.0
        } else {
            log_radius.min(MAX_LOG_RADIUS).exp()
        }
    }
}

impl<M: QuaternionMap, F: ScalarField> QuaternionMap for DistanceGuidedMap<M, F> {
    fn apply(&self, q: Quaternion) -> Quaternion {
        let log_target = self.log_target_radius(q.to_point());

        let original = q;
        let mut mapped = self.inner.apply(q);
        if mapped.has_non_finite() {
            mapped = original;
        }

        let radius = self.blended_radius(mapped.magnitude(), log_target);

        match mapped.try_normalize() {
            Some(direction) => direction * radius,
            None => match original.try_normalize() {
                Some(direction) => direction * radius,
                None => {
                    tracing::trace!(?original, "no usable direction, using canonical axis");
                    Quaternion::IDENTITY * radius
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FnField;
    use crate::map::FnMap;

    fn constant_field(d: f64) -> FnField<impl Fn(DVec3) -> f64 + Send + Sync> {
        FnField(move |_: DVec3| d)
    }

    fn config(c: f64, b: f64, fit_scale: f64) -> GuidedMapConfig {
        GuidedMapConfig { c, b, fit_scale }
    }

    #[test]
    fn test_zero_inner_map_stays_finite() {
        let m = DistanceGuidedMap::new(
            FnMap(|_: Quaternion| Quaternion::ZERO),
            constant_field(0.01),
            config(3.0, 0.0, 1.0),
        );
        let out = m.apply(Quaternion::new(0.3, 0.2, -0.1, 0.0));
        assert!(out.is_finite());
        // Falls back to the input's direction.
        let dir = Quaternion::new(0.3, 0.2, -0.1, 0.0).normalized();
        assert!(out.normalized().distance(dir) < 1e-12);
        assert!((out.magnitude() - (0.03f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_canonical_direction_when_everything_degenerates() {
        let m = DistanceGuidedMap::new(
            FnMap(|_: Quaternion| Quaternion::new(f64::NAN, 0.0, 0.0, 0.0)),
            constant_field(0.5),
            config(2.0, 0.0, 1.0),
        );
        let out = m.apply(Quaternion::ZERO);
        assert!(out.distance(Quaternion::new(1.0f64.exp(), 0.0, 0.0, 0.0)) < 1e-12);
    }

    #[test]
    fn test_non_finite_inner_reverts_to_input() {
        let m = DistanceGuidedMap::new(
            FnMap(|_: Quaternion| Quaternion::new(f64::INFINITY, 1.0, 0.0, 0.0)),
            constant_field(0.0),
            config(1.0, 0.0, 0.0),
        );
        let q = Quaternion::new(0.0, 3.0, 4.0, 0.0);
        let out = m.apply(q);
        // fit_scale 0 keeps the (reverted) magnitude: the input itself.
        assert!(out.distance(q) < 1e-12);
    }

    #[test]
    fn test_fit_scale_zero_keeps_inner_magnitude() {
        let m = DistanceGuidedMap::new(
            FnMap(|q: Quaternion| q * q * 7.0),
            constant_field(123.0),
            config(300.0, 0.0, 0.0),
        );
        let q = Quaternion::new(0.4, -0.2, 0.1, 0.0);
        let expected = (q * q * 7.0).magnitude();
        let out = m.apply(q);
        assert!((out.magnitude() - expected).abs() < 1e-12 * expected.max(1.0));
    }

    #[test]
    fn test_fit_scale_one_imposes_target() {
        let (c, b, d) = (5.0, 0.1, 0.3);
        let m = DistanceGuidedMap::new(
            FnMap(|q: Quaternion| q * 1e6),
            constant_field(d),
            config(c, b, 1.0),
        );
        let out = m.apply(Quaternion::new(0.1, 0.2, 0.3, 0.0));
        let target = (c * (d - b)).exp();
        assert!((out.magnitude() - target).abs() < 1e-12 * target);
        assert_eq!(m.target_radius(DVec3::ZERO), target);
    }

    #[test]
    fn test_half_blend_is_geometric_mean() {
        let m = DistanceGuidedMap::new(
            FnMap(|_: Quaternion| Quaternion::new(4.0, 0.0, 0.0, 0.0)),
            constant_field(0.0),
            config(1.0, -(16.0f64).ln(), 0.5),
        );
        let out = m.apply(Quaternion::IDENTITY);
        assert!((out.magnitude() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_large_finite_target_is_exact() {
        let m = DistanceGuidedMap::new(
            FnMap(|q: Quaternion| q),
            constant_field(705.0),
            config(1.0, 0.0, 1.0),
        );
        let out = m.apply(Quaternion::new(0.5, 0.5, 0.5, 0.0));
        assert!(out.is_finite());
        assert!((out.magnitude().ln() - 705.0).abs() < 1e-9);
    }

    #[test]
    fn test_huge_target_is_capped() {
        let m = DistanceGuidedMap::new(
            FnMap(|q: Quaternion| q),
            constant_field(10.0),
            GuidedMapConfig::default(),
        );
        let out = m.apply(Quaternion::new(0.5, 0.5, 0.5, 0.0));
        assert!(out.is_finite());
        assert!((out.magnitude().ln() - MAX_LOG_RADIUS).abs() < 1e-9);

        // Just past the overflow point of exp.
        let m = DistanceGuidedMap::new(
            FnMap(|q: Quaternion| q),
            constant_field(709.9),
            config(1.0, 0.0, 1.0),
        );
        let out = m.apply(Quaternion::new(0.0, 0.0, 0.0, 1.0));
        assert!(out.is_finite());
        assert!((out.magnitude().ln() - MAX_LOG_RADIUS).abs() < 1e-9);
    }

    #[test]
    fn test_mixed_infinite_logs_collapse_to_unit_radius() {
        // Zero magnitude (-inf log) blended with an infinite target (+inf log).
        let m = DistanceGuidedMap::new(
            FnMap(|_: Quaternion| Quaternion::ZERO),
            constant_field(f64::INFINITY),
            config(1.0, 0.0, 0.5),
        );
        let out = m.apply(Quaternion::new(0.0, 2.0, 0.0, 0.0));
        assert!(out.distance(Quaternion::new(0.0, 1.0, 0.0, 0.0)) < 1e-12);
    }
}
