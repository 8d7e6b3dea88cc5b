//! Diagnostic fields over a quaternion map
//!
//! Both fields embed the field-space point as `(x, y, z, 0)`, apply the map
//! once, and report one number about the output. Baking them to a lattice
//! shows how a map rotates and scales the embedded 3D slice.

use glam::DVec3;

use super::ScalarField;
use crate::map::QuaternionMap;
use crate::quaternion::Quaternion;

/// Quaternion component selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Real part
    W,
    /// First imaginary part
    X,
    /// Second imaginary part
    Y,
    /// Third imaginary part
    Z,
}

impl Component {
    /// All components in storage order
    pub const ALL: [Component; 4] = [Component::W, Component::X, Component::Y, Component::Z];

    /// Storage index (`w` = 0)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Component::W => 0,
            Component::X => 1,
            Component::Y => 2,
            Component::Z => 3,
        }
    }

    /// Lower-case name, used in output file names
    pub fn name(self) -> &'static str {
        match self {
            Component::W => "w",
            Component::X => "x",
            Component::Y => "y",
            Component::Z => "z",
        }
    }
}

/// One component of the normalized map output.
///
/// Where the output cannot be normalized (zero or non-finite) the value is 0.
#[derive(Debug, Clone)]
pub struct RotationComponentField<M> {
    map: M,
    component: Component,
}

impl<M: QuaternionMap> RotationComponentField<M> {
    /// Inspect `component` of `map`'s output direction
    pub fn new(map: M, component: Component) -> Self {
        RotationComponentField { map, component }
    }

    /// Selected component
    pub fn component(&self) -> Component {
        self.component
    }
}

impl<M: QuaternionMap> ScalarField for RotationComponentField<M> {
    fn value_at(&self, point: DVec3) -> f64 {
        self.map
            .apply(Quaternion::from_point(point))
            .try_normalize()
            .map_or(0.0, |q| q[self.component.index()])
    }
}

/// Magnitude of the map output
#[derive(Debug, Clone)]
pub struct MagnitudeField<M> {
    map: M,
}

impl<M: QuaternionMap> MagnitudeField<M> {
    /// Inspect the output magnitude of `map`
    pub fn new(map: M) -> Self {
        MagnitudeField { map }
    }
}

impl<M: QuaternionMap> ScalarField for MagnitudeField<M> {
    #[inline]
    fn value_at(&self, point: DVec3) -> f64 {
        self.map.apply(Quaternion::from_point(point)).magnitude()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{FnMap, JuliaMap};

    #[test]
    fn test_rotation_components_of_square() {
        // (i)^2 = -1, direction (-1, 0, 0, 0)
        let m = JuliaMap::new(Quaternion::ZERO);
        let p = DVec3::new(0.0, 2.0, 0.0);
        let w = RotationComponentField::new(m, Component::W);
        let x = RotationComponentField::new(m, Component::X);
        assert!((w.value_at(p) + 1.0).abs() < 1e-12);
        assert!(x.value_at(p).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_of_zero_output_is_zero() {
        let f = RotationComponentField::new(FnMap(|_: Quaternion| Quaternion::ZERO), Component::W);
        assert_eq!(f.value_at(DVec3::ONE), 0.0);
    }

    #[test]
    fn test_magnitude() {
        let f = MagnitudeField::new(JuliaMap::new(Quaternion::ZERO));
        assert!((f.value_at(DVec3::new(0.0, 3.0, 4.0)) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_component_names() {
        let names: Vec<&str> = Component::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["w", "x", "y", "z"]);
        assert_eq!(Component::Z.index(), 3);
    }
}
