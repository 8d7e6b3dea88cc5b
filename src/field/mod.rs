//! Scalar fields over field space
//!
//! A [`ScalarField`] maps a field-space point to a real value. Fields are
//! pure functions of their input and construction parameters, so they are
//! required to be `Send + Sync` and may be evaluated in any order.
//!
//! # Implementations
//!
//! - [`LatticeGrid`]: dense samples on an integer lattice (nearest sample)
//! - [`InterpolatedField`]: trilinear view over a lattice with its own box
//! - [`EscapeTimeField`](crate::escape::EscapeTimeField): escape-time fractal
//! - [`RotationComponentField`] / [`MagnitudeField`]: map inspection
//! - [`FnField`]: any closure

pub mod bake;
pub mod inspect;
pub mod interpolated;
pub mod lattice;

pub use bake::bake_lattice;
pub use inspect::{Component, MagnitudeField, RotationComponentField};
pub use interpolated::{InterpolatedField, Interpolation};
pub use lattice::{EdgePolicy, GridError, LatticeGrid};

use glam::DVec3;
use std::sync::Arc;

/// A real-valued function of a field-space point
pub trait ScalarField: Send + Sync {
    /// Evaluate the field at `point`
    fn value_at(&self, point: DVec3) -> f64;
}

impl<T: ScalarField + ?Sized> ScalarField for &T {
    #[inline]
    fn value_at(&self, point: DVec3) -> f64 {
        (**self).value_at(point)
    }
}

impl<T: ScalarField + ?Sized> ScalarField for Box<T> {
    #[inline]
    fn value_at(&self, point: DVec3) -> f64 {
        (**self).value_at(point)
    }
}

impl<T: ScalarField + ?Sized> ScalarField for Arc<T> {
    #[inline]
    fn value_at(&self, point: DVec3) -> f64 {
        (**self).value_at(point)
    }
}

/// Adapter turning a closure into a [`ScalarField`]
#[derive(Clone, Copy)]
pub struct FnField<F>(pub F);

impl<F> ScalarField for FnField<F>
where
    F: Fn(DVec3) -> f64 + Send + Sync,
{
    #[inline]
    fn value_at(&self, point: DVec3) -> f64 {
        (self.0)(point)
    }
}
