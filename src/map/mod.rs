//! Quaternion-to-quaternion maps
//!
//! A [`QuaternionMap`] is the step function of an escape-time iteration.
//! Maps are stateless apart from their construction parameters and compose
//! by ownership: a wrapper such as [`DistanceGuidedMap`] owns (or shares
//! through `Arc`) the map it wraps.

pub mod guided;
pub mod polynomial;

pub use guided::{DistanceGuidedMap, GuidedMapConfig};
pub use polynomial::{FactoredPolynomial, RationalMap, Root};

use crate::quaternion::Quaternion;
use std::sync::Arc;

/// A pure function `Quaternion -> Quaternion`
pub trait QuaternionMap: Send + Sync {
    /// Apply the map to `q`
    fn apply(&self, q: Quaternion) -> Quaternion;
}

impl<T: QuaternionMap + ?Sized> QuaternionMap for &T {
    #[inline]
    fn apply(&self, q: Quaternion) -> Quaternion {
        (**self).apply(q)
    }
}

impl<T: QuaternionMap + ?Sized> QuaternionMap for Box<T> {
    #[inline]
    fn apply(&self, q: Quaternion) -> Quaternion {
        (**self).apply(q)
    }
}

impl<T: QuaternionMap + ?Sized> QuaternionMap for Arc<T> {
    #[inline]
    fn apply(&self, q: Quaternion) -> Quaternion {
        (**self).apply(q)
    }
}

/// Adapter turning a closure into a [`QuaternionMap`]
#[derive(Clone, Copy)]
pub struct FnMap<F>(pub F);

impl<F> QuaternionMap for FnMap<F>
where
    F: Fn(Quaternion) -> Quaternion + Send + Sync,
{
    #[inline]
    fn apply(&self, q: Quaternion) -> Quaternion {
        (self.0)(q)
    }
}

/// Classic quaternion Julia step `q^2 + c`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JuliaMap {
    /// Additive constant
    pub c: Quaternion,
}

impl JuliaMap {
    /// Create a Julia map with constant `c`
    pub fn new(c: Quaternion) -> Self {
        JuliaMap { c }
    }
}

impl QuaternionMap for JuliaMap {
    #[inline]
    fn apply(&self, q: Quaternion) -> Quaternion {
        q * q + self.c
    }
}
