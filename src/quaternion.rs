//! Quaternion algebra for the iterated maps
//!
//! A quaternion `q = w + xi + yj + zk` stands in for a point of an extended
//! 3D dynamical system. Field-space points embed as `(p.x, p.y, p.z, 0)`:
//! the real part carries the x coordinate and the k component is zero, so
//! projecting back to 3D simply drops the last component.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Index, Mul, MulAssign, Neg, Sub};

/// A quaternion with `f64` components
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quaternion {
    /// Scalar (real) component
    pub w: f64,
    /// i component
    pub x: f64,
    /// j component
    pub y: f64,
    /// k component
    pub z: f64,
}

impl Quaternion {
    /// All components zero
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Canonical unit quaternion `(1, 0, 0, 0)`
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    /// Create a new quaternion
    #[inline]
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Embed a field-space point with a zero fourth component
    #[inline]
    pub fn from_point(p: DVec3) -> Self {
        Self::new(p.x, p.y, p.z, 0.0)
    }

    /// Project back to field space by dropping the fourth component
    #[inline]
    pub fn to_point(self) -> DVec3 {
        DVec3::new(self.w, self.x, self.y)
    }

    /// Build from `[w, x, y, z]`
    #[inline]
    pub fn from_array(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    /// Components as `[w, x, y, z]`
    #[inline]
    pub fn to_array(self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    /// Quaternion conjugate
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Squared magnitude (may overflow for very large components)
    #[inline]
    pub fn magnitude_squared(self) -> f64 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude, scaled by the largest component so that any finite
    /// quaternion has a finite magnitude.
    pub fn magnitude(self) -> f64 {
        let m = self
            .w
            .abs()
            .max(self.x.abs())
            .max(self.y.abs())
            .max(self.z.abs());
        if m == 0.0 || m.is_infinite() {
            return m;
        }
        m * (self / m).magnitude_squared().sqrt()
    }

    /// Divide by the magnitude.
    ///
    /// Zero or non-finite quaternions produce non-finite components; use
    /// [`Quaternion::try_normalize`] when that has to be detected.
    #[inline]
    pub fn normalized(self) -> Self {
        self / self.magnitude()
    }

    /// Normalize, returning `None` when the result is not finite
    #[inline]
    pub fn try_normalize(self) -> Option<Self> {
        let n = self.normalized();
        if n.has_non_finite() {
            None
        } else {
            Some(n)
        }
    }

    /// True when every component is finite
    #[inline]
    pub fn is_finite(self) -> bool {
        self.w.is_finite() && self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// True when any component is NaN or infinite
    #[inline]
    pub fn has_non_finite(self) -> bool {
        !self.is_finite()
    }

    /// Multiplicative inverse `conj(q) / |q|^2`.
    ///
    /// Not guarded: the inverse of a (near-)zero quaternion is non-finite.
    #[inline]
    pub fn inverse(self) -> Self {
        self.conjugate() / self.magnitude_squared()
    }

    /// Integer power by repeated squaring
    pub fn powi(self, mut n: u32) -> Self {
        let mut base = self;
        let mut acc = Self::IDENTITY;
        while n > 0 {
            if n & 1 == 1 {
                acc = acc * base;
            }
            base = base * base;
            n >>= 1;
        }
        acc
    }

    /// 4D Euclidean distance to another quaternion
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).magnitude()
    }
}

impl Add for Quaternion {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.w + rhs.w, self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Quaternion {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Quaternion {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.w - rhs.w, self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Quaternion {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.w, -self.x, -self.y, -self.z)
    }
}

/// Hamilton product (non-commutative)
impl Mul for Quaternion {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }
}

impl Mul<f64> for Quaternion {
    type Output = Self;

    #[inline]
    fn mul(self, s: f64) -> Self {
        Self::new(self.w * s, self.x * s, self.y * s, self.z * s)
    }
}

impl MulAssign<f64> for Quaternion {
    #[inline]
    fn mul_assign(&mut self, s: f64) {
        *self = *self * s;
    }
}

impl Div<f64> for Quaternion {
    type Output = Self;

    #[inline]
    fn div(self, s: f64) -> Self {
        Self::new(self.w / s, self.x / s, self.y / s, self.z / s)
    }
}

/// Right division `self * rhs^-1`
impl Div for Quaternion {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self * rhs.inverse()
    }
}

impl Index<usize> for Quaternion {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        match i {
            0 => &self.w,
            1 => &self.x,
            2 => &self.y,
            3 => &self.z,
            _ => panic!("quaternion component index {} out of range", i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Quaternion, b: Quaternion) -> bool {
        a.distance(b) < 1e-12
    }

    #[test]
    fn test_hamilton_units() {
        let i = Quaternion::new(0.0, 1.0, 0.0, 0.0);
        let j = Quaternion::new(0.0, 0.0, 1.0, 0.0);
        let k = Quaternion::new(0.0, 0.0, 0.0, 1.0);

        assert!(close(i * j, k));
        assert!(close(j * i, -k));
        assert!(close(i * i, -Quaternion::IDENTITY));
        assert!(close(i * j * k, -Quaternion::IDENTITY));
    }

    #[test]
    fn test_embedding_roundtrip() {
        let p = DVec3::new(0.1, -0.2, 0.3);
        let q = Quaternion::from_point(p);
        assert_eq!(q.z, 0.0);
        assert_eq!(q.to_point(), p);
    }

    #[test]
    fn test_magnitude_no_overflow() {
        let q = Quaternion::new(1e300, 1e300, 0.0, 0.0);
        let m = q.magnitude();
        assert!(m.is_finite());
        assert!((m / 1e300 - 2f64.sqrt()).abs() < 1e-12);
        assert!(q.try_normalize().is_some());
    }

    #[test]
    fn test_normalize_zero_is_non_finite() {
        assert!(Quaternion::ZERO.normalized().has_non_finite());
        assert!(Quaternion::ZERO.try_normalize().is_none());

        let nan = Quaternion::new(f64::NAN, 0.0, 0.0, 0.0);
        assert!(nan.try_normalize().is_none());
        let inf = Quaternion::new(f64::INFINITY, 1.0, 0.0, 0.0);
        assert!(inf.try_normalize().is_none());
    }

    #[test]
    fn test_division_inverse() {
        let a = Quaternion::new(1.0, 2.0, -0.5, 0.25);
        let b = Quaternion::new(-0.3, 0.7, 1.1, 2.0);
        assert!(close((a / b) * b, a));
        assert!((Quaternion::ZERO.inverse()).has_non_finite());
    }

    #[test]
    fn test_powi_matches_repeated_product() {
        let q = Quaternion::new(0.3, -0.4, 0.5, 0.1);
        assert!(close(q.powi(0), Quaternion::IDENTITY));
        assert!(close(q.powi(3), q * q * q));
        assert!(close(q.powi(4), (q * q) * (q * q)));
    }

    #[test]
    fn test_index() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q[0], 1.0);
        assert_eq!(q[3], 4.0);
        assert_eq!(Quaternion::from_array(q.to_array()), q);
    }
}
