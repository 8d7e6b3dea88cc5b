//! Root-factored quaternion polynomials and rational maps
//!
//! A polynomial is stored by its roots: `P(q) = scale * (q - r0)^p0 * (q - r1)^p1 * ...`,
//! multiplied left to right in root order (quaternion products do not
//! commute, so the order is part of the polynomial).

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::QuaternionMap;
use crate::quaternion::Quaternion;

fn default_power() -> u32 {
    1
}

fn default_scale() -> f64 {
    1.0
}

/// One factor `(q - position)^power`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Root {
    /// Root location
    pub position: Quaternion,
    /// Multiplicity
    #[serde(default = "default_power")]
    pub power: u32,
}

impl Root {
    /// Simple root
    pub fn new(position: Quaternion) -> Self {
        Root { position, power: 1 }
    }
}

/// Quaternion polynomial in root-factored form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoredPolynomial {
    /// Factors, applied left to right
    pub roots: Vec<Root>,
    /// Leading scale factor
    #[serde(default = "default_scale")]
    pub scale: f64,
}

impl FactoredPolynomial {
    /// Polynomial with simple roots and unit scale
    pub fn from_roots(roots: impl IntoIterator<Item = Quaternion>) -> Self {
        FactoredPolynomial {
            roots: roots.into_iter().map(Root::new).collect(),
            scale: 1.0,
        }
    }

    /// Random polynomial of the given degree.
    ///
    /// Roots are drawn uniformly from `[-spread, spread]` on the three
    /// components that carry field-space coordinates; the fourth stays zero
    /// so every root lies in the embedded 3D slice.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, degree: usize, spread: f64) -> Self {
        let spread = spread.abs().max(f64::MIN_POSITIVE);
        let roots = (0..degree).map(|_| {
            Quaternion::new(
                rng.gen_range(-spread..=spread),
                rng.gen_range(-spread..=spread),
                rng.gen_range(-spread..=spread),
                0.0,
            )
        });
        Self::from_roots(roots)
    }

    /// Sum of multiplicities
    pub fn degree(&self) -> u32 {
        self.roots.iter().map(|r| r.power).sum()
    }

    /// Evaluate `P(q)`
    pub fn evaluate(&self, q: Quaternion) -> Quaternion {
        let product = self
            .roots
            .iter()
            .fold(Quaternion::IDENTITY, |acc, r| acc * (q - r.position).powi(r.power));
        product * self.scale
    }
}

impl QuaternionMap for FactoredPolynomial {
    #[inline]
    fn apply(&self, q: Quaternion) -> Quaternion {
        self.evaluate(q)
    }
}

/// `P(q) * Q(q)^-1`, or just `P(q)` without a denominator.
///
/// Near a root of the denominator the quotient is huge or non-finite;
/// wrapping the map in a [`DistanceGuidedMap`](super::DistanceGuidedMap)
/// recovers from that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RationalMap {
    /// Numerator polynomial
    pub numerator: FactoredPolynomial,
    /// Optional denominator polynomial
    #[serde(default)]
    pub denominator: Option<FactoredPolynomial>,
}

impl RationalMap {
    /// Plain polynomial map
    pub fn polynomial(numerator: FactoredPolynomial) -> Self {
        RationalMap {
            numerator,
            denominator: None,
        }
    }

    /// Quotient of two polynomials
    pub fn rational(numerator: FactoredPolynomial, denominator: FactoredPolynomial) -> Self {
        RationalMap {
            numerator,
            denominator: Some(denominator),
        }
    }
}

impl QuaternionMap for RationalMap {
    fn apply(&self, q: Quaternion) -> Quaternion {
        let top = self.numerator.evaluate(q);
        match &self.denominator {
            Some(bottom) => top / bottom.evaluate(q),
            None => top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_vanishes_at_roots() {
        let r0 = Quaternion::new(0.5, 0.0, 0.1, 0.0);
        let r1 = Quaternion::new(-0.2, 0.3, 0.0, 0.0);
        let p = FactoredPolynomial::from_roots([r0, r1]);

        assert!(p.evaluate(r0).magnitude() < 1e-12);
        assert!(p.evaluate(r1).magnitude() < 1e-12);
        assert!(p.evaluate(Quaternion::IDENTITY).magnitude() > 0.1);
    }

    #[test]
    fn test_power_and_scale() {
        let p = FactoredPolynomial {
            roots: vec![Root {
                position: Quaternion::ZERO,
                power: 2,
            }],
            scale: 3.0,
        };
        let q = Quaternion::new(0.0, 2.0, 0.0, 0.0);
        // 3 * (2i)^2 = -12
        assert!(p.evaluate(q).distance(Quaternion::new(-12.0, 0.0, 0.0, 0.0)) < 1e-12);
        assert_eq!(p.degree(), 2);
    }

    #[test]
    fn test_random_is_seeded() {
        let a = FactoredPolynomial::random(&mut StdRng::seed_from_u64(7), 4, 0.5);
        let b = FactoredPolynomial::random(&mut StdRng::seed_from_u64(7), 4, 0.5);
        assert_eq!(a, b);
        assert_eq!(a.degree(), 4);
        for r in &a.roots {
            assert_eq!(r.position.z, 0.0);
            assert!(r.position.w.abs() <= 0.5);
        }
    }

    #[test]
    fn test_rational_pole_is_non_finite() {
        let num = FactoredPolynomial::from_roots([Quaternion::new(1.0, 0.0, 0.0, 0.0)]);
        let den = FactoredPolynomial::from_roots([Quaternion::ZERO]);
        let m = RationalMap::rational(num, den);

        assert!(m.apply(Quaternion::ZERO).has_non_finite());
        let q = Quaternion::new(2.0, 0.0, 0.0, 0.0);
        assert!(m.apply(q).distance(Quaternion::new(0.5, 0.0, 0.0, 0.0)) < 1e-12);
    }

    #[test]
    fn test_serde_defaults() {
        let json = r#"{"numerator":{"roots":[{"position":{"w":0.5,"x":0.0,"y":0.0,"z":0.0}}]}}"#;
        let m: RationalMap = serde_json::from_str(json).unwrap();
        assert_eq!(m.numerator.scale, 1.0);
        assert_eq!(m.numerator.roots[0].power, 1);
        assert!(m.denominator.is_none());
    }
}
