//! Octree domain partitioning
//!
//! A digit string over `0..=7` addresses a sub-box of a bounding volume:
//! each digit picks one of the eight equal octants of the current box.
//! Independent runs given disjoint digit strings cover disjoint regions.
//!
//! # Octant numbering
//!
//! X points right, Y up, Z into the page. Octants 0-3 form the near face
//! (low Z) and run clockwise as seen looking down the Z axis, starting at
//! the top-left; octants 4-7 repeat the pattern on the far face (high Z).
//!
//! ```text
//!        +---+       +---+
//!  near  |0|1|  far  |4|5|
//!        +-+-+       +-+-+
//!        |3|2|       |7|6|
//!        +---+       +---+
//! ```
//!
//! `"5555"` is therefore the 1/16-edge box in the far top-right corner.

use glam::DVec3;
use thiserror::Error;

use crate::types::FieldBox;

/// Digit string parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OctreeError {
    /// A character outside `'0'..='7'`
    #[error("invalid octree digit '{digit}' at position {position}: valid digits are 0-7")]
    InvalidDigit {
        /// Offending character
        digit: char,
        /// Character index in the string
        position: usize,
    },
}

/// One of the eight children of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Octant(u8);

impl Octant {
    /// All octants in numbering order
    pub const ALL: [Octant; 8] = [
        Octant(0),
        Octant(1),
        Octant(2),
        Octant(3),
        Octant(4),
        Octant(5),
        Octant(6),
        Octant(7),
    ];

    /// Octant from its number, `None` above 7
    pub fn new(index: u8) -> Option<Self> {
        (index < 8).then_some(Octant(index))
    }

    /// Octant number
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// Whether the octant takes the upper half on each axis
    pub fn upper_halves(self) -> [bool; 3] {
        let face = self.0 & 3;
        let right = face == 1 || face == 2;
        let top = face == 0 || face == 1;
        let far = self.0 >= 4;
        [right, top, far]
    }

    /// The child box of `parent` this octant names
    pub fn child_of(self, parent: &FieldBox) -> FieldBox {
        let half = parent.half_extents();
        let [right, top, far] = self.upper_halves();
        let offset = DVec3::new(
            if right { half.x } else { 0.0 },
            if top { half.y } else { 0.0 },
            if far { half.z } else { 0.0 },
        );
        let min = parent.min + offset;
        // Upper children reuse the parent's max corner exactly.
        let max = DVec3::new(
            if right { parent.max.x } else { min.x + half.x },
            if top { parent.max.y } else { min.y + half.y },
            if far { parent.max.z } else { min.z + half.z },
        );
        FieldBox::new(min, max)
    }
}

impl TryFrom<char> for Octant {
    type Error = char;

    fn try_from(c: char) -> Result<Self, char> {
        c.to_digit(8)
            .and_then(|d| Octant::new(d as u8))
            .ok_or(c)
    }
}

/// The eight children of `parent`, indexed by octant number
pub fn subdivide(parent: &FieldBox) -> [FieldBox; 8] {
    Octant::ALL.map(|o| o.child_of(parent))
}

/// Validate a digit string. Fails on the first character outside `'0'..='7'`.
pub fn parse_digits(digits: &str) -> Result<Vec<Octant>, OctreeError> {
    digits
        .chars()
        .enumerate()
        .map(|(position, c)| {
            Octant::try_from(c).map_err(|digit| OctreeError::InvalidDigit { digit, position })
        })
        .collect()
}

/// Narrow `bounds` by one octant per digit.
///
/// The whole string is validated before any narrowing happens.
pub fn select_by_digits(bounds: &FieldBox, digits: &str) -> Result<FieldBox, OctreeError> {
    let path = parse_digits(digits)?;
    Ok(select_path(bounds, &path))
}

/// Narrow `bounds` along an already-validated octant path
pub fn select_path(bounds: &FieldBox, path: &[Octant]) -> FieldBox {
    path.iter().fold(*bounds, |b, o| o.child_of(&b))
}

/// Grow `bounds` by one cell of a `resolution`-cell grid on every side
pub fn pad_by_cells(bounds: &FieldBox, resolution: [usize; 3]) -> FieldBox {
    let cells = DVec3::new(
        resolution[0].max(1) as f64,
        resolution[1].max(1) as f64,
        resolution[2].max(1) as f64,
    );
    bounds.padded(bounds.span() / cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> FieldBox {
        FieldBox::new(DVec3::ZERO, DVec3::ONE)
    }

    #[test]
    fn test_children_partition_parent() {
        let parent = FieldBox::new(DVec3::new(-1.0, 0.5, 2.0), DVec3::new(3.0, 1.5, 2.25));
        let children = subdivide(&parent);

        let total: f64 = children.iter().map(|c| c.volume()).sum();
        assert!((total - parent.volume()).abs() < 1e-12);

        // Pairwise overlap is empty (touching faces only).
        for a in 0..8 {
            for b in (a + 1)..8 {
                let lo = children[a].min.max(children[b].min);
                let hi = children[a].max.min(children[b].max);
                let overlap = (hi - lo).max(DVec3::ZERO);
                assert_eq!(overlap.x * overlap.y * overlap.z, 0.0, "{a} and {b} overlap");
            }
        }
    }

    #[test]
    fn test_numbering_convention() {
        let c = subdivide(&unit());
        let centers: Vec<DVec3> = c.iter().map(|b| b.center()).collect();
        assert_eq!(centers[0], DVec3::new(0.25, 0.75, 0.25));
        assert_eq!(centers[1], DVec3::new(0.75, 0.75, 0.25));
        assert_eq!(centers[2], DVec3::new(0.75, 0.25, 0.25));
        assert_eq!(centers[3], DVec3::new(0.25, 0.25, 0.25));
        assert_eq!(centers[4], DVec3::new(0.25, 0.75, 0.75));
        assert_eq!(centers[5], DVec3::new(0.75, 0.75, 0.75));
        assert_eq!(centers[6], DVec3::new(0.75, 0.25, 0.75));
        assert_eq!(centers[7], DVec3::new(0.25, 0.25, 0.75));
    }

    #[test]
    fn test_empty_string_is_identity() {
        let b = FieldBox::new(DVec3::splat(-0.5), DVec3::splat(0.75));
        assert_eq!(select_by_digits(&b, "").unwrap(), b);
    }

    #[test]
    fn test_digits_nest() {
        let b = FieldBox::new(DVec3::splat(-0.5), DVec3::splat(0.75));
        let expected = subdivide(&subdivide(&b)[0])[5];
        assert_eq!(select_by_digits(&b, "05").unwrap(), expected);
    }

    #[test]
    fn test_far_corner() {
        let b = select_by_digits(&unit(), "5555").unwrap();
        assert_eq!(b.max, DVec3::ONE);
        assert!((b.span() - DVec3::splat(1.0 / 16.0)).length() < 1e-15);
    }

    #[test]
    fn test_invalid_digits_rejected() {
        assert_eq!(
            select_by_digits(&unit(), "018"),
            Err(OctreeError::InvalidDigit {
                digit: '8',
                position: 2
            })
        );
        assert_eq!(
            parse_digits("a"),
            Err(OctreeError::InvalidDigit {
                digit: 'a',
                position: 0
            })
        );
        assert!(parse_digits("-1").is_err());
        assert_eq!(parse_digits("0707").unwrap().len(), 4);
    }

    #[test]
    fn test_pad_by_cells() {
        let b = pad_by_cells(&unit(), [4, 4, 4]);
        assert!((b.min - DVec3::splat(-0.25)).length() < 1e-15);
        assert!((b.max - DVec3::splat(1.25)).length() < 1e-15);
    }
}
