//! Crate-level error type

use thiserror::Error;

use crate::field::GridError;
use crate::io::IoError;
use crate::octree::OctreeError;

/// Any failure of a shaped-julia run
#[derive(Error, Debug)]
pub enum Error {
    /// Bad octree digit string
    #[error(transparent)]
    Octree(#[from] OctreeError),

    /// Lattice construction or strict lookup failure
    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    /// File I/O or format failure
    #[error(transparent)]
    Io(#[from] IoError),

    /// Run parameters that cannot produce a result
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(IoError::Io(e))
    }
}

/// Result alias for fallible crate operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e: Error = OctreeError::InvalidDigit {
            digit: '9',
            position: 3,
        }
        .into();
        assert_eq!(
            e.to_string(),
            "invalid octree digit '9' at position 3: valid digits are 0-7"
        );

        let e: Error = GridError::ZeroResolution([0, 1, 1]).into();
        assert!(e.to_string().starts_with("grid error:"));

        let e: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(e, Error::Io(IoError::Io(_))));
    }
}
