//! `.f3d` distance-field lattice
//!
//! Little-endian layout:
//!
//! ```text
//! i32 x3      resolution (nx, ny, nz)
//! f64 x3      box center
//! f64 x3      box edge lengths
//! f64 x n     samples, n = nx * ny * nz, x fastest then y then z
//! ```
//!
//! The lattice box is `center -/+ lengths / 2`.

use glam::DVec3;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::field::{EdgePolicy, LatticeGrid};
use crate::io::IoError;
use crate::types::FieldBox;

const HEADER_BYTES: usize = 3 * 4 + 6 * 8;

/// Load a lattice from a `.f3d` file
pub fn load_f3d(path: impl AsRef<Path>) -> Result<LatticeGrid, IoError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let grid = read_f3d(BufReader::new(file))?;
    tracing::info!(
        path = %path.display(),
        resolution = ?grid.resolution(),
        "loaded distance field"
    );
    Ok(grid)
}

/// Samples reserved up front before any are read
const MAX_PREALLOC_SAMPLES: usize = 1 << 20;

/// Read a lattice from any `.f3d` byte stream
pub fn read_f3d(mut r: impl Read) -> Result<LatticeGrid, IoError> {
    let mut header = [0u8; HEADER_BYTES];
    r.read_exact(&mut header).map_err(|e| truncated(e, "header"))?;

    let mut resolution = [0usize; 3];
    for (axis, n) in resolution.iter_mut().enumerate() {
        let raw = i32::from_le_bytes(word4(&header, axis * 4));
        if raw <= 0 {
            return Err(IoError::InvalidFormat(format!(
                "resolution must be positive, axis {} is {}",
                axis, raw
            )));
        }
        *n = raw as usize;
    }
    let f = |i: usize| f64::from_le_bytes(word8(&header, 12 + i * 8));
    let center = DVec3::new(f(0), f(1), f(2));
    let lengths = DVec3::new(f(3), f(4), f(5));

    let count = resolution
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .filter(|&n| n <= isize::MAX as usize / 8)
        .ok_or_else(|| IoError::InvalidFormat(format!("resolution {:?} too large", resolution)))?;

    // Grow with the data actually read; the header alone is not trusted.
    let mut data = Vec::with_capacity(count.min(MAX_PREALLOC_SAMPLES));
    let mut buf = [0u8; 8];
    for _ in 0..count {
        r.read_exact(&mut buf).map_err(|e| truncated(e, "samples"))?;
        data.push(f64::from_le_bytes(buf));
    }

    let bounds = FieldBox::from_center_extents(center, lengths * 0.5);
    LatticeGrid::from_samples(resolution, bounds, data, EdgePolicy::Clamp)
        .map_err(|e| IoError::InvalidFormat(e.to_string()))
}

/// Save a lattice to a `.f3d` file
pub fn save_f3d(grid: &LatticeGrid, path: impl AsRef<Path>) -> Result<(), IoError> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    write_f3d(grid, &mut w)?;
    w.flush()?;
    Ok(())
}

/// Write a lattice as `.f3d` bytes
pub fn write_f3d(grid: &LatticeGrid, mut w: impl Write) -> Result<(), IoError> {
    for n in grid.resolution() {
        let n = i32::try_from(n).map_err(|_| {
            IoError::InvalidFormat(format!("resolution {} does not fit the format", n))
        })?;
        w.write_all(&n.to_le_bytes())?;
    }
    let b = grid.bounds();
    for v in b.center().to_array().into_iter().chain(b.span().to_array()) {
        w.write_all(&v.to_le_bytes())?;
    }
    for v in grid.data() {
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

fn truncated(e: std::io::Error, part: &str) -> IoError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        IoError::InvalidFormat(format!("file ends inside the {}", part))
    } else {
        IoError::Io(e)
    }
}

#[inline]
fn word4(bytes: &[u8], at: usize) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(&bytes[at..at + 4]);
    out
}

#[inline]
fn word8(bytes: &[u8], at: usize) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(&bytes[at..at + 8]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::temp_path;

    fn sample_grid() -> LatticeGrid {
        LatticeGrid::from_fn(
            [3, 2, 4],
            FieldBox::new(DVec3::new(-1.0, 0.0, 2.0), DVec3::new(1.0, 0.5, 3.0)),
            |i, j, k| i as f64 - 0.5 * j as f64 + 0.25 * k as f64,
        )
        .unwrap()
    }

    #[test]
    fn test_file_round_trip() {
        let grid = sample_grid();
        let path = temp_path("grid.f3d");
        save_f3d(&grid, &path).unwrap();
        let loaded = load_f3d(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.resolution(), grid.resolution());
        assert_eq!(loaded.data(), grid.data());
        assert!((loaded.bounds().min - grid.bounds().min).length() < 1e-12);
        assert!((loaded.bounds().max - grid.bounds().max).length() < 1e-12);
    }

    #[test]
    fn test_byte_layout() {
        let grid = LatticeGrid::from_samples(
            [1, 1, 2],
            FieldBox::from_center_extents(DVec3::new(1.0, 2.0, 3.0), DVec3::splat(0.5)),
            vec![7.0, -7.0],
            EdgePolicy::Clamp,
        )
        .unwrap();
        let mut bytes = Vec::new();
        write_f3d(&grid, &mut bytes).unwrap();

        assert_eq!(bytes.len(), HEADER_BYTES + 16);
        assert_eq!(&bytes[8..12], &2i32.to_le_bytes());
        assert_eq!(&bytes[12..20], &1.0f64.to_le_bytes());
        assert_eq!(&bytes[36..44], &1.0f64.to_le_bytes());
        assert_eq!(&bytes[60..68], &7.0f64.to_le_bytes());
    }

    #[test]
    fn test_rejects_bad_headers() {
        let mut bytes = Vec::new();
        write_f3d(&sample_grid(), &mut bytes).unwrap();

        let short = &bytes[..bytes.len() - 3];
        assert!(matches!(read_f3d(short), Err(IoError::InvalidFormat(_))));

        let mut negative = bytes.clone();
        negative[0..4].copy_from_slice(&(-3i32).to_le_bytes());
        assert!(matches!(read_f3d(&negative[..]), Err(IoError::InvalidFormat(_))));

        assert!(matches!(read_f3d(&bytes[..10]), Err(IoError::InvalidFormat(_))));
    }

    #[test]
    fn test_huge_header_without_samples() {
        let mut bytes = Vec::new();
        for _ in 0..3 {
            bytes.extend_from_slice(&(1i32 << 20).to_le_bytes());
        }
        bytes.extend_from_slice(&[0u8; 48]);
        assert!(matches!(read_f3d(&bytes[..]), Err(IoError::InvalidFormat(_))));

        // Fits the address space but the file holds no samples.
        let mut bytes = Vec::new();
        for _ in 0..3 {
            bytes.extend_from_slice(&2000i32.to_le_bytes());
        }
        bytes.extend_from_slice(&[0u8; 48]);
        bytes.extend_from_slice(&1.0f64.to_le_bytes());
        assert!(matches!(read_f3d(&bytes[..]), Err(IoError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(load_f3d(temp_path("does_not_exist.f3d")), Err(IoError::Io(_))));
    }
}
