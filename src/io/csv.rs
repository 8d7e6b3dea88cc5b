//! CSV dump of a quaternion map
//!
//! Samples the map on a regular 4D lattice and writes one line per sample:
//! the input `w,x,y,z` followed by the output `w,x,y,z`. Axis `a` takes
//! `resolution[a]` samples at `min + (max - min) * i / resolution[a]`, so
//! the max corner itself is never sampled. `z` varies fastest.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::io::IoError;
use crate::map::QuaternionMap;
use crate::quaternion::Quaternion;

/// 4D sampling lattice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapSampling {
    /// Lowest corner
    pub min: Quaternion,
    /// Highest corner
    pub max: Quaternion,
    /// Samples along `w`, `x`, `y`, `z`
    pub resolution: [usize; 4],
}

impl Default for MapSampling {
    fn default() -> Self {
        MapSampling {
            min: Quaternion::new(-1.0, -1.0, -1.0, -1.0),
            max: Quaternion::new(1.0, 1.0, 1.0, 1.0),
            resolution: [8; 4],
        }
    }
}

impl MapSampling {
    /// Total number of samples
    pub fn sample_count(&self) -> usize {
        self.resolution.iter().product()
    }

    fn coordinate(&self, axis: usize, i: usize) -> f64 {
        let lo = self.min[axis];
        let hi = self.max[axis];
        lo + (hi - lo) * i as f64 / self.resolution[axis] as f64
    }
}

/// Write the CSV to a file
pub fn write_map_csv<M: QuaternionMap + ?Sized>(
    map: &M,
    sampling: &MapSampling,
    path: impl AsRef<Path>,
) -> Result<(), IoError> {
    let path = path.as_ref();
    let mut w = BufWriter::new(File::create(path)?);
    write_map_csv_to(map, sampling, &mut w)?;
    w.flush()?;
    tracing::info!(path = %path.display(), samples = sampling.sample_count(), "wrote map samples");
    Ok(())
}

/// Write the CSV to any writer
pub fn write_map_csv_to<M: QuaternionMap + ?Sized>(
    map: &M,
    sampling: &MapSampling,
    mut w: impl Write,
) -> Result<(), IoError> {
    writeln!(w, "w,x,y,z,out_w,out_x,out_y,out_z")?;
    let [nw, nx, ny, nz] = sampling.resolution;
    for i in 0..nw {
        for j in 0..nx {
            for k in 0..ny {
                for l in 0..nz {
                    let q = Quaternion::new(
                        sampling.coordinate(0, i),
                        sampling.coordinate(1, j),
                        sampling.coordinate(2, k),
                        sampling.coordinate(3, l),
                    );
                    let out = map.apply(q);
                    writeln!(
                        w,
                        "{},{},{},{},{},{},{},{}",
                        q.w, q.x, q.y, q.z, out.w, out.x, out.y, out.z
                    )?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::FnMap;

    #[test]
    fn test_lines_and_values() {
        let sampling = MapSampling {
            min: Quaternion::new(0.0, 0.0, 0.0, 0.0),
            max: Quaternion::new(1.0, 2.0, 3.0, 4.0),
            resolution: [2; 4],
        };
        let mut out = Vec::new();
        write_map_csv_to(&FnMap(|q: Quaternion| q * 2.0), &sampling, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 1 + 16);
        assert_eq!(lines[0], "w,x,y,z,out_w,out_x,out_y,out_z");
        assert_eq!(lines[1], "0,0,0,0,0,0,0,0");
        assert_eq!(lines[2], "0,0,0,2,0,0,0,4");
        assert_eq!(lines[16], "0.5,1,1.5,2,1,2,3,4");
    }

    #[test]
    fn test_single_sample_uses_min() {
        let sampling = MapSampling {
            resolution: [1; 4],
            ..Default::default()
        };
        let mut out = Vec::new();
        write_map_csv_to(&FnMap(|q: Quaternion| q), &sampling, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(1), Some("-1,-1,-1,-1,-1,-1,-1,-1"));
    }
}
