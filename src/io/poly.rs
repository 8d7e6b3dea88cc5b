//! Polynomial and rational map files (JSON)
//!
//! ```json
//! {
//!   "numerator": {
//!     "roots": [{ "position": { "w": 0.1, "x": 0.2, "y": 0.0, "z": 0.0 }, "power": 2 }],
//!     "scale": 1.0
//!   },
//!   "denominator": null
//! }
//! ```
//!
//! `power` defaults to 1, `scale` to 1.0 and `denominator` to none.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::io::IoError;
use crate::map::RationalMap;

/// Load a map description
pub fn load_map(path: impl AsRef<Path>) -> Result<RationalMap, IoError> {
    let file = File::open(path)?;
    let map: RationalMap = serde_json::from_reader(BufReader::new(file))?;
    if map.numerator.roots.is_empty() {
        return Err(IoError::InvalidFormat("numerator has no roots".to_string()));
    }
    Ok(map)
}

/// Save a map description as pretty-printed JSON
pub fn save_map(map: &RationalMap, path: impl AsRef<Path>) -> Result<(), IoError> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, map)?;
    w.flush()?;
    Ok(())
}
