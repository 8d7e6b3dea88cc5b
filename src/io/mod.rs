//! File I/O
//!
//! - `.f3d`: binary distance-field lattice ([`f3d`])
//! - `.obj`: Wavefront mesh output ([`obj`])
//! - `.json`: polynomial / rational map description ([`poly`])
//! - `.csv`: map samples over a 4D lattice ([`csv`])
//!
//! Readers and writers are buffered; every failure is reported as an
//! [`IoError`].

pub mod csv;
pub mod f3d;
pub mod obj;
pub mod poly;

pub use self::csv::{write_map_csv, write_map_csv_to, MapSampling};
pub use f3d::{load_f3d, read_f3d, save_f3d, write_f3d};
pub use obj::{export_obj, write_obj, ObjConfig};
pub use poly::{load_map, save_map};

use thiserror::Error;

/// File I/O errors
#[derive(Error, Debug)]
pub enum IoError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file format
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            IoError::Io(e.into())
        } else {
            IoError::Serialization(e.to_string())
        }
    }
}

#[cfg(test)]
pub(crate) fn temp_path(name: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("shaped_julia_test_{}_{}", std::process::id(), name));
    path
}
