//! Wavefront OBJ export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::io::IoError;
use crate::mesh::Mesh;

/// OBJ export configuration
#[derive(Debug, Clone)]
pub struct ObjConfig {
    /// Export normals (vn)
    pub export_normals: bool,
    /// Object name written on the `o` line; defaults to the file stem
    pub object_name: Option<String>,
}

impl Default for ObjConfig {
    fn default() -> Self {
        ObjConfig {
            export_normals: true,
            object_name: None,
        }
    }
}

/// Export a mesh to a Wavefront OBJ file
pub fn export_obj(mesh: &Mesh, path: impl AsRef<Path>, config: &ObjConfig) -> Result<(), IoError> {
    let path = path.as_ref();
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("mesh");
    let name = config.object_name.as_deref().unwrap_or(stem);

    let mut w = BufWriter::new(File::create(path)?);
    write_obj(mesh, &mut w, name, config.export_normals)?;
    w.flush()?;

    tracing::info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "wrote mesh"
    );
    Ok(())
}

/// Write OBJ text for `mesh` to any writer
pub fn write_obj(mesh: &Mesh, mut w: impl Write, name: &str, normals: bool) -> Result<(), IoError> {
    writeln!(w, "# shaped-julia OBJ export")?;
    writeln!(w, "# Vertices: {}", mesh.vertex_count())?;
    writeln!(w, "# Triangles: {}", mesh.triangle_count())?;
    writeln!(w, "o {}", name)?;

    for v in &mesh.vertices {
        writeln!(w, "v {} {} {}", v.position.x, v.position.y, v.position.z)?;
    }
    if normals {
        for v in &mesh.vertices {
            writeln!(w, "vn {} {} {}", v.normal.x, v.normal.y, v.normal.z)?;
        }
    }

    for tri in mesh.indices.chunks_exact(3) {
        // OBJ is 1-indexed
        let (a, b, c) = (tri[0] as usize + 1, tri[1] as usize + 1, tri[2] as usize + 1);
        if normals {
            writeln!(w, "f {}//{} {}//{} {}//{}", a, a, b, b, c, c)?;
        } else {
            writeln!(w, "f {} {} {}", a, b, c)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::temp_path;
    use crate::mesh::Vertex;
    use glam::DVec3;

    fn triangle() -> Mesh {
        Mesh {
            vertices: vec![
                Vertex::new(DVec3::ZERO, DVec3::Z),
                Vertex::new(DVec3::X, DVec3::Z),
                Vertex::new(DVec3::new(0.0, 0.5, 0.0), DVec3::Z),
            ],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_obj_text() {
        let mut out = Vec::new();
        write_obj(&triangle(), &mut out, "tri", true).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("o tri\n"));
        assert!(text.contains("v 0 0.5 0\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 3);
        assert!(text.contains("f 1//1 2//2 3//3\n"));
    }

    #[test]
    fn test_obj_without_normals() {
        let mut out = Vec::new();
        write_obj(&triangle(), &mut out, "tri", false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("vn "));
        assert!(text.contains("f 1 2 3\n"));
    }

    #[test]
    fn test_export_uses_file_stem() {
        let path = temp_path("named.obj");
        export_obj(&triangle(), &path, &ObjConfig::default()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(text.lines().any(|l| l.starts_with("o shaped_julia_test_") && l.ends_with("named")));
    }
}
