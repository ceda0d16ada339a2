//! I/O operations for meshes
//!
//! This crate reads and writes polygon meshes. Wavefront OBJ is the only
//! supported format; the format is picked from the file extension.

pub mod obj;

pub use self::obj::{ObjReader, ObjWriter};

use proxymesh_core::{Error, PolygonMesh, Result};
use std::path::Path;

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<PolygonMesh>;
}

/// Trait for writing meshes to files
pub trait MeshWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &PolygonMesh, path: P) -> Result<()>;
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

/// Auto-detect format and read mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<PolygonMesh> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("obj") => ObjReader::read_mesh(path),
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        ))),
    }
}

/// Auto-detect format and write mesh
pub fn write_mesh<P: AsRef<Path>>(mesh: &PolygonMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("obj") => ObjWriter::write_mesh(mesh, path),
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxymesh_core::Point3d;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("proxymesh_io_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_obj_mesh_roundtrip() {
        let temp_file = temp_path("roundtrip.OBJ");

        let mut mesh = PolygonMesh::new();
        for p in [
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(1.0, 1.0, 0.0),
            Point3d::new(0.0, 1.0, 0.5),
            Point3d::new(0.5, 2.0, 0.25),
        ] {
            mesh.add_vertex(p);
        }
        mesh.add_face(vec![0, 1, 2, 3]);
        mesh.add_face(vec![3, 2, 4]);

        write_mesh(&mesh, &temp_file).unwrap();
        let loaded = read_mesh(&temp_file).unwrap();
        assert_eq!(loaded, mesh);

        let _ = fs::remove_file(&temp_file);
    }

    #[test]
    fn test_unsupported_formats() {
        let mesh = PolygonMesh::new();
        let err = write_mesh(&mesh, temp_path("mesh.ply")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));

        let err = read_mesh(temp_path("mesh")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = read_mesh(temp_path("does_not_exist.obj")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
