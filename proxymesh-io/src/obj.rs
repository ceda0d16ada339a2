//! Wavefront OBJ format support
//!
//! Only positions and faces are read; texture coordinates, normals, groups
//! and materials are ignored. Polygons are kept as they are, not
//! triangulated.

use crate::{MeshReader, MeshWriter};
use ::obj::ObjData;
use proxymesh_core::{Error, Point3d, PolygonMesh, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// OBJ reader built on the `obj` crate
pub struct ObjReader;

/// Plain-text OBJ writer
pub struct ObjWriter;

impl ObjReader {
    /// Parse OBJ data from any reader
    pub fn read_from<R: Read>(input: R) -> Result<PolygonMesh> {
        let data = ObjData::load_buf(input)
            .map_err(|e| Error::Parse(format!("Failed to parse OBJ data: {}", e)))?;
        Self::to_mesh(data)
    }

    fn to_mesh(data: ObjData) -> Result<PolygonMesh> {
        let vertices = data
            .position
            .iter()
            .map(|p| Point3d::new(p[0] as f64, p[1] as f64, p[2] as f64))
            .collect();

        // Index tuples are already zero-based
        let faces = data
            .objects
            .iter()
            .flat_map(|o| o.groups.iter())
            .flat_map(|g| g.polys.iter())
            .map(|poly| poly.0.iter().map(|t| t.0).collect())
            .collect();

        let mesh = PolygonMesh::from_vertices_and_faces(vertices, faces);
        mesh.validate()
            .map_err(|e| Error::Parse(format!("Invalid OBJ mesh: {}", e)))?;
        Ok(mesh)
    }
}

impl MeshReader for ObjReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<PolygonMesh> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }
}

impl ObjWriter {
    /// Write `v` and `f` records with one-based indices
    pub fn write_to<W: Write>(mesh: &PolygonMesh, writer: &mut W) -> Result<()> {
        writeln!(writer, "# proxymesh")?;
        writeln!(
            writer,
            "# {} vertices, {} faces",
            mesh.vertex_count(),
            mesh.face_count()
        )?;
        for v in &mesh.vertices {
            writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for face in &mesh.faces {
            write!(writer, "f")?;
            for &i in face {
                write!(writer, " {}", i + 1)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

impl MeshWriter for ObjWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &PolygonMesh, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(mesh, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_quad_and_triangle() {
        let text = "\
# two faces
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 2 0 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
f 2 5 3
";
        let mesh = ObjReader::read_from(text.as_bytes()).unwrap();
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.faces, vec![vec![0, 1, 2, 3], vec![1, 4, 2]]);
        assert_eq!(mesh.vertices[4], Point3d::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_write_uses_one_based_indices() {
        let mesh = PolygonMesh::from_triangles(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.5, 0.0, 0.0),
                Point3d::new(0.0, 1.0, -2.0),
            ],
            &[[0, 1, 2]],
        );
        let mut buf = Vec::new();
        ObjWriter::write_to(&mesh, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("v 1.5 0 0\n"));
        assert!(text.contains("v 0 1 -2\n"));
        assert!(text.ends_with("f 1 2 3\n"));
    }

    #[test]
    fn test_out_of_range_face_is_parse_error() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3 4\n";
        assert!(matches!(ObjReader::read_from(text.as_bytes()), Err(Error::Parse(_))));
    }
}
