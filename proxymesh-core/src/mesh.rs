//! Polygon mesh data structure

use crate::point::*;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A mesh of arbitrary polygons sharing an indexed vertex array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonMesh {
    pub vertices: Vec<Point3d>,
    pub faces: Vec<Vec<usize>>,
}

impl PolygonMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3d>, faces: Vec<Vec<usize>>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from triangles
    pub fn from_triangles(vertices: Vec<Point3d>, triangles: &[[usize; 3]]) -> Self {
        let faces = triangles.iter().map(|t| t.to_vec()).collect();
        Self { vertices, faces }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3d) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face to the mesh
    pub fn add_face(&mut self, face: Vec<usize>) -> usize {
        let index = self.faces.len();
        self.faces.push(face);
        index
    }

    /// Whether every face is a triangle
    pub fn is_triangulated(&self) -> bool {
        self.faces.iter().all(|f| f.len() == 3)
    }

    /// Unit normal of a face from its first three vertices.
    ///
    /// Returns `None` for faces whose first three vertices are colinear
    /// or coincident.
    pub fn face_normal(&self, face: usize) -> Option<Vector3d> {
        let f = self.faces.get(face)?;
        if f.len() < 3 {
            return None;
        }
        let v0 = self.vertices.get(f[0])?;
        let v1 = self.vertices.get(f[1])?;
        let v2 = self.vertices.get(f[2])?;
        (v1 - v0).cross(&(v2 - v0)).try_normalize(f64::EPSILON)
    }

    /// Calculate face normals, with the zero vector for degenerate faces
    pub fn calculate_face_normals(&self) -> Vec<Vector3d> {
        (0..self.faces.len())
            .map(|i| self.face_normal(i).unwrap_or_else(Vector3d::zeros))
            .collect()
    }

    /// Check that the mesh can be processed: every face has at least three
    /// vertices, every index is in range and every coordinate is finite.
    pub fn validate(&self) -> Result<()> {
        if let Some(i) = self.vertices.iter().position(|p| !is_finite(p)) {
            return Err(Error::InvalidInput(format!(
                "vertex {} has a non-finite coordinate",
                i
            )));
        }
        for (fi, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(Error::InvalidInput(format!(
                    "face {} has {} vertices, at least 3 are required",
                    fi,
                    face.len()
                )));
            }
            if let Some(&v) = face.iter().find(|&&v| v >= self.vertices.len()) {
                return Err(Error::InvalidInput(format!(
                    "face {} references vertex {} but the mesh has {} vertices",
                    fi,
                    v,
                    self.vertices.len()
                )));
            }
        }
        Ok(())
    }

    /// Clear the mesh
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
    }
}

impl Default for PolygonMesh {
    fn default() -> Self {
        Self::new()
    }
}
