//! The seam between the decimation engine and whatever owns the mesh
//!
//! A host environment (a scene graph, a file, an editor document) exposes its
//! mesh through [`MeshAdapter`]. The engine reads the mesh once, works on its
//! own snapshot, and hands the result back through
//! [`MeshAdapter::materialize`] exactly once.

use crate::mesh::PolygonMesh;
use crate::point::Point3d;
use crate::topology::EdgeTable;
use crate::Result;

/// Read/write access to a host-owned polygon mesh
pub trait MeshAdapter {
    /// Handle to a mesh created by [`MeshAdapter::materialize`]
    type Handle;

    /// Vertex positions, indexed by vertex id
    fn vertices(&self) -> Vec<Point3d>;

    /// Faces as ordered vertex-index lists, indexed by face id
    fn faces(&self) -> Vec<Vec<usize>>;

    /// Undirected edges as vertex pairs, indexed by edge id
    fn edges(&self) -> Vec<(usize, usize)>;

    /// Faces adjacent to an edge
    fn adjacent_faces(&self, edge: usize) -> Vec<usize>;

    /// Edges incident to a vertex
    fn connected_edges(&self, vertex: usize) -> Vec<usize>;

    /// Create a new mesh from the given vertices and faces
    fn materialize(&mut self, vertices: Vec<Point3d>, faces: Vec<Vec<usize>>)
        -> Result<Self::Handle>;
}

/// In-memory host for a [`PolygonMesh`].
///
/// Edge ids are assigned in order of first appearance while walking the
/// faces, see [`EdgeTable`].
#[derive(Debug, Clone)]
pub struct MeshHost {
    mesh: PolygonMesh,
    topology: EdgeTable,
}

impl MeshHost {
    pub fn new(mesh: PolygonMesh) -> Self {
        let topology = EdgeTable::build(mesh.vertex_count(), &mesh.faces);
        Self { mesh, topology }
    }

    /// The hosted mesh
    pub fn mesh(&self) -> &PolygonMesh {
        &self.mesh
    }

    /// Derived edge table
    pub fn topology(&self) -> &EdgeTable {
        &self.topology
    }

    pub fn into_mesh(self) -> PolygonMesh {
        self.mesh
    }
}

impl From<PolygonMesh> for MeshHost {
    fn from(mesh: PolygonMesh) -> Self {
        Self::new(mesh)
    }
}

impl MeshAdapter for MeshHost {
    type Handle = PolygonMesh;

    fn vertices(&self) -> Vec<Point3d> {
        self.mesh.vertices.clone()
    }

    fn faces(&self) -> Vec<Vec<usize>> {
        self.mesh.faces.clone()
    }

    fn edges(&self) -> Vec<(usize, usize)> {
        self.topology.edges().to_vec()
    }

    fn adjacent_faces(&self, edge: usize) -> Vec<usize> {
        self.topology.adjacent_faces(edge).to_vec()
    }

    fn connected_edges(&self, vertex: usize) -> Vec<usize> {
        self.topology.connected_edges(vertex).to_vec()
    }

    fn materialize(
        &mut self,
        vertices: Vec<Point3d>,
        faces: Vec<Vec<usize>>,
    ) -> Result<PolygonMesh> {
        let mesh = PolygonMesh::from_vertices_and_faces(vertices, faces);
        mesh.validate()?;
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> PolygonMesh {
        PolygonMesh::from_triangles(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(1.0, 1.0, 0.0),
                Point3d::new(0.0, 1.0, 0.0),
            ],
            &[[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_host_exposes_topology() {
        let host = MeshHost::new(two_triangles());
        assert_eq!(host.vertices().len(), 4);
        assert_eq!(host.faces().len(), 2);
        assert_eq!(host.edges().len(), 5);

        let diagonal = host.topology().find(0, 2).unwrap();
        assert_eq!(host.adjacent_faces(diagonal), vec![0, 1]);
        assert_eq!(host.connected_edges(2).len(), 3);
    }

    #[test]
    fn test_materialize_creates_new_mesh() {
        let mut host = MeshHost::from(two_triangles());
        let created = host
            .materialize(
                vec![
                    Point3d::new(0.0, 0.0, 0.0),
                    Point3d::new(1.0, 0.0, 0.0),
                    Point3d::new(0.0, 1.0, 0.0),
                ],
                vec![vec![0, 1, 2]],
            )
            .unwrap();
        assert_eq!(created.face_count(), 1);
        // The hosted mesh is left untouched
        assert_eq!(host.mesh().face_count(), 2);
    }

    #[test]
    fn test_materialize_rejects_bad_indices() {
        let mut host = MeshHost::from(two_triangles());
        let result = host.materialize(vec![Point3d::origin()], vec![vec![0, 1, 2]]);
        assert!(result.is_err());
    }
}
