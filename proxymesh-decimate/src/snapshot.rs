//! In-memory working copy of a mesh
//!
//! The snapshot is read once from a [`MeshAdapter`], mutated in place by
//! the collapse loop and finally compacted back into plain vertex and face
//! arrays. Removed vertices, faces and edges are tombstoned, never reused,
//! so ids stay stable for the whole run.

use proxymesh_core::{edge_key, face_edges, Error, MeshAdapter, Point3d, PolygonMesh, Result};
use std::collections::{BTreeSet, HashMap};

use crate::quadric::{Plane, Quadric};
use crate::queue::CollapseCost;

pub type VertexId = usize;
pub type FaceId = usize;
pub type EdgeId = usize;
pub type Generation = u64;

#[derive(Debug, Clone)]
pub struct Vertex {
    pub position: Point3d,
    pub quadric: Quadric,
    pub removed: bool,
}

#[derive(Debug, Clone)]
pub struct Face {
    pub vertices: Vec<VertexId>,
    /// Plane of the face as read from the input, filled in by
    /// [`crate::quadric::accumulate`]
    pub plane: Plane,
    pub removed: bool,
}

#[derive(Debug, Clone)]
pub struct Edge {
    /// Endpoints, lower id first
    pub vertices: (VertexId, VertexId),
    pub faces: BTreeSet<FaceId>,
    pub protected: bool,
    pub generation: Generation,
    /// Cost and target computed at the current generation
    pub cached: Option<CollapseCost>,
    pub removed: bool,
}

impl Edge {
    /// Endpoint opposite to `v`, if `v` is an endpoint
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        match self.vertices {
            (a, b) if a == v => Some(b),
            (a, b) if b == v => Some(a),
            _ => None,
        }
    }

    /// Interior manifold edge: exactly two adjacent faces
    pub fn is_interior(&self) -> bool {
        self.faces.len() == 2
    }
}

/// Vertices, faces, edges and their adjacency for one decimation run
#[derive(Debug, Clone)]
pub struct MeshSnapshot {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) faces: Vec<Face>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) vertex_edges: Vec<BTreeSet<EdgeId>>,
    pub(crate) vertex_faces: Vec<BTreeSet<FaceId>>,
    pub(crate) edge_lookup: HashMap<(VertexId, VertexId), EdgeId>,
    pub(crate) live_vertices: usize,
    pub(crate) live_faces: usize,
    pub(crate) live_edges: usize,
}

impl MeshSnapshot {
    /// Read a mesh through its adapter.
    ///
    /// Fails with [`Error::InvalidInput`] when the mesh has fewer than two
    /// vertices or no faces, when a face is malformed, or when the adapter's
    /// edge and adjacency tables disagree with its faces. Planes and
    /// quadrics are left zeroed.
    pub fn from_adapter<A: MeshAdapter + ?Sized>(adapter: &A) -> Result<Self> {
        let mesh = PolygonMesh::from_vertices_and_faces(adapter.vertices(), adapter.faces());
        if mesh.vertex_count() < 2 {
            return Err(Error::InvalidInput(format!(
                "mesh has {} vertices, at least 2 are required",
                mesh.vertex_count()
            )));
        }
        if mesh.face_count() == 0 {
            return Err(Error::InvalidInput("mesh has no faces".to_string()));
        }
        mesh.validate()?;

        let PolygonMesh { vertices, faces } = mesh;
        let vertex_count = vertices.len();

        let mut vertex_faces = vec![BTreeSet::new(); vertex_count];
        for (fi, face) in faces.iter().enumerate() {
            for &v in face {
                vertex_faces[v].insert(fi);
            }
        }

        let mut edges = Vec::new();
        let mut edge_lookup = HashMap::new();
        let mut vertex_edges = vec![BTreeSet::new(); vertex_count];
        for (id, (a, b)) in adapter.edges().into_iter().enumerate() {
            if a >= vertex_count || b >= vertex_count || a == b {
                return Err(Error::InvalidInput(format!(
                    "edge {} joins invalid vertices ({}, {})",
                    id, a, b
                )));
            }
            let key = edge_key(a, b);
            if edge_lookup.insert(key, id).is_some() {
                return Err(Error::InvalidInput(format!(
                    "edge {} duplicates vertex pair ({}, {})",
                    id, key.0, key.1
                )));
            }

            let mut adjacent = BTreeSet::new();
            for fi in adapter.adjacent_faces(id) {
                let face = faces.get(fi).ok_or_else(|| {
                    Error::InvalidInput(format!("edge {} lists unknown face {}", id, fi))
                })?;
                if !face.contains(&a) || !face.contains(&b) {
                    return Err(Error::InvalidInput(format!(
                        "edge {} lists face {} which does not contain both endpoints",
                        id, fi
                    )));
                }
                adjacent.insert(fi);
            }

            vertex_edges[key.0].insert(id);
            vertex_edges[key.1].insert(id);
            edges.push(Edge {
                vertices: key,
                faces: adjacent,
                protected: false,
                generation: 0,
                cached: None,
                removed: false,
            });
        }

        for (fi, face) in faces.iter().enumerate() {
            for (a, b) in face_edges(face) {
                let id = edge_lookup.get(&edge_key(a, b)).ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "face {} uses edge ({}, {}) missing from the edge list",
                        fi, a, b
                    ))
                })?;
                if !edges[*id].faces.contains(&fi) {
                    return Err(Error::InvalidInput(format!(
                        "edge {} does not list adjacent face {}",
                        id, fi
                    )));
                }
            }
        }

        for (v, expected) in vertex_edges.iter().enumerate() {
            let reported: BTreeSet<EdgeId> = adapter.connected_edges(v).into_iter().collect();
            if &reported != expected {
                return Err(Error::InvalidInput(format!(
                    "connected edges of vertex {} disagree with the edge list",
                    v
                )));
            }
        }

        let live_faces = faces.len();
        let live_edges = edges.len();
        let vertices = vertices
            .into_iter()
            .map(|position| Vertex {
                position,
                quadric: Quadric::zero(),
                removed: false,
            })
            .collect();
        let faces = faces
            .into_iter()
            .map(|vertices| Face {
                vertices,
                plane: Plane::zero(),
                removed: false,
            })
            .collect();

        Ok(Self {
            vertices,
            faces,
            edges,
            vertex_edges,
            vertex_faces,
            edge_lookup,
            live_vertices: vertex_count,
            live_faces,
            live_edges,
        })
    }

    pub fn vertex(&self, v: VertexId) -> &Vertex {
        &self.vertices[v]
    }

    pub fn face(&self, f: FaceId) -> &Face {
        &self.faces[f]
    }

    pub fn edge(&self, e: EdgeId) -> &Edge {
        &self.edges[e]
    }

    /// All vertices, including tombstoned ones
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All faces, including tombstoned ones
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// All edges, including tombstoned ones
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn live_vertex_count(&self) -> usize {
        self.live_vertices
    }

    pub fn live_face_count(&self) -> usize {
        self.live_faces
    }

    pub fn live_edge_count(&self) -> usize {
        self.live_edges
    }

    /// Live edges incident to a vertex, ascending
    pub fn edges_of(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertex_edges[v].iter().copied()
    }

    /// Live faces incident to a vertex, ascending
    pub fn faces_of(&self, v: VertexId) -> impl Iterator<Item = FaceId> + '_ {
        self.vertex_faces[v].iter().copied()
    }

    /// Live edge joining two vertices
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_lookup.get(&edge_key(a, b)).copied()
    }

    /// Vertices sharing a live edge with `v`
    pub fn neighbors(&self, v: VertexId) -> BTreeSet<VertexId> {
        self.vertex_edges[v]
            .iter()
            .filter_map(|&e| self.edges[e].other(v))
            .collect()
    }

    /// Whether `v` touches an edge with fewer than two faces
    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        self.vertex_edges[v]
            .iter()
            .any(|&e| self.edges[e].faces.len() < 2)
    }

    /// Largest number of faces on any live edge
    pub fn max_edge_valence(&self) -> usize {
        self.edges
            .iter()
            .filter(|e| !e.removed)
            .map(|e| e.faces.len())
            .max()
            .unwrap_or(0)
    }

    /// Compact the live vertices and faces into fresh arrays.
    ///
    /// Live vertices keep their relative order, as do live faces.
    pub fn to_output(&self) -> (Vec<Point3d>, Vec<Vec<usize>>) {
        let mut remap = vec![usize::MAX; self.vertices.len()];
        let mut positions = Vec::with_capacity(self.live_vertices);
        for (i, vertex) in self.vertices.iter().enumerate() {
            if !vertex.removed {
                remap[i] = positions.len();
                positions.push(vertex.position);
            }
        }

        let faces = self
            .faces
            .iter()
            .filter(|f| !f.removed)
            .map(|f| f.vertices.iter().map(|&v| remap[v]).collect())
            .collect();

        (positions, faces)
    }
}
