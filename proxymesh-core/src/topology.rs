//! Edge and adjacency tables derived from a face list

use itertools::Itertools;
use std::collections::HashMap;

/// Normalize an unordered vertex pair so the lower index comes first
#[inline]
pub fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Iterate the boundary edges of a polygon as consecutive vertex pairs,
/// including the closing pair. Pairs joining a vertex to itself are skipped.
pub fn face_edges(face: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    face.iter()
        .copied()
        .circular_tuple_windows::<(usize, usize)>()
        .filter(|(a, b)| a != b)
}

/// Unique undirected edges of a polygon mesh with their adjacency.
///
/// Edge ids follow the order in which edges are first met while walking
/// the faces in order, so the numbering is stable for a given face list.
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    edges: Vec<(usize, usize)>,
    edge_faces: Vec<Vec<usize>>,
    vertex_edges: Vec<Vec<usize>>,
    lookup: HashMap<(usize, usize), usize>,
}

impl EdgeTable {
    /// Build the table. Indices at or above `vertex_count` still get edges
    /// but no vertex adjacency; [`crate::PolygonMesh::validate`] reports them.
    pub fn build(vertex_count: usize, faces: &[Vec<usize>]) -> Self {
        let mut table = EdgeTable {
            edges: Vec::new(),
            edge_faces: Vec::new(),
            vertex_edges: vec![Vec::new(); vertex_count],
            lookup: HashMap::with_capacity(faces.len() * 3 / 2),
        };

        for (fi, face) in faces.iter().enumerate() {
            for (a, b) in face_edges(face) {
                let key = edge_key(a, b);
                let id = match table.lookup.get(&key) {
                    Some(&id) => id,
                    None => {
                        let id = table.edges.len();
                        table.edges.push(key);
                        table.edge_faces.push(Vec::new());
                        for v in [key.0, key.1] {
                            if let Some(list) = table.vertex_edges.get_mut(v) {
                                list.push(id);
                            }
                        }
                        table.lookup.insert(key, id);
                        id
                    }
                };
                // A polygon that revisits the same pair twice still counts once
                if table.edge_faces[id].last() != Some(&fi) {
                    table.edge_faces[id].push(fi);
                }
            }
        }

        table
    }

    /// Number of edges
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the table has no edges
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All edges as normalized vertex pairs, indexed by edge id
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Vertex pair of an edge
    pub fn edge(&self, edge: usize) -> Option<(usize, usize)> {
        self.edges.get(edge).copied()
    }

    /// Faces adjacent to an edge, in ascending face order
    pub fn adjacent_faces(&self, edge: usize) -> &[usize] {
        self.edge_faces.get(edge).map_or(&[], |f| f.as_slice())
    }

    /// Edges incident to a vertex, in ascending edge order
    pub fn connected_edges(&self, vertex: usize) -> &[usize] {
        self.vertex_edges.get(vertex).map_or(&[], |e| e.as_slice())
    }

    /// Look up the edge joining two vertices
    pub fn find(&self, a: usize, b: usize) -> Option<usize> {
        self.lookup.get(&edge_key(a, b)).copied()
    }

    /// Number of edges with exactly one adjacent face
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_faces.iter().filter(|f| f.len() == 1).count()
    }

    /// Number of edges with more than two adjacent faces
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_faces.iter().filter(|f| f.len() > 2).count()
    }
}
