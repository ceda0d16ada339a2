//! Collapse validity checks
//!
//! A popped candidate is only applied when collapsing its edge keeps the
//! surface a 2-manifold. Rejected candidates are dropped; the edge comes
//! back only if a later collapse next to it re-queues it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::snapshot::{EdgeId, MeshSnapshot, VertexId};

/// Why a candidate was not collapsed, in the order the checks run
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    #[error("an endpoint was already removed")]
    EndpointRemoved,
    #[error("the edge was already removed")]
    EdgeRemoved,
    #[error("the edge is protected")]
    Protected,
    #[error("the edge does not have exactly two faces")]
    NotInterior,
    #[error("both faces share the same wing vertex")]
    FoldedWings,
    #[error("the endpoints share a neighbour outside the edge's faces")]
    LinkCondition,
    #[error("both endpoints lie on the boundary")]
    BoundaryPinch,
}

impl RejectReason {
    pub const ALL: [RejectReason; 7] = [
        RejectReason::EndpointRemoved,
        RejectReason::EdgeRemoved,
        RejectReason::Protected,
        RejectReason::NotInterior,
        RejectReason::FoldedWings,
        RejectReason::LinkCondition,
        RejectReason::BoundaryPinch,
    ];
}

/// Vertices opposite to the edge in its adjacent triangles.
///
/// Faces with more than three vertices have no single opposite vertex and
/// contribute nothing.
pub fn wings(snapshot: &MeshSnapshot, edge: EdgeId) -> Vec<VertexId> {
    let e = snapshot.edge(edge);
    let (u, v) = e.vertices;
    e.faces
        .iter()
        .filter_map(|&f| match snapshot.face(f).vertices.as_slice() {
            [a, b, c] => [*a, *b, *c].into_iter().find(|&w| w != u && w != v),
            _ => None,
        })
        .collect()
}

/// Whether the triangle `a b c` is a live face, in any winding
fn has_triangle(snapshot: &MeshSnapshot, a: VertexId, b: VertexId, c: VertexId) -> bool {
    snapshot.faces_of(a).any(|f| {
        let verts = &snapshot.face(f).vertices;
        verts.len() == 3 && verts.contains(&b) && verts.contains(&c)
    })
}

/// Check whether the edge can be collapsed.
///
/// The checks run in the order of [`RejectReason`] and the first failure
/// is returned.
pub fn validate_collapse(snapshot: &MeshSnapshot, edge: EdgeId) -> Result<(), RejectReason> {
    let e = snapshot.edge(edge);
    let (u, v) = e.vertices;

    if snapshot.vertex(u).removed || snapshot.vertex(v).removed {
        return Err(RejectReason::EndpointRemoved);
    }
    if e.removed {
        return Err(RejectReason::EdgeRemoved);
    }
    if e.protected {
        return Err(RejectReason::Protected);
    }
    if !e.is_interior() {
        return Err(RejectReason::NotInterior);
    }

    let wings = wings(snapshot, edge);
    if let [w1, w2] = wings[..] {
        if w1 == w2 {
            return Err(RejectReason::FoldedWings);
        }
    }

    let wing_set: BTreeSet<VertexId> = wings.iter().copied().collect();
    let nu = snapshot.neighbors(u);
    let nv = snapshot.neighbors(v);
    if nu.intersection(&nv).any(|w| !wing_set.contains(w)) {
        return Err(RejectReason::LinkCondition);
    }
    // The wings must not also be joined through both endpoints, as in a
    // tetrahedron, or the collapse leaves two coincident triangles
    if let [w1, w2] = wings[..] {
        if has_triangle(snapshot, u, w1, w2) && has_triangle(snapshot, v, w1, w2) {
            return Err(RejectReason::LinkCondition);
        }
    }

    if snapshot.is_boundary_vertex(u) && snapshot.is_boundary_vertex(v) {
        return Err(RejectReason::BoundaryPinch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxymesh_core::{MeshHost, Point3d, PolygonMesh};

    fn snapshot(vertices: usize, faces: &[[usize; 3]]) -> MeshSnapshot {
        let positions = (0..vertices)
            .map(|i| {
                let a = i as f64;
                Point3d::new(a.cos(), a.sin(), 0.1 * a)
            })
            .collect();
        let mesh = PolygonMesh::from_triangles(positions, faces);
        MeshSnapshot::from_adapter(&MeshHost::new(mesh)).unwrap()
    }

    /// Hexagonal fan around vertex 0
    fn fan() -> MeshSnapshot {
        snapshot(
            7,
            &[
                [0, 1, 2],
                [0, 2, 3],
                [0, 3, 4],
                [0, 4, 5],
                [0, 5, 6],
                [0, 6, 1],
            ],
        )
    }

    #[test]
    fn test_spoke_of_fan_is_valid() {
        let s = fan();
        let spoke = s.find_edge(0, 3).unwrap();
        assert_eq!(wings(&s, spoke), vec![2, 4]);
        assert_eq!(validate_collapse(&s, spoke), Ok(()));
    }

    #[test]
    fn test_rim_edge_is_not_interior() {
        let s = fan();
        let rim = s.find_edge(1, 2).unwrap();
        assert_eq!(validate_collapse(&s, rim), Err(RejectReason::NotInterior));
    }

    #[test]
    fn test_protected_and_removed() {
        let mut s = fan();
        let spoke = s.find_edge(0, 3).unwrap();

        s.edges[spoke].protected = true;
        assert_eq!(validate_collapse(&s, spoke), Err(RejectReason::Protected));

        s.edges[spoke].removed = true;
        assert_eq!(validate_collapse(&s, spoke), Err(RejectReason::EdgeRemoved));

        s.vertices[3].removed = true;
        assert_eq!(validate_collapse(&s, spoke), Err(RejectReason::EndpointRemoved));
    }

    #[test]
    fn test_folded_wings() {
        let s = snapshot(3, &[[0, 1, 2], [1, 0, 2]]);
        let e = s.find_edge(0, 1).unwrap();
        assert_eq!(validate_collapse(&s, e), Err(RejectReason::FoldedWings));
    }

    #[test]
    fn test_shared_neighbour_fails_link_condition() {
        let s = snapshot(6, &[[0, 1, 2], [1, 0, 3], [0, 4, 5], [1, 5, 4]]);
        let e = s.find_edge(0, 1).unwrap();
        assert_eq!(validate_collapse(&s, e), Err(RejectReason::LinkCondition));
    }

    #[test]
    fn test_tetrahedron_fails_link_condition() {
        let s = snapshot(4, &[[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]]);
        for edge in 0..s.edges().len() {
            assert_eq!(validate_collapse(&s, edge), Err(RejectReason::LinkCondition));
        }
    }

    #[test]
    fn test_boundary_chord_is_pinch() {
        let s = snapshot(4, &[[0, 1, 2], [0, 2, 3]]);
        let diagonal = s.find_edge(0, 2).unwrap();
        assert_eq!(validate_collapse(&s, diagonal), Err(RejectReason::BoundaryPinch));
    }

    #[test]
    fn test_reasons_are_ordered() {
        let mut sorted = RejectReason::ALL;
        sorted.sort();
        assert_eq!(sorted, RejectReason::ALL);
        assert_eq!(RejectReason::BoundaryPinch.to_string(), "both endpoints lie on the boundary");
    }
}
