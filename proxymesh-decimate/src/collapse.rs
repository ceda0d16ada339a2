//! Edge collapse
//!
//! Collapsing an edge keeps its lower-id endpoint, moves it to the target
//! position and rewires everything that referenced the other endpoint.

use itertools::Itertools;
use proxymesh_core::{edge_key, face_edges, Point3d};
use serde::{Deserialize, Serialize};

use crate::guard::{validate_collapse, RejectReason};
use crate::queue::Candidate;
use crate::snapshot::{EdgeId, FaceId, MeshSnapshot, VertexId};

/// One applied collapse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollapseRecord {
    pub edge: EdgeId,
    pub retained: VertexId,
    pub removed: VertexId,
    pub position: Point3d,
    pub cost: f64,
}

/// What happened to a popped candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollapseOutcome {
    Applied(CollapseRecord),
    Discarded(RejectReason),
}

/// Validate a live candidate and collapse its edge if allowed
pub fn try_collapse(snapshot: &mut MeshSnapshot, candidate: &Candidate) -> CollapseOutcome {
    match validate_collapse(snapshot, candidate.edge) {
        Ok(()) => CollapseOutcome::Applied(apply_collapse(
            snapshot,
            candidate.edge,
            candidate.target,
            candidate.cost,
        )),
        Err(reason) => CollapseOutcome::Discarded(reason),
    }
}

/// Face after replacing `removed` by `retained`, or `None` when the face
/// degenerates.
///
/// Consecutive repeats, including the wrap from last to first, are merged
/// first. A face left with fewer than three vertices, or still repeating a
/// vertex, is degenerate.
fn rewrite_face(face: &[VertexId], removed: VertexId, retained: VertexId) -> Option<Vec<VertexId>> {
    let mut out: Vec<VertexId> = face
        .iter()
        .map(|&v| if v == removed { retained } else { v })
        .dedup()
        .collect();
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    (out.len() >= 3 && out.iter().all_unique()).then_some(out)
}

/// Tombstone a face and detach it from its vertices and edges
fn drop_face(snapshot: &mut MeshSnapshot, f: FaceId) {
    let vertices = snapshot.faces[f].vertices.clone();
    for &v in &vertices {
        snapshot.vertex_faces[v].remove(&f);
    }
    for (a, b) in face_edges(&vertices) {
        if let Some(&e) = snapshot.edge_lookup.get(&edge_key(a, b)) {
            snapshot.edges[e].faces.remove(&f);
        }
    }
    snapshot.faces[f].removed = true;
    snapshot.live_faces -= 1;
}

/// Tombstone an edge and unlink it from its endpoints
fn drop_edge(snapshot: &mut MeshSnapshot, e: EdgeId) {
    let (a, b) = snapshot.edges[e].vertices;
    snapshot.vertex_edges[a].remove(&e);
    snapshot.vertex_edges[b].remove(&e);
    if snapshot.edge_lookup.get(&(a, b)) == Some(&e) {
        snapshot.edge_lookup.remove(&(a, b));
    }
    snapshot.edges[e].removed = true;
    snapshot.live_edges -= 1;
}

/// Collapse an edge unconditionally. Callers check it with
/// [`validate_collapse`] first.
pub fn apply_collapse(
    snapshot: &mut MeshSnapshot,
    edge: EdgeId,
    target: Point3d,
    cost: f64,
) -> CollapseRecord {
    let (retained, removed) = snapshot.edges[edge].vertices;

    drop_edge(snapshot, edge);

    let faces: Vec<FaceId> = snapshot.vertex_faces[removed].iter().copied().collect();
    for f in faces {
        match rewrite_face(&snapshot.faces[f].vertices, removed, retained) {
            Some(rewritten) => {
                snapshot.faces[f].vertices = rewritten;
                snapshot.vertex_faces[removed].remove(&f);
                snapshot.vertex_faces[retained].insert(f);
            }
            None => drop_face(snapshot, f),
        }
    }

    let edges: Vec<EdgeId> = snapshot.vertex_edges[removed].iter().copied().collect();
    for e in edges {
        let Some(other) = snapshot.edges[e].other(removed) else {
            continue;
        };
        match snapshot.find_edge(retained, other) {
            Some(existing) => {
                let faces = std::mem::take(&mut snapshot.edges[e].faces);
                let protected = snapshot.edges[e].protected;
                let merged = &mut snapshot.edges[existing];
                merged.faces.extend(faces);
                merged.protected |= protected;
                drop_edge(snapshot, e);
            }
            None => {
                snapshot.edge_lookup.remove(&edge_key(removed, other));
                snapshot.vertex_edges[removed].remove(&e);
                let key = edge_key(retained, other);
                snapshot.edges[e].vertices = key;
                snapshot.edge_lookup.insert(key, e);
                snapshot.vertex_edges[retained].insert(e);
            }
        }
    }

    let absorbed = snapshot.vertices[removed].quadric;
    let keep = &mut snapshot.vertices[retained];
    keep.quadric += absorbed;
    keep.position = target;
    snapshot.vertices[removed].removed = true;
    snapshot.live_vertices -= 1;

    CollapseRecord {
        edge,
        retained,
        removed,
        position: target,
        cost,
    }
}
