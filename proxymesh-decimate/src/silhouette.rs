//! Silhouette and boundary classification
//!
//! Edges whose two faces point to opposite sides of the view direction
//! outline the mesh as seen along that direction. They are marked
//! protected, together with boundary and non-manifold edges, before any
//! candidate is queued.

use proxymesh_core::{Error, Result, Vector3d};
use serde::{Deserialize, Serialize};

use crate::snapshot::{Edge, FaceId, MeshSnapshot};

/// Class of an edge with respect to a view direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeClass {
    Interior,
    Silhouette,
    Boundary,
    NonManifold,
}

impl EdgeClass {
    pub fn is_protected(&self) -> bool {
        !matches!(self, EdgeClass::Interior)
    }
}

/// Edge counts per class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilhouetteSummary {
    pub interior: usize,
    pub silhouette: usize,
    pub boundary: usize,
    pub non_manifold: usize,
}

impl SilhouetteSummary {
    pub fn protected(&self) -> usize {
        self.silhouette + self.boundary + self.non_manifold
    }

    pub fn total(&self) -> usize {
        self.interior + self.protected()
    }

    fn count(&mut self, class: EdgeClass) {
        match class {
            EdgeClass::Interior => self.interior += 1,
            EdgeClass::Silhouette => self.silhouette += 1,
            EdgeClass::Boundary => self.boundary += 1,
            EdgeClass::NonManifold => self.non_manifold += 1,
        }
    }
}

/// Unit view direction, or `InvalidParameter` for a zero or non-finite one
pub fn normalized_view(view: &Vector3d) -> Result<Vector3d> {
    if !view.iter().all(|c| c.is_finite()) {
        return Err(Error::InvalidParameter(format!(
            "view direction {:?} is not finite",
            view.as_slice()
        )));
    }
    view.try_normalize(0.0).ok_or_else(|| {
        Error::InvalidParameter("view direction must not be the zero vector".to_string())
    })
}

/// Whether two face normals lie on strictly opposite sides of the view
/// direction. A zero dot product is not a sign change.
pub fn is_silhouette(n1: &Vector3d, n2: &Vector3d, view: &Vector3d) -> bool {
    let d1 = n1.dot(view);
    let d2 = n2.dot(view);
    (d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0)
}

/// Class of one edge using the face planes stored in the snapshot
pub fn classify_edge(snapshot: &MeshSnapshot, edge: &Edge, view: &Vector3d) -> EdgeClass {
    let faces: Vec<FaceId> = edge.faces.iter().copied().collect();
    match faces[..] {
        [f1, f2] => {
            let n1 = &snapshot.face(f1).plane.normal;
            let n2 = &snapshot.face(f2).plane.normal;
            if is_silhouette(n1, n2, view) {
                EdgeClass::Silhouette
            } else {
                EdgeClass::Interior
            }
        }
        [] | [_] => EdgeClass::Boundary,
        _ => EdgeClass::NonManifold,
    }
}

/// Classify every live edge and set its `protected` flag.
///
/// Face planes must already be computed. `view` must be a unit vector, see
/// [`normalized_view`].
pub fn classify(snapshot: &mut MeshSnapshot, view: &Vector3d) -> SilhouetteSummary {
    let mut summary = SilhouetteSummary::default();
    for ei in 0..snapshot.edges.len() {
        if snapshot.edges[ei].removed {
            continue;
        }
        let class = classify_edge(snapshot, &snapshot.edges[ei], view);
        snapshot.edges[ei].protected = class.is_protected();
        summary.count(class);
    }
    summary
}
