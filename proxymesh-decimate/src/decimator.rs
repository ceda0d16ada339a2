//! Decimation driver
//!
//! Runs the pipeline once per call: snapshot, quadrics, silhouette
//! classification, queue seeding, then collapses until the target vertex
//! count is met or no candidate is left.

use proxymesh_core::{Error, MeshAdapter, Result, Vector3d};
use std::collections::BTreeMap;
use tracing::{debug, info, trace, warn};

use crate::collapse::{try_collapse, CollapseOutcome};
use crate::params::DecimateParams;
use crate::quadric::accumulate;
use crate::queue::CandidateQueue;
use crate::report::{Decimation, DecimationReport, DecimationStatus, StopReason};
use crate::silhouette::{classify, normalized_view};
use crate::snapshot::MeshSnapshot;

/// Silhouette-preserving edge-collapse decimator
#[derive(Debug, Clone, Default)]
pub struct QuadricDecimator {
    params: DecimateParams,
}

impl QuadricDecimator {
    pub fn new(params: DecimateParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DecimateParams {
        &self.params
    }

    /// Decimate the mesh behind an adapter and materialize the result
    /// through the same adapter.
    ///
    /// Parameters are checked before the mesh is read. The adapter is only
    /// touched to read the input and to build the output.
    pub fn decimate<A: MeshAdapter + ?Sized>(
        &self,
        adapter: &mut A,
    ) -> Result<Decimation<A::Handle>> {
        self.params.validate()?;
        let mut snapshot = MeshSnapshot::from_adapter(adapter)?;
        let report = self.run(&mut snapshot)?;

        let (vertices, faces) = snapshot.to_output();
        let mesh = adapter.materialize(vertices, faces)?;
        Ok(Decimation { mesh, report })
    }

    /// Decimate a snapshot in place.
    ///
    /// The snapshot must be fresh from [`MeshSnapshot::from_adapter`];
    /// quadrics and protection flags are computed here.
    pub fn run(&self, snapshot: &mut MeshSnapshot) -> Result<DecimationReport> {
        let params = &self.params;
        params.validate()?;
        let view = normalized_view(&params.view_direction)?;

        let initial_vertices = snapshot.live_vertex_count();
        let initial_faces = snapshot.live_face_count();
        let target_vertices = params.target_vertex_count(initial_vertices);

        let degenerate_faces = accumulate(snapshot, params.degenerate_epsilon);
        if degenerate_faces > 0 {
            debug!(
                faces = degenerate_faces,
                "Degenerate faces contribute zero quadrics"
            );
        }

        let silhouette = classify(snapshot, &view);
        debug!(
            interior = silhouette.interior,
            silhouette = silhouette.silhouette,
            boundary = silhouette.boundary,
            non_manifold = silhouette.non_manifold,
            "Classified edges"
        );

        let mut queue = CandidateQueue::new();
        let seeded = queue.seed(snapshot, params);

        info!(
            vertices = initial_vertices,
            faces = initial_faces,
            target = target_vertices,
            candidates = seeded,
            "Starting decimation"
        );

        let mut collapses = Vec::new();
        let mut rejections = BTreeMap::new();
        let stop_reason = loop {
            if snapshot.live_vertex_count() <= target_vertices {
                break StopReason::TargetReached;
            }
            let Some(candidate) = queue.pop_live(snapshot) else {
                break StopReason::QueueExhausted;
            };
            if params.max_cost.is_some_and(|max| candidate.cost > max) {
                break StopReason::MaxCostExceeded;
            }

            match try_collapse(snapshot, &candidate) {
                CollapseOutcome::Applied(record) => {
                    trace!(
                        edge = record.edge,
                        retained = record.retained,
                        removed = record.removed,
                        cost = record.cost,
                        "Collapsed edge"
                    );
                    queue.reseed(snapshot, record.retained, params);
                    collapses.push(record);
                }
                CollapseOutcome::Discarded(reason) => {
                    *rejections.entry(reason).or_insert(0) += 1;
                }
            }
        };

        let stats = queue.stats();
        if stats.singular_solves > 0 {
            debug!(
                solves = stats.singular_solves,
                "Singular quadric systems fell back to the edge midpoint"
            );
        }

        let status = if stop_reason == StopReason::TargetReached {
            DecimationStatus::TargetReached
        } else {
            warn!(
                target = target_vertices,
                achieved = snapshot.live_vertex_count(),
                reason = ?stop_reason,
                "Target vertex count not reached"
            );
            DecimationStatus::TargetNotReached
        };

        let report = DecimationReport {
            status,
            stop_reason,
            initial_vertices,
            target_vertices,
            final_vertices: snapshot.live_vertex_count(),
            initial_faces,
            final_faces: snapshot.live_face_count(),
            silhouette,
            degenerate_faces,
            singular_solves: stats.singular_solves,
            stale_discarded: stats.stale_discarded,
            rejections,
            collapses,
        };

        info!(
            vertices = report.final_vertices,
            faces = report.final_faces,
            collapses = report.collapses_performed(),
            rejected = report.collapses_rejected(),
            "Decimation complete"
        );

        Ok(report)
    }
}

/// Decimate `mesh` by `reduction_percentage` percent of its vertices,
/// protecting silhouette edges seen along `view_direction` (+Z when `None`).
///
/// Parameters are checked first, so a bad percentage is reported even when
/// no mesh is given.
pub fn simplify<A: MeshAdapter + ?Sized>(
    mesh: Option<&mut A>,
    reduction_percentage: f64,
    view_direction: Option<Vector3d>,
) -> Result<Decimation<A::Handle>> {
    let mut params = DecimateParams::with_percentage(reduction_percentage);
    if let Some(view) = view_direction {
        params = params.with_view_direction(view);
    }
    params.validate()?;

    let adapter = mesh.ok_or_else(|| Error::InvalidInput("no mesh was given".to_string()))?;
    QuadricDecimator::new(params).decimate(adapter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxymesh_core::{MeshHost, Point3d, PolygonMesh};

    fn triangle() -> MeshHost {
        MeshHost::new(PolygonMesh::from_triangles(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(0.0, 1.0, 0.0),
            ],
            &[[0, 1, 2]],
        ))
    }

    #[test]
    fn test_missing_mesh() {
        let err = simplify::<MeshHost>(None, 50.0, None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_bad_percentage_checked_before_mesh() {
        let err = simplify::<MeshHost>(None, 150.0, None).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));

        let mut host = triangle();
        let err = simplify(Some(&mut host), f64::NAN, None).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_zero_view_direction() {
        let mut host = triangle();
        let err = simplify(Some(&mut host), 50.0, Some(Vector3d::zeros())).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_zero_percent_is_a_no_op() {
        let mut host = triangle();
        let result = simplify(Some(&mut host), 0.0, None).unwrap();
        assert!(result.report.is_complete());
        assert_eq!(result.report.collapses_performed(), 0);
        assert_eq!(result.mesh, host.into_mesh());
    }

    #[test]
    fn test_single_triangle_is_partial() {
        let mut host = triangle();
        let result = simplify(Some(&mut host), 50.0, None).unwrap();
        let report = &result.report;
        assert_eq!(report.status, DecimationStatus::TargetNotReached);
        assert_eq!(report.stop_reason, StopReason::QueueExhausted);
        assert_eq!(report.target_vertices, 2);
        assert_eq!(report.final_vertices, 3);
        assert_eq!(report.silhouette.boundary, 3);
        assert_eq!(result.mesh.vertex_count(), 3);
        assert_eq!(result.mesh.face_count(), 1);
    }
}
