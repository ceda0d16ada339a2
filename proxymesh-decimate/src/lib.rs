//! Silhouette-preserving mesh decimation
//!
//! This crate reduces a polygon mesh by collapsing edges in order of their
//! quadric error while keeping the mesh outline intact:
//! - Quadric error metrics per vertex
//! - Silhouette, boundary and non-manifold edge protection
//! - Link-condition checks before every collapse
//! - Deterministic, generation-stamped candidate queue

pub mod collapse;
pub mod decimator;
pub mod guard;
pub mod params;
pub mod quadric;
pub mod queue;
pub mod report;
pub mod silhouette;
pub mod snapshot;

pub use collapse::*;
pub use decimator::*;
pub use guard::*;
pub use params::*;
pub use quadric::*;
pub use queue::*;
pub use report::*;
pub use silhouette::*;
pub use snapshot::*;

use proxymesh_core::{MeshHost, PolygonMesh, Result};

/// Simplify a mesh by removing a share of its vertices
pub trait MeshSimplifier {
    /// Simplify mesh by the given reduction percentage (0 = no reduction, 100 = maximum reduction)
    fn simplify(&self, mesh: &PolygonMesh, reduction_percentage: f64) -> Result<PolygonMesh>;
}

impl MeshSimplifier for QuadricDecimator {
    fn simplify(&self, mesh: &PolygonMesh, reduction_percentage: f64) -> Result<PolygonMesh> {
        let params = DecimateParams {
            reduction_percentage,
            ..self.params().clone()
        };
        let mut host = MeshHost::new(mesh.clone());
        Ok(QuadricDecimator::new(params).decimate(&mut host)?.mesh)
    }
}
