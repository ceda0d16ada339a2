//! Parameters for a decimation run

use proxymesh_core::{Error, Result, Vector3d};
use serde::{Deserialize, Serialize};

use crate::silhouette::normalized_view;

/// How the cost of collapsing an edge is measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostMetric {
    /// Quadric error at the optimal merged position
    #[default]
    Quadric,
    /// Edge length, merging at the midpoint
    EdgeLength,
}

/// Parameters for one decimation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecimateParams {
    /// Share of vertices to remove, in percent (0 to 100). Default: 50
    pub reduction_percentage: f64,

    /// Direction the silhouette is computed against. Default: +Z
    pub view_direction: Vector3d,

    pub cost_metric: CostMetric,

    /// Stop once the cheapest candidate costs more than this
    pub max_cost: Option<f64>,

    /// Quadric systems with `|det|` at or below this fall back to the
    /// edge midpoint. Default: 1e-10
    pub singular_epsilon: f64,

    /// Face normals shorter than this before normalization mark the face
    /// degenerate. Default: 1e-12
    pub degenerate_epsilon: f64,
}

impl Default for DecimateParams {
    fn default() -> Self {
        Self {
            reduction_percentage: 50.0,
            view_direction: Vector3d::z(),
            cost_metric: CostMetric::Quadric,
            max_cost: None,
            singular_epsilon: 1e-10,
            degenerate_epsilon: 1e-12,
        }
    }
}

impl DecimateParams {
    /// Params removing the given percentage of vertices.
    #[must_use]
    pub fn with_percentage(percentage: f64) -> Self {
        Self {
            reduction_percentage: percentage,
            ..Default::default()
        }
    }

    /// Remove a quarter of the vertices.
    #[must_use]
    pub fn conservative() -> Self {
        Self::with_percentage(25.0)
    }

    /// Remove three quarters of the vertices.
    #[must_use]
    pub fn aggressive() -> Self {
        Self::with_percentage(75.0)
    }

    #[must_use]
    pub fn with_view_direction(mut self, view: Vector3d) -> Self {
        self.view_direction = view;
        self
    }

    #[must_use]
    pub const fn with_cost_metric(mut self, metric: CostMetric) -> Self {
        self.cost_metric = metric;
        self
    }

    #[must_use]
    pub const fn with_max_cost(mut self, max_cost: f64) -> Self {
        self.max_cost = Some(max_cost);
        self
    }

    /// Check every field, failing with [`Error::InvalidParameter`].
    pub fn validate(&self) -> Result<()> {
        let p = self.reduction_percentage;
        if !(0.0..=100.0).contains(&p) {
            return Err(Error::InvalidParameter(format!(
                "reduction percentage must be within [0, 100], got {}",
                p
            )));
        }
        normalized_view(&self.view_direction)?;
        for (name, eps) in [
            ("singular_epsilon", self.singular_epsilon),
            ("degenerate_epsilon", self.degenerate_epsilon),
        ] {
            if !(eps >= 0.0 && eps.is_finite()) {
                return Err(Error::InvalidParameter(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, eps
                )));
            }
        }
        if let Some(c) = self.max_cost {
            if c.is_nan() {
                return Err(Error::InvalidParameter("max_cost must not be NaN".to_string()));
            }
        }
        Ok(())
    }

    /// Vertex count the run aims for, `⌈initial × (100 − p) / 100⌉`
    pub fn target_vertex_count(&self, initial: usize) -> usize {
        (initial as f64 * (100.0 - self.reduction_percentage) / 100.0).ceil() as usize
    }
}
