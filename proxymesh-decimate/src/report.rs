//! Outcome of a decimation run

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::collapse::CollapseRecord;
use crate::guard::RejectReason;
use crate::silhouette::SilhouetteSummary;

/// Whether the run reached its target vertex count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecimationStatus {
    TargetReached,
    /// Partial success: the mesh was reduced as far as the run allowed
    TargetNotReached,
}

/// Why the collapse loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopReason {
    TargetReached,
    QueueExhausted,
    MaxCostExceeded,
}

/// Statistics and collapse history of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecimationReport {
    pub status: DecimationStatus,
    pub stop_reason: StopReason,
    pub initial_vertices: usize,
    pub target_vertices: usize,
    pub final_vertices: usize,
    pub initial_faces: usize,
    pub final_faces: usize,
    pub silhouette: SilhouetteSummary,
    pub degenerate_faces: usize,
    pub singular_solves: usize,
    pub stale_discarded: usize,
    pub rejections: BTreeMap<RejectReason, usize>,
    pub collapses: Vec<CollapseRecord>,
}

impl DecimationReport {
    pub fn collapses_performed(&self) -> usize {
        self.collapses.len()
    }

    pub fn collapses_rejected(&self) -> usize {
        self.rejections.values().sum()
    }

    pub fn rejected(&self, reason: RejectReason) -> usize {
        self.rejections.get(&reason).copied().unwrap_or(0)
    }

    /// Percentage of vertices actually removed
    pub fn achieved_percentage(&self) -> f64 {
        if self.initial_vertices == 0 {
            0.0
        } else {
            (self.initial_vertices - self.final_vertices) as f64 * 100.0
                / self.initial_vertices as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == DecimationStatus::TargetReached
    }
}

impl fmt::Display for DecimationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Decimation: {} → {} vertices (target {}, {:.1}% reduction), {} → {} faces, {} collapses, {} rejected",
            self.initial_vertices,
            self.final_vertices,
            self.target_vertices,
            self.achieved_percentage(),
            self.initial_faces,
            self.final_faces,
            self.collapses_performed(),
            self.collapses_rejected()
        )
    }
}

/// Decimated mesh handle and the report of the run that produced it
#[derive(Debug, Clone)]
pub struct Decimation<H> {
    pub mesh: H,
    pub report: DecimationReport,
}
