//! Priority queue of edge-collapse candidates
//!
//! Keys are never updated in place. When an edge's cost changes its
//! generation is bumped and a fresh candidate is pushed; the old entry stays
//! in the heap and is thrown away when it surfaces.

use priority_queue::PriorityQueue;
use proxymesh_core::{midpoint, Point3d};
use std::cmp::Ordering;

use crate::params::{CostMetric, DecimateParams};
use crate::quadric::Quadric;
use crate::snapshot::{EdgeId, Generation, MeshSnapshot, VertexId};

/// Cost of collapsing an edge and the position the merged vertex takes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollapseCost {
    pub cost: f64,
    pub target: Point3d,
    /// The quadric system was singular and the midpoint was used
    pub singular: bool,
}

/// Cost of merging `u` and `v`.
///
/// With [`CostMetric::Quadric`] the target minimizes `Qu + Qv`, falling back
/// to the midpoint when the system is singular, and the cost is the combined
/// quadric evaluated at the target. Round-off below zero is clamped to zero.
/// With [`CostMetric::EdgeLength`] the target is the midpoint and the cost
/// is the edge length.
pub fn collapse_cost(
    pu: &Point3d,
    pv: &Point3d,
    qu: &Quadric,
    qv: &Quadric,
    metric: CostMetric,
    singular_epsilon: f64,
) -> CollapseCost {
    match metric {
        CostMetric::Quadric => {
            let q = *qu + *qv;
            let (target, singular) = match q.minimizer(singular_epsilon) {
                Some(p) => (p, false),
                None => (midpoint(pu, pv), true),
            };
            // Also maps -0.0 to 0.0 so ties compare equal under total_cmp
            let cost = q.evaluate(&target);
            CollapseCost {
                cost: if cost > 0.0 { cost } else { 0.0 },
                target,
                singular,
            }
        }
        CostMetric::EdgeLength => CollapseCost {
            cost: (pv - pu).norm(),
            target: midpoint(pu, pv),
            singular: false,
        },
    }
}

/// Cost of collapsing a snapshot edge with the endpoints' current state
pub fn edge_cost(snapshot: &MeshSnapshot, edge: EdgeId, params: &DecimateParams) -> CollapseCost {
    let (u, v) = snapshot.edge(edge).vertices;
    let (vu, vv) = (snapshot.vertex(u), snapshot.vertex(v));
    collapse_cost(
        &vu.position,
        &vv.position,
        &vu.quadric,
        &vv.quadric,
        params.cost_metric,
        params.singular_epsilon,
    )
}

/// A queued collapse, valid only while its generation matches the edge's
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub edge: EdgeId,
    pub cost: f64,
    pub target: Point3d,
    pub generation: Generation,
}

/// Heap priority. Higher priority means lower cost, then lower edge id,
/// then newer generation, which gives a total order.
#[derive(Debug, Clone, Copy)]
struct Priority {
    cost: f64,
    edge: EdgeId,
    generation: Generation,
    target: Point3d,
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Priority {}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.edge.cmp(&self.edge))
            .then_with(|| self.generation.cmp(&other.generation))
    }
}

/// Counters kept by the queue over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub pushed: usize,
    pub stale_discarded: usize,
    pub singular_solves: usize,
}

/// Min-cost queue with lazy invalidation by generation stamp
#[derive(Debug, Default)]
pub struct CandidateQueue {
    heap: PriorityQueue<(EdgeId, Generation), Priority>,
    stats: QueueStats,
}

impl CandidateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries currently in the heap, stale ones included
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn stats(&self) -> QueueStats {
        self.stats
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.heap.push(
            (candidate.edge, candidate.generation),
            Priority {
                cost: candidate.cost,
                edge: candidate.edge,
                generation: candidate.generation,
                target: candidate.target,
            },
        );
        self.stats.pushed += 1;
    }

    /// Compute and cache an edge's cost at its current generation, then
    /// enqueue it unless it is protected
    fn evaluate(&mut self, snapshot: &mut MeshSnapshot, edge: EdgeId, params: &DecimateParams) {
        let cost = edge_cost(snapshot, edge, params);
        if cost.singular {
            self.stats.singular_solves += 1;
        }
        let e = &mut snapshot.edges[edge];
        e.cached = Some(cost);
        if !e.protected {
            let generation = e.generation;
            self.push(Candidate {
                edge,
                cost: cost.cost,
                target: cost.target,
                generation,
            });
        }
    }

    /// Push one candidate for every live, non-protected edge. Returns the
    /// number of candidates pushed.
    pub fn seed(&mut self, snapshot: &mut MeshSnapshot, params: &DecimateParams) -> usize {
        let before = self.stats.pushed;
        for edge in 0..snapshot.edges.len() {
            if snapshot.edges[edge].removed || snapshot.edges[edge].protected {
                continue;
            }
            self.evaluate(snapshot, edge, params);
        }
        self.stats.pushed - before
    }

    /// Refresh every live edge around a vertex whose position or quadric
    /// changed: bump its generation, recompute its cost and push it again.
    pub fn reseed(&mut self, snapshot: &mut MeshSnapshot, vertex: VertexId, params: &DecimateParams) {
        let edges: Vec<EdgeId> = snapshot.edges_of(vertex).collect();
        for edge in edges {
            snapshot.edges[edge].generation += 1;
            self.evaluate(snapshot, edge, params);
        }
    }

    /// Pop the cheapest candidate that is still current.
    ///
    /// Entries for removed edges or older generations are discarded.
    pub fn pop_live(&mut self, snapshot: &MeshSnapshot) -> Option<Candidate> {
        while let Some(((edge, generation), priority)) = self.heap.pop() {
            let e = snapshot.edge(edge);
            if e.removed || e.generation != generation {
                self.stats.stale_discarded += 1;
                continue;
            }
            return Some(Candidate {
                edge,
                cost: priority.cost,
                target: priority.target,
                generation,
            });
        }
        None
    }
}
