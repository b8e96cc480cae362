//! Adjacency map: node → neighbor → transition attributes.
//!
//! # Data layout
//!
//! `EnvMap` nests two `BTreeMap`s keyed by `NodeId`.  Ordered maps (rather
//! than hash maps) keep neighbor iteration deterministic, which in turn
//! makes Dijkstra tie-breaking and every seeded simulation run
//! reproducible bit-for-bit.
//!
//! Two maps coexist per entity: the **base map**, immutable after
//! construction, and a transient **heat map** derived from it each step
//! (see [`EnvGraph::heat_map`][crate::EnvGraph::heat_map]).  A heat map is
//! a freshly owned value; it never aliases back into the base map.

use std::collections::BTreeMap;

use coopnav_core::{NodeId, PROB_EPSILON};

// ── Transition ────────────────────────────────────────────────────────────────

/// Attributes of one directed edge.
///
/// Once probabilities are populated, `success + ret + fail = 1` within
/// [`PROB_EPSILON`].  A hard-blocked edge is `success = 0, ret = 1,
/// fail = 0`: the entity re-attempts in place rather than moving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Physical edge length.  Non-negative.
    pub distance: f64,
    /// Probability the move succeeds.
    pub success: f64,
    /// Probability the entity bounces back to the source node (may retry).
    pub ret: f64,
    /// Probability of catastrophic failure.
    pub fail: f64,
}

impl Transition {
    /// A distance-only transition: the move always succeeds.
    pub fn certain(distance: f64) -> Self {
        Self { distance, success: 1.0, ret: 0.0, fail: 0.0 }
    }

    /// Sum of the three outcome masses (should be 1).
    #[inline]
    pub fn outcome_sum(&self) -> f64 {
        self.success + self.ret + self.fail
    }

    /// `true` when the outcome masses sum to 1 within tolerance.
    #[inline]
    pub fn is_normalized(&self) -> bool {
        (self.outcome_sum() - 1.0).abs() <= PROB_EPSILON
    }
}

// ── EnvMap ────────────────────────────────────────────────────────────────────

/// Node → neighbor → [`Transition`] adjacency, the shared currency between
/// the graph engine, the mission planner, and the simulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvMap {
    inner: BTreeMap<NodeId, BTreeMap<NodeId, Transition>>,
}

impl EnvMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes with at least one outgoing edge.
    pub fn node_count(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.inner.contains_key(&node)
    }

    /// All nodes in ascending label order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.keys().copied()
    }

    /// Outgoing transitions of `node` in ascending neighbor order.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, &Transition)> + '_ {
        self.inner
            .get(&node)
            .into_iter()
            .flat_map(|m| m.iter().map(|(&n, t)| (n, t)))
    }

    /// Neighbor labels of `node` (used for unscripted moves).
    pub fn neighbor_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.neighbors(node).map(|(n, _)| n).collect()
    }

    pub fn get(&self, from: NodeId, to: NodeId) -> Option<&Transition> {
        self.inner.get(&from).and_then(|m| m.get(&to))
    }

    pub fn get_mut(&mut self, from: NodeId, to: NodeId) -> Option<&mut Transition> {
        self.inner.get_mut(&from).and_then(|m| m.get_mut(&to))
    }

    /// Insert or overwrite the `from → to` transition.
    pub fn insert(&mut self, from: NodeId, to: NodeId, transition: Transition) {
        self.inner.entry(from).or_default().insert(to, transition);
    }

    /// Ensure `node` exists even with no outgoing edges yet.
    pub fn touch(&mut self, node: NodeId) {
        self.inner.entry(node).or_default();
    }

    /// All directed edges as `(from, to, &Transition)` in deterministic order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &Transition)> + '_ {
        self.inner
            .iter()
            .flat_map(|(&from, m)| m.iter().map(move |(&to, t)| (from, to, t)))
    }
}
