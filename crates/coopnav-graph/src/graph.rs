//! Environment graph construction and heat mapping.
//!
//! # Construction pipeline
//!
//! ```text
//! EnvGraph::new(n, arity)          zeroed N×N distance/probability matrices
//!     .add_connections(&[...])     symmetric matrix writes + directed edge list
//!     .build_map(None)             synthesize per-edge outcome probabilities
//! ```
//!
//! A second entity's graph is usually built over the same connections but
//! with `build_map(Some(&first.map()))` so both entities share identical
//! base probabilities (with an arity-2 fold for entities that have no
//! second-chance return state).

use coopnav_core::{NodeId, PROB_DECIMALS, decimal_places, round_dp};

use crate::map::{EnvMap, Transition};
use crate::search::{Objective, PathInstance, shortest_path};
use crate::{GraphError, GraphResult};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Success scale applied to edges whose both endpoints lie on the other
/// entity's predicted path.
pub const CONTENTION_SCALE_FULL: f64 = 0.5;

/// Success scale applied to edges with exactly one endpoint on that path.
pub const CONTENTION_SCALE_PARTIAL: f64 = 0.90;

/// Retry budget for the outcome-split stability loop.
const MAX_SPLIT_ATTEMPTS: u32 = 16;

// ── OutcomeArity ──────────────────────────────────────────────────────────────

/// Number of outcome classes modeled per edge.
///
/// [`Two`](OutcomeArity::Two) folds the return mass into fail — used for
/// entities with no second-chance retry semantics (the human).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeArity {
    Two,
    Three,
}

// ── Connection ────────────────────────────────────────────────────────────────

/// One raw undirected connection from a layout definition.  The reverse
/// direction is synthesized by [`EnvGraph::add_connections`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: NodeId,
    pub b: NodeId,
    pub distance: f64,
    /// Probability the edge is traversed successfully.  `None` for
    /// distance-only layouts; the move is then treated as certain.
    pub success: Option<f64>,
}

impl Connection {
    pub fn new(a: u32, b: u32, distance: f64, success: f64) -> Self {
        Self { a: NodeId(a), b: NodeId(b), distance, success: Some(success) }
    }
}

// ── EnvGraph ──────────────────────────────────────────────────────────────────

/// The environment an entity navigates: static topology plus its own base
/// map of per-edge outcome probabilities.
///
/// The base map is immutable after [`build_map`](Self::build_map); per-step
/// contention adjustments happen on owned copies via
/// [`heat_map`](Self::heat_map).
#[derive(Debug, Clone)]
pub struct EnvGraph {
    node_count: usize,
    arity: OutcomeArity,
    /// Row-major `N×N` symmetric distance matrix.  0 = no edge.
    dist: Vec<f64>,
    /// Row-major `N×N` symmetric success-probability matrix.
    prob: Vec<f64>,
    /// Directed edge list: the raw connections plus synthesized reverses.
    connections: Vec<(NodeId, NodeId)>,
    map: EnvMap,
}

impl EnvGraph {
    pub fn new(node_count: usize, arity: OutcomeArity) -> Self {
        Self {
            node_count,
            arity,
            dist: vec![0.0; node_count * node_count],
            prob: vec![0.0; node_count * node_count],
            connections: Vec::new(),
            map: EnvMap::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn arity(&self) -> OutcomeArity {
        self.arity
    }

    /// The immutable base map.  Empty until [`build_map`](Self::build_map).
    pub fn map(&self) -> &EnvMap {
        &self.map
    }

    /// Directed edge list (both directions of every connection).
    pub fn connections(&self) -> &[(NodeId, NodeId)] {
        &self.connections
    }

    /// Every node label `1..=N`.
    pub fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (1..=self.node_count as u32).map(NodeId)
    }

    #[inline]
    fn cell(&self, from: NodeId, to: NodeId) -> usize {
        from.offset() * self.node_count + to.offset()
    }

    fn check_node(&self, node: NodeId) -> GraphResult<()> {
        if node.0 == 0 || node.0 as usize > self.node_count {
            return Err(GraphError::NodeOutOfRange { node, node_count: self.node_count });
        }
        Ok(())
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Write each connection into the distance (and, when present,
    /// probability) matrices symmetrically, and record the directed edge
    /// list with the reverse of every connection synthesized.
    pub fn add_connections(&mut self, connections: &[Connection]) -> GraphResult<()> {
        for c in connections {
            self.check_node(c.a)?;
            self.check_node(c.b)?;

            let (ab, ba) = (self.cell(c.a, c.b), self.cell(c.b, c.a));
            self.dist[ab] = c.distance;
            self.dist[ba] = c.distance;
            if let Some(p) = c.success {
                self.prob[ab] = p;
                self.prob[ba] = p;
            }
        }

        // The raw list supplies one direction per connection; complete every
        // edge by appending the reversals.
        self.connections.extend(connections.iter().map(|c| (c.a, c.b)));
        self.connections.extend(connections.iter().map(|c| (c.b, c.a)));
        Ok(())
    }

    /// Build the base map.
    ///
    /// With no base given, outcome probabilities are synthesized per edge
    /// from the stored success probability (see [`split_remainder`]).  With
    /// a base map, it is deep-copied; either way an arity-2 graph folds the
    /// return mass into fail.
    pub fn build_map(&mut self, base: Option<&EnvMap>) -> GraphResult<()> {
        let mut map = match base {
            Some(existing) => existing.clone(),
            None => self.synthesize_map()?,
        };

        if self.arity == OutcomeArity::Two {
            fold_return_into_fail(&mut map);
        }

        self.map = map;
        Ok(())
    }

    fn synthesize_map(&self) -> GraphResult<EnvMap> {
        let has_probs = self.prob.iter().any(|&p| p > 0.0);
        let mut map = EnvMap::new();

        for from in self.all_nodes() {
            map.touch(from);
            for to in self.all_nodes() {
                let distance = self.dist[self.cell(from, to)];
                if distance == 0.0 {
                    continue;
                }
                let transition = if has_probs {
                    let success = self.prob[self.cell(from, to)];
                    let (ret, fail) = split_remainder(success)?;
                    Transition { distance, success, ret, fail }
                } else {
                    Transition::certain(distance)
                };
                map.insert(from, to, transition);
            }
        }
        Ok(map)
    }

    // ── Heat mapping ──────────────────────────────────────────────────────

    /// Derive a contention-adjusted copy of the base map from the other
    /// entity's remaining predicted path and current position.
    ///
    /// - Both endpoints on the path: success scaled by `scale_full`, the
    ///   removed mass redistributed two-thirds to return, one-third to fail.
    /// - One endpoint on the path: same redistribution with `scale_partial`.
    /// - Any edge touching the other entity's position or its next step is
    ///   forced to `success = 0, ret = 1, fail = 0` (hard block) — evaluated
    ///   last, overriding the scaling rules.
    pub fn heat_map(
        &self,
        other_path: &[NodeId],
        other_position: NodeId,
        scale_full: f64,
        scale_partial: f64,
    ) -> EnvMap {
        let mut heat = self.map.clone();

        // The node the other entity is predicted to move to this step.
        let next_step = match other_path {
            [] => None,
            [only] => Some(*only),
            [_, next, ..] => Some(*next),
        };

        for &(a, b) in &self.connections {
            let Some(t) = heat.get_mut(a, b) else { continue };

            let on_a = other_path.contains(&a);
            let on_b = other_path.contains(&b);
            let scale = match (on_a, on_b) {
                (true, true) => Some(scale_full),
                (true, false) | (false, true) => Some(scale_partial),
                (false, false) => None,
            };

            if let Some(s) = scale {
                let kept = round_dp(t.success * s, PROB_DECIMALS);
                let removed = round_dp(t.success * (1.0 - s), PROB_DECIMALS);
                let share = round_dp(removed / 3.0, PROB_DECIMALS);
                t.success = kept;
                t.ret += share * 2.0;
                t.fail += share;
            }

            let blocked = a == other_position
                || b == other_position
                || next_step.is_some_and(|n| a == n || b == n);
            if blocked {
                t.success = 0.0;
                t.ret = 1.0;
                t.fail = 0.0;
            }
        }
        heat
    }

    // ── Path search ───────────────────────────────────────────────────────

    /// Shortest path over the base map.  For heat-mapped queries call
    /// [`shortest_path`] with the derived map directly.
    pub fn shortest_path(
        &self,
        start: NodeId,
        goal: NodeId,
        objective: Objective,
    ) -> GraphResult<PathInstance> {
        shortest_path(&self.map, start, goal, objective)
    }
}

// ── Outcome synthesis ─────────────────────────────────────────────────────────

/// Split `1 - success` between the return and fail states.
///
/// The return state takes the larger share (an entity blocked on an edge
/// should usually get another attempt rather than break).  The split is
/// re-derived at increasing decimal precision until the three masses sum to
/// exactly 1 at that precision; exhausting the retry budget is a
/// [`GraphError::ProbabilitySynthesis`].
pub fn split_remainder(success: f64) -> GraphResult<(f64, f64)> {
    let mut dp = decimal_places(success, 8) + 2;

    for _ in 0..MAX_SPLIT_ATTEMPTS {
        let remainder = round_dp(1.0 - success, dp);
        let (ret, fail) = (remainder, 0.0);

        if round_dp(success + ret + fail, dp) == 1.0 {
            return Ok((ret, fail));
        }
        dp += 1;
    }
    Err(GraphError::ProbabilitySynthesis { success })
}

/// Fold the return mass of every transition into fail (arity-2 semantics).
fn fold_return_into_fail(map: &mut EnvMap) {
    let edges: Vec<(NodeId, NodeId)> = map.edges().map(|(a, b, _)| (a, b)).collect();
    for (a, b) in edges {
        if let Some(t) = map.get_mut(a, b) {
            t.fail = round_dp(t.fail + t.ret, PROB_DECIMALS);
            t.ret = 0.0;
        }
    }
}
