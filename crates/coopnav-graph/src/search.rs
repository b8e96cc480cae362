//! Dual-objective Dijkstra search and the path instance it produces.
//!
//! # Objectives
//!
//! - [`MinimizeDistance`](Objective::MinimizeDistance): standard
//!   non-negative relaxation over `Transition::distance`.
//! - [`MaximizeProbability`](Objective::MaximizeProbability): relaxation of
//!   a multiplicative score seeded at 1.0 on the start node; per-edge
//!   weight is `Transition::success`, with zero-success edges given a
//!   nominal [`BLOCKED_EDGE_NOMINAL`] weight so one-way routes with no
//!   alternative remain traversable at a very poor chance.
//!
//! Both modes reconstruct the path by backtracking predecessor pointers,
//! then compute the *secondary* metric along the reconstructed path
//! (path probability when minimizing distance, hop-sum distance when
//! maximizing probability).

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};

use coopnav_core::NodeId;

use crate::map::EnvMap;
use crate::{GraphError, GraphResult};

/// Nominal success weight for zero-success edges in probability search.
pub const BLOCKED_EDGE_NOMINAL: f64 = 0.05;

// ── Objective ─────────────────────────────────────────────────────────────────

/// The quantity a path search optimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    MinimizeDistance,
    MaximizeProbability,
}

// ── PathInstance ──────────────────────────────────────────────────────────────

/// A concrete path through the environment plus the progress an entity has
/// made along it.
///
/// Three named instances exist per entity: `min_distance`,
/// `max_probability`, and `selected` (a copy of one of the former, possibly
/// exchanged for the other after external validation).
#[derive(Debug, Clone, PartialEq)]
pub struct PathInstance {
    /// Node sequence from start to goal inclusive.
    pub nodes: Vec<NodeId>,
    /// Current offset into `nodes`.
    pub index: usize,
    /// Consecutive return outcomes on the current edge.
    pub return_count: u32,
    /// Total path distance.
    pub length: f64,
    /// One-shot success probability estimate from the search.
    pub probability: f64,
    /// Probability from the external validation oracle, when requested.
    pub validated: Option<f64>,
    /// Cumulative distance after each hop (`nodes.len() - 1` entries).
    pub cumulative: Vec<f64>,
    /// Set when the owning entity left the path with an unscripted move.
    pub off_path: bool,
}

impl PathInstance {
    pub fn new(nodes: Vec<NodeId>, length: f64, probability: f64) -> Self {
        Self {
            nodes,
            index: 0,
            return_count: 0,
            length,
            probability,
            validated: None,
            cumulative: Vec::new(),
            off_path: false,
        }
    }

    /// A placeholder with no nodes; entities start with one before their
    /// first path selection.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0.0, 0.0)
    }

    /// Node at the current offset.
    pub fn current(&self) -> Option<NodeId> {
        self.nodes.get(self.index).copied()
    }

    /// Node one step ahead of the current offset.
    pub fn next(&self) -> Option<NodeId> {
        self.nodes.get(self.index + 1).copied()
    }

    /// Final node of the path.
    pub fn terminal(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// `true` once the current offset sits on the final node.
    pub fn at_end(&self) -> bool {
        self.index + 1 >= self.nodes.len()
    }

    /// The not-yet-traversed suffix, current node included.
    pub fn remaining(&self) -> &[NodeId] {
        &self.nodes[self.index.min(self.nodes.len())..]
    }

    /// Rebuild the per-hop cumulative distance vector from `map`.
    ///
    /// ```text
    /// nodes      n1 ──3── n2 ──2── n3 ──4── n4
    /// cumulative      3        5        9
    /// ```
    pub fn rebuild_cumulative(&mut self, map: &EnvMap) {
        self.cumulative.clear();
        let mut total = 0.0;
        for pair in self.nodes.windows(2) {
            if let Some(t) = map.get(pair[0], pair[1]) {
                total += t.distance;
            }
            self.cumulative.push(total);
        }
    }
}

// ── Heap key ──────────────────────────────────────────────────────────────────

/// Heap entry ordered by score, then node label for deterministic
/// tie-breaking.  `f64::total_cmp` gives a total order (scores here are
/// never NaN).
#[derive(PartialEq)]
struct HeapKey(f64, NodeId);

impl Eq for HeapKey {}

impl PartialOrd for HeapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0).then(self.1.cmp(&other.1))
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

/// Dijkstra-family search over `map` by the given objective.
///
/// Fails with [`GraphError::NoPathFound`] when the predecessor chain from
/// `goal` back to `start` is incomplete.  `start == goal` yields the
/// single-node path with length 0 and probability 1.
pub fn shortest_path(
    map: &EnvMap,
    start: NodeId,
    goal: NodeId,
    objective: Objective,
) -> GraphResult<PathInstance> {
    if !map.contains_node(start) || !map.contains_node(goal) {
        return Err(GraphError::NoPathFound { from: start, to: goal });
    }
    if start == goal {
        return Ok(PathInstance::new(vec![start], 0.0, 1.0));
    }

    let (score, prev) = match objective {
        Objective::MinimizeDistance => relax_distance(map, start),
        Objective::MaximizeProbability => relax_probability(map, start),
    };

    let nodes = backtrack(&prev, start, goal)?;

    // Primary metric comes from the relaxation; the secondary one is
    // evaluated along the reconstructed path.
    let (length, probability) = match objective {
        Objective::MinimizeDistance => {
            let mut probability = 1.0;
            for pair in nodes.windows(2) {
                let t = hop(map, pair[0], pair[1], start, goal)?;
                probability *= t.success + t.ret;
            }
            (score[&goal], probability)
        }
        Objective::MaximizeProbability => {
            let mut length = 0.0;
            for pair in nodes.windows(2) {
                length += hop(map, pair[0], pair[1], start, goal)?.distance;
            }
            (length, score[&goal])
        }
    };

    Ok(PathInstance::new(nodes, length, probability))
}

/// Standard min-cost relaxation over edge distances.
fn relax_distance(map: &EnvMap, start: NodeId) -> (BTreeMap<NodeId, f64>, BTreeMap<NodeId, NodeId>) {
    let mut best: BTreeMap<NodeId, f64> = map.nodes().map(|n| (n, f64::INFINITY)).collect();
    let mut prev: BTreeMap<NodeId, NodeId> = BTreeMap::new();
    best.insert(start, 0.0);

    let mut heap: BinaryHeap<Reverse<HeapKey>> = BinaryHeap::new();
    heap.push(Reverse(HeapKey(0.0, start)));

    while let Some(Reverse(HeapKey(cost, node))) = heap.pop() {
        // Skip stale heap entries.
        if cost > best[&node] {
            continue;
        }
        for (neighbor, t) in map.neighbors(node) {
            let new_cost = cost + t.distance;
            if new_cost < best[&neighbor] {
                best.insert(neighbor, new_cost);
                prev.insert(neighbor, node);
                heap.push(Reverse(HeapKey(new_cost, neighbor)));
            }
        }
    }
    (best, prev)
}

/// Max-product relaxation over edge success probabilities.
///
/// A neighbor's score only updates on strict improvement, so the first
/// equal-scoring route discovered wins.
fn relax_probability(map: &EnvMap, start: NodeId) -> (BTreeMap<NodeId, f64>, BTreeMap<NodeId, NodeId>) {
    let mut best: BTreeMap<NodeId, f64> = map.nodes().map(|n| (n, 0.0)).collect();
    let mut prev: BTreeMap<NodeId, NodeId> = BTreeMap::new();
    best.insert(start, 1.0);

    let mut heap: BinaryHeap<HeapKey> = BinaryHeap::new();
    heap.push(HeapKey(1.0, start));

    while let Some(HeapKey(score, node)) = heap.pop() {
        if score < best[&node] {
            continue;
        }
        for (neighbor, t) in map.neighbors(node) {
            let weight = if t.success == 0.0 { BLOCKED_EDGE_NOMINAL } else { t.success };
            let new_score = score * weight;
            if new_score > best[&neighbor] {
                best.insert(neighbor, new_score);
                prev.insert(neighbor, node);
                heap.push(HeapKey(new_score, neighbor));
            }
        }
    }
    (best, prev)
}

/// Walk predecessor pointers from `goal` back to `start`, then reverse.
fn backtrack(
    prev: &BTreeMap<NodeId, NodeId>,
    start: NodeId,
    goal: NodeId,
) -> GraphResult<Vec<NodeId>> {
    let mut nodes = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        match prev.get(&cursor) {
            Some(&p) => {
                nodes.push(p);
                cursor = p;
            }
            None => return Err(GraphError::NoPathFound { from: start, to: goal }),
        }
    }
    nodes.reverse();
    Ok(nodes)
}

fn hop<'m>(
    map: &'m EnvMap,
    from: NodeId,
    to: NodeId,
    start: NodeId,
    goal: NodeId,
) -> GraphResult<&'m crate::map::Transition> {
    map.get(from, to)
        .ok_or(GraphError::NoPathFound { from: start, to: goal })
}
