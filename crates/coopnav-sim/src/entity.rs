//! Navigating entities and their path bookkeeping.

use coopnav_core::NodeId;
use coopnav_graph::{EnvGraph, PathInstance};

// ── PathSet ───────────────────────────────────────────────────────────────────

/// The three named path instances an entity carries, plus completed paths.
#[derive(Debug, Clone)]
pub struct PathSet {
    /// The path the entity is walking.
    pub selected: PathInstance,
    pub min_distance: PathInstance,
    pub max_probability: PathInstance,
    /// Completed paths, archived in order.
    pub history: Vec<Vec<NodeId>>,
}

impl PathSet {
    pub fn new() -> Self {
        Self {
            selected: PathInstance::empty(),
            min_distance: PathInstance::empty(),
            max_probability: PathInstance::empty(),
            history: Vec::new(),
        }
    }
}

impl Default for PathSet {
    fn default() -> Self {
        Self::new()
    }
}

// ── Entity ────────────────────────────────────────────────────────────────────

/// One navigating entity: its environment graph, current node, and paths.
#[derive(Debug, Clone)]
pub struct Entity {
    pub graph: EnvGraph,
    pub position: NodeId,
    pub paths: PathSet,
}

impl Entity {
    pub fn new(graph: EnvGraph, position: NodeId) -> Self {
        Self { graph, position, paths: PathSet::new() }
    }

    /// Drop path state for a fresh episode, keeping the graph.
    pub fn reset(&mut self, position: NodeId) {
        self.position = position;
        self.paths = PathSet::new();
    }
}
