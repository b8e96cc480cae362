//! Graph-subsystem error type.

use thiserror::Error;

use coopnav_core::NodeId;

/// Errors produced by `coopnav-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The goal is unreachable in the queried map.  Fatal to the current
    /// step; callers must propagate this, never substitute a no-op path.
    #[error("no path found from node {from} to node {to}")]
    NoPathFound { from: NodeId, to: NodeId },

    /// The outcome split for an edge could not be made to sum to 1 within
    /// the retry budget.  Fatal at map-construction time.
    #[error("could not synthesize outcome probabilities for success = {success}")]
    ProbabilitySynthesis { success: f64 },

    #[error("node {node} outside environment of {node_count} nodes")]
    NodeOutOfRange { node: NodeId, node_count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("layout parse error: {0}")]
    Parse(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
