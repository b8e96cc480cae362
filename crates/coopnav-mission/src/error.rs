//! Mission-planner error type.

use thiserror::Error;

use coopnav_graph::GraphError;

/// Errors produced by `coopnav-mission`.
#[derive(Debug, Error)]
pub enum MissionError {
    /// The task list does not end with an ordered task, so the final phase
    /// has no end node.
    #[error("task list does not terminate with an ordered task")]
    MissingPhaseEnd,

    /// A phase accumulated more unordered tasks than the permutation budget
    /// allows.
    #[error("phase holds {count} unordered tasks, budget is {max}")]
    TooManyUnordered { count: usize, max: usize },

    /// A phase produced no candidate orderings to solve over.
    #[error("phase {phase} has no candidate orderings")]
    EmptyPhase { phase: usize },

    /// A mission cannot be generated over a map with no nodes.
    #[error("cannot generate a mission over an empty map")]
    EmptyEnvironment,

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type MissionResult<T> = Result<T, MissionError>;
