//! Simulation error type, aggregating the lower layers.

use thiserror::Error;

use coopnav_graph::GraphError;
use coopnav_mission::MissionError;

use crate::validator::ValidatorError;

/// Errors that abort an episode.
///
/// These are fatal conditions, distinct from the in-model failure outcomes
/// tracked by [`FailureCause`](crate::FailureCause): a failed mission is a
/// valid simulation result, an error is not.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Mission(#[from] MissionError),

    #[error(transparent)]
    Validator(#[from] ValidatorError),

    /// Every node in the environment is forbidden, so the human cannot be
    /// redirected anywhere.
    #[error("no node available for human redirection")]
    NoAvailableRedirect,

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type SimResult<T> = Result<T, SimError>;
