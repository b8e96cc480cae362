//! Per-step and per-episode result records.

use coopnav_core::{EpisodeId, NodeId};

use crate::state::{FailureCause, StepState};

/// Everything logged about one simulation step.
///
/// Probabilities are the raw per-outcome masses of the edge the agent
/// attempted (zero while waiting); `draw` is the uniform sample the
/// outcome was decided with, absent while waiting.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub step: u32,
    pub agent_before: NodeId,
    pub agent_intended: Option<NodeId>,
    pub agent_after: NodeId,
    pub p_success: f64,
    pub p_return: f64,
    pub p_fail: f64,
    pub draw: Option<f64>,
    pub agent_state: StepState,
    pub human_before: NodeId,
    pub human_predicted: NodeId,
    pub human_after: NodeId,
    pub human_state: StepState,
}

/// Terminal result of one episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeSummary {
    pub episode: EpisodeId,
    /// `true` only when every phase completed; a `max_steps` timeout leaves
    /// both `completed` and `failure` unset.
    pub completed: bool,
    pub steps: u32,
    pub failure: Option<FailureCause>,
}
