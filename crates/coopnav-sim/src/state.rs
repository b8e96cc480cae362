//! Per-step outcomes and mission progress state.

use std::collections::VecDeque;
use std::fmt;

use coopnav_core::NodeId;
use coopnav_mission::MissionPlan;

// ── StepState ─────────────────────────────────────────────────────────────────

/// Outcome tag of one entity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// Agent traversed the intended edge.
    Success,
    /// Agent bounced back to the source node.
    Return,
    /// Agent suffered a catastrophic failure.
    Fail,
    /// Entity held position (low confidence, or idle human).
    Hold,
    /// Agent's phase is done; it waits on the human.
    Wait,
    /// Agent requested the human move to a safe node this step.
    Redirect,
    /// Human left the predicted path with a random move.
    Creative,
    /// Human advanced along its predicted path.
    Predicted,
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepState::Success => "Success",
            StepState::Return => "Return",
            StepState::Fail => "Fail",
            StepState::Hold => "Hold",
            StepState::Wait => "Wait",
            StepState::Redirect => "Redirect",
            StepState::Creative => "Creative",
            StepState::Predicted => "Predicted",
        };
        f.write_str(s)
    }
}

// ── FailureCause ──────────────────────────────────────────────────────────────

/// Why a mission failed.  Distinct causes so batch statistics can separate
/// hard failures from cooperation breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// A catastrophic edge outcome.
    Fail,
    /// Five consecutive return outcomes on the same edge.
    RepeatedReturns,
    /// The agent held position for ten steps without recovering.
    Stuck,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureCause::Fail => "Fail",
            FailureCause::RepeatedReturns => "RepeatedReturns",
            FailureCause::Stuck => "Stuck",
        };
        f.write_str(s)
    }
}

// ── MissionState ──────────────────────────────────────────────────────────────

/// The agent's progress through its mission plan.
///
/// Mutated only by the episode step function; everything else reads.
/// `phase_index` and `task_index` are 1-based to match how phase and task
/// counts are reported.
#[derive(Debug, Clone)]
pub struct MissionState {
    pub plan: MissionPlan,
    /// Current phase's selected task ordering (start, tasks.., end).
    pub active_tasks: Vec<NodeId>,
    pub phase_index: usize,
    pub task_index: usize,
    pub total_tasks_done: usize,
    pub phase_complete: bool,
    pub complete: bool,
    pub failed: Option<FailureCause>,
    /// Consecutive steps the agent held position.
    pub stuck_count: u32,
    pub n_phase: usize,
}

impl MissionState {
    pub fn new(plan: MissionPlan) -> Self {
        let n_phase = plan.phase_count();
        Self {
            plan,
            active_tasks: Vec::new(),
            phase_index: 1,
            task_index: 1,
            total_tasks_done: 0,
            phase_complete: true,
            complete: false,
            failed: None,
            stuck_count: 0,
            n_phase,
        }
    }

    /// The node the agent is currently tasked to reach.
    pub fn current_target(&self) -> Option<NodeId> {
        self.active_tasks.get(self.task_index).copied()
    }

    /// Phase tasks not yet completed, current target included.
    pub fn remaining_tasks(&self) -> &[NodeId] {
        &self.active_tasks[self.task_index.min(self.active_tasks.len())..]
    }

    /// Terminal once the mission completed or failed.
    pub fn is_terminal(&self) -> bool {
        self.complete || self.failed.is_some()
    }
}

// ── HumanState ────────────────────────────────────────────────────────────────

/// The human's delegated-task queue for the current phase.
#[derive(Debug, Clone, Default)]
pub struct HumanState {
    pub tasks: VecDeque<NodeId>,
    pub phase_complete: bool,
}

impl HumanState {
    pub fn new() -> Self {
        Self { tasks: VecDeque::new(), phase_complete: true }
    }

    pub fn current_target(&self) -> Option<NodeId> {
        self.tasks.front().copied()
    }

    /// Replace the queue for a new phase (or a redirect request).
    pub fn assign(&mut self, tasks: impl IntoIterator<Item = NodeId>) {
        self.tasks = tasks.into_iter().collect();
        self.phase_complete = self.tasks.is_empty();
    }

    /// Pop the front task on arrival; marks the phase complete when the
    /// queue empties.
    pub fn complete_current(&mut self) {
        self.tasks.pop_front();
        if self.tasks.is_empty() {
            self.phase_complete = true;
        }
    }
}
