//! Phase partitioning of a task list.
//!
//! Ordered tasks are phase boundaries: each closes the current phase (its
//! node becomes the phase end) and, unless it is the last task, opens the
//! next phase starting from the same node.
//!
//! ```text
//! roles   S  U  U  O  U  H  O
//! phases  [S ── U U ── O][S=O ── U (H) ── O]
//! ```

use coopnav_core::NodeId;

use crate::error::{MissionError, MissionResult};
use crate::task::{TaskList, TaskRole};

// ── Phase ─────────────────────────────────────────────────────────────────────

/// The best value found for one objective and every ordering achieving it.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseBest {
    pub value: f64,
    pub orderings: Vec<Vec<NodeId>>,
}

/// One contiguous mission phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub start: NodeId,
    pub end: NodeId,
    /// Agent tasks visitable in any order.
    pub unordered: Vec<NodeId>,
    /// Tasks delegated to the human.  Never permuted.
    pub human: Vec<NodeId>,
    /// Candidate visit orders, populated by `permute`.
    pub orderings: Vec<Vec<NodeId>>,
    /// Populated by `solve`.
    pub best_by_distance: Option<PhaseBest>,
    pub best_by_probability: Option<PhaseBest>,
}

impl Phase {
    fn open(start: NodeId) -> Draft {
        Draft { start, unordered: Vec::new(), human: Vec::new(), end: None }
    }
}

struct Draft {
    start: NodeId,
    unordered: Vec<NodeId>,
    human: Vec<NodeId>,
    end: Option<NodeId>,
}

impl Draft {
    fn close(self) -> MissionResult<Phase> {
        let end = self.end.ok_or(MissionError::MissingPhaseEnd)?;
        Ok(Phase {
            start: self.start,
            end,
            unordered: self.unordered,
            human: self.human,
            orderings: Vec::new(),
            best_by_distance: None,
            best_by_probability: None,
        })
    }
}

// ── Breakdown ─────────────────────────────────────────────────────────────────

/// Partition a normalized task list into phases on its ordered-task
/// boundaries.
pub fn breakdown(tasks: &TaskList) -> MissionResult<Vec<Phase>> {
    let list = tasks.tasks();
    let Some(first) = list.first() else {
        return Err(MissionError::MissingPhaseEnd);
    };

    let mut phases = Vec::new();
    let mut draft = Phase::open(first.node);

    for (idx, task) in list.iter().enumerate().skip(1) {
        match task.role {
            TaskRole::Unordered => draft.unordered.push(task.node),
            TaskRole::HumanAssigned => draft.human.push(task.node),
            TaskRole::Ordered => {
                draft.end = Some(task.node);
                phases.push(draft.close()?);
                draft = Phase::open(task.node);
                if idx == list.len() - 1 {
                    return Ok(phases);
                }
            }
            // A second Start mid-list is treated as unordered; normalized
            // lists only carry one at index 0.
            TaskRole::Start => draft.unordered.push(task.node),
        }
    }

    // Loop fell through: the list did not end on an ordered task.
    Err(MissionError::MissingPhaseEnd)
}
