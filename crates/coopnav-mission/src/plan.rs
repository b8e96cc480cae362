//! The end-to-end planning pipeline.

use coopnav_core::NodeId;
use coopnav_graph::{EnvGraph, EnvMap};

use crate::error::MissionResult;
use crate::phase::Phase;
use crate::permute::permute;
use crate::solve::{build_task_graph, solve};
use crate::task::{Task, TaskList};

// ── PlanOptions ───────────────────────────────────────────────────────────────

/// Knobs for the planning pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PlanOptions {
    /// Append each phase's end node to its candidate orderings.
    pub include_end: bool,
    /// Permutation budget per phase.
    pub max_unordered: usize,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self { include_end: true, max_unordered: 8 }
    }
}

// ── MissionPlan ───────────────────────────────────────────────────────────────

/// Planner output: solved phases plus the task-scoped map they were scored
/// over.
#[derive(Debug, Clone)]
pub struct MissionPlan {
    pub phases: Vec<Phase>,
    pub task_map: EnvMap,
}

impl MissionPlan {
    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }
}

/// Normalize → task graph → breakdown → permute → solve.
pub fn plan(
    graph: &EnvGraph,
    position: NodeId,
    tasks: Vec<Task>,
    opts: &PlanOptions,
) -> MissionResult<MissionPlan> {
    let list = TaskList::normalized(position, tasks);
    let task_map = build_task_graph(graph, &list)?;
    let mut phases = crate::phase::breakdown(&list)?;
    permute(&mut phases, opts.include_end, opts.max_unordered)?;
    solve(&mut phases, &task_map)?;
    Ok(MissionPlan { phases, task_map })
}
