//! Task roles and the normalized task list.

use coopnav_core::NodeId;

// ── TaskRole ──────────────────────────────────────────────────────────────────

/// What a task node means to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRole {
    /// The entity's position when planning began.  Exactly one per list,
    /// always at index 0.
    Start,
    /// May be visited in any order within its phase.
    Unordered,
    /// Delegated to the human; never permuted, but the phase cannot end
    /// until it is done.
    HumanAssigned,
    /// Must be visited at this point in the list.  Closes the current phase
    /// and opens the next one.
    Ordered,
}

// ── Task ──────────────────────────────────────────────────────────────────────

/// One mission objective: visit `node`, interpreted per `role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub node: NodeId,
    pub role: TaskRole,
}

impl Task {
    pub fn new(node: u32, role: TaskRole) -> Self {
        Self { node: NodeId(node), role }
    }
}

// ── TaskList ──────────────────────────────────────────────────────────────────

/// A task sequence whose first element is guaranteed to carry
/// [`TaskRole::Start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Normalize `tasks` against the planning `position`: when the first
    /// task is not at `position`, the position is prepended as the start;
    /// otherwise the first task's role is overwritten to `Start`.
    pub fn normalized(position: NodeId, mut tasks: Vec<Task>) -> Self {
        match tasks.first_mut() {
            Some(first) if first.node == position => first.role = TaskRole::Start,
            _ => tasks.insert(0, Task { node: position, role: TaskRole::Start }),
        }
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task nodes deduplicated, first occurrence order preserved.
    pub fn unique_nodes(&self) -> Vec<NodeId> {
        let mut seen = rustc_hash::FxHashSet::default();
        self.tasks
            .iter()
            .map(|t| t.node)
            .filter(|n| seen.insert(*n))
            .collect()
    }
}
