//! Random mission generation for batch studies and tests.

use coopnav_core::{NodeId, SimRng};
use coopnav_graph::EnvMap;

use crate::error::{MissionError, MissionResult};
use crate::task::{Task, TaskRole};

/// Parameters for [`random_mission`].
#[derive(Debug, Clone, Copy)]
pub struct RandomMission {
    /// Number of tasks to generate.
    pub n_tasks: usize,
    /// Chance each non-final task is unordered rather than ordered.
    pub phase_rate: f64,
    /// Cap on consecutive unordered tasks; the next task after a full run
    /// is forced ordered.
    pub max_unordered: usize,
    /// Chance an unordered task is delegated to the human.
    pub human_rate: f64,
    /// Cap on total human-delegated tasks.
    pub max_human: usize,
}

impl Default for RandomMission {
    fn default() -> Self {
        Self { n_tasks: 6, phase_rate: 0.8, max_unordered: 5, human_rate: 0.0, max_human: 0 }
    }
}

/// Generate a random start position and task list over the nodes of `map`.
///
/// The final task is always ordered so the list terminates a phase.  Task
/// nodes are drawn uniformly over the map's label range and may repeat.
pub fn random_mission(
    rng: &mut SimRng,
    map: &EnvMap,
    params: &RandomMission,
) -> MissionResult<(NodeId, Vec<Task>)> {
    let min = map.nodes().next().ok_or(MissionError::EmptyEnvironment)?;
    let max = map.nodes().last().ok_or(MissionError::EmptyEnvironment)?;

    let mut draw_node = |rng: &mut SimRng| NodeId(rng.gen_range(min.0..=max.0));

    let position = draw_node(rng);
    let mut tasks = Vec::with_capacity(params.n_tasks);
    let mut unordered_run = 0usize;
    let mut human_count = 0usize;

    for i in 0..params.n_tasks {
        let node = draw_node(rng);
        let role = if i == params.n_tasks - 1 {
            TaskRole::Ordered
        } else if unordered_run < params.max_unordered && rng.uniform() <= params.phase_rate {
            unordered_run += 1;
            if rng.uniform() <= params.human_rate && human_count < params.max_human {
                human_count += 1;
                TaskRole::HumanAssigned
            } else {
                TaskRole::Unordered
            }
        } else {
            unordered_run = 0;
            TaskRole::Ordered
        };
        tasks.push(Task { node, role });
    }

    Ok((position, tasks))
}
