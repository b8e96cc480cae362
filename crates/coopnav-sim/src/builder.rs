//! Episode construction and validation.

use coopnav_core::{EpisodeId, NodeId};
use coopnav_graph::{EnvGraph, Layout, OutcomeArity};
use coopnav_mission::{PlanOptions, Task, plan};

use crate::config::EpisodeConfig;
use crate::entity::Entity;
use crate::episode::Episode;
use crate::error::{SimError, SimResult};
use crate::state::{HumanState, MissionState};

/// Builds an [`Episode`] from a layout, a configuration, start positions,
/// and a task list.  All validation happens in [`build`](Self::build).
///
/// ```rust,ignore
/// let episode = EpisodeBuilder::new(&layout)
///     .config(EpisodeConfig::default())
///     .agent_start(NodeId(5))
///     .human_start(NodeId(12))
///     .tasks(tasks)
///     .build()?;
/// ```
pub struct EpisodeBuilder<'a> {
    layout: &'a Layout,
    config: EpisodeConfig,
    episode: EpisodeId,
    agent_start: NodeId,
    human_start: NodeId,
    tasks: Vec<Task>,
}

impl<'a> EpisodeBuilder<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            layout,
            config: EpisodeConfig::default(),
            episode: EpisodeId(1),
            agent_start: NodeId::INVALID,
            human_start: NodeId::INVALID,
            tasks: Vec::new(),
        }
    }

    pub fn config(mut self, config: EpisodeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn episode(mut self, episode: EpisodeId) -> Self {
        self.episode = episode;
        self
    }

    pub fn agent_start(mut self, node: NodeId) -> Self {
        self.agent_start = node;
        self
    }

    pub fn human_start(mut self, node: NodeId) -> Self {
        self.human_start = node;
        self
    }

    pub fn tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Validate the configuration, build both entity graphs (the human's
    /// two-outcome map is derived from the agent's base map so both share
    /// identical success probabilities), plan the mission from the agent's
    /// start, and assemble a ready-to-run episode.
    pub fn build(self) -> SimResult<Episode> {
        self.config.validate()?;

        let node_count = self.layout.node_count();
        if node_count == 0 {
            return Err(SimError::Config("layout has no connections".into()));
        }
        for (name, node) in [("agent_start", self.agent_start), ("human_start", self.human_start)] {
            if node == NodeId::INVALID || node.0 == 0 || node.0 as usize > node_count {
                return Err(SimError::Config(format!("{name} is not a node in the layout")));
            }
        }
        if self.tasks.is_empty() {
            return Err(SimError::Config("no mission tasks supplied".into()));
        }

        let mut agent_graph = EnvGraph::new(node_count, OutcomeArity::Three);
        agent_graph.add_connections(&self.layout.connections)?;
        agent_graph.build_map(None)?;

        let mut human_graph = EnvGraph::new(node_count, OutcomeArity::Two);
        human_graph.add_connections(&self.layout.connections)?;
        human_graph.build_map(Some(agent_graph.map()))?;

        let opts = PlanOptions { include_end: true, max_unordered: self.config.max_unordered };
        let mission_plan = plan(&agent_graph, self.agent_start, self.tasks, &opts)?;

        Ok(Episode::assemble(
            self.episode,
            self.config,
            Entity::new(agent_graph, self.agent_start),
            Entity::new(human_graph, self.human_start),
            MissionState::new(mission_plan),
            HumanState::new(),
            self.layout.safe_nodes.clone(),
        ))
    }
}
