//! The episode step machine and runner.
//!
//! # Step structure
//!
//! Each simulation step runs five stages in a fixed order:
//!
//! 1. **Phase load** — when both entities finished the previous phase, the
//!    next phase's first max-probability ordering becomes the agent's task
//!    list and its delegated tasks fill the human's queue.
//! 2. **Path selection** — the human re-plans a min-distance path to its
//!    queue front over its own plain map; the agent derives a heat map
//!    from the human's fresh path and position, computes both objective
//!    paths over it, and selects by validated probability.
//! 3. **Movement** — the human moves first (creative draw, predicted
//!    advance, or hold), then the agent samples its next-edge outcome.
//! 4. **Redirect** — a stuck agent asks an idle human to move to a safe
//!    node; ten held steps fail the mission as `Stuck`.
//! 5. **Terminal check** — all phases done marks the mission complete; any
//!    failure ends the episode immediately.
//!
//! The human always acts on the state the agent planned against this step;
//! there is no staleness window between selection and movement.

use rustc_hash::FxHashSet;

use coopnav_core::{EpisodeId, NodeId, PROB_DECIMALS, SimRng, round_dp};
use coopnav_graph::{EnvMap, GraphError, Objective, PathInstance, shortest_path};
use coopnav_mission::MissionError;

use crate::config::EpisodeConfig;
use crate::entity::Entity;
use crate::error::{SimError, SimResult};
use crate::observer::StepObserver;
use crate::record::{EpisodeSummary, StepRecord};
use crate::state::{FailureCause, HumanState, MissionState, StepState};
use crate::validator::{PathValidator, ValidatorError};

/// Next-edge success below this holds the agent in place instead of
/// risking the move.
pub const STUCK_SUCCESS_THRESHOLD: f64 = 0.90;

/// Consecutive return outcomes that fail the mission.
pub const MAX_CONSECUTIVE_RETURNS: u32 = 5;

/// Held steps that fail the mission as stuck.
pub const MAX_STUCK_STEPS: u32 = 10;

pub(crate) struct HumanMove {
    pub(crate) before: NodeId,
    pub(crate) predicted: NodeId,
    pub(crate) after: NodeId,
    pub(crate) state: StepState,
}

pub(crate) struct AgentMove {
    pub(crate) before: NodeId,
    pub(crate) intended: Option<NodeId>,
    pub(crate) after: NodeId,
    pub(crate) p_success: f64,
    pub(crate) p_return: f64,
    pub(crate) p_fail: f64,
    pub(crate) draw: Option<f64>,
    pub(crate) state: StepState,
}

// ── Episode ───────────────────────────────────────────────────────────────────

/// One cooperative navigation episode, built by
/// [`EpisodeBuilder`](crate::EpisodeBuilder).
pub struct Episode {
    pub(crate) id: EpisodeId,
    pub(crate) config: EpisodeConfig,
    pub(crate) agent: Entity,
    pub(crate) human: Entity,
    pub(crate) mission: MissionState,
    pub(crate) human_state: HumanState,
    pub(crate) safe_nodes: Vec<NodeId>,
    pub(crate) prev_agent_state: Option<StepState>,
    pub(crate) steps: u32,
}

impl Episode {
    pub(crate) fn assemble(
        id: EpisodeId,
        config: EpisodeConfig,
        agent: Entity,
        human: Entity,
        mission: MissionState,
        human_state: HumanState,
        safe_nodes: Vec<NodeId>,
    ) -> Self {
        Self {
            id,
            config,
            agent,
            human,
            mission,
            human_state,
            safe_nodes,
            prev_agent_state: None,
            steps: 0,
        }
    }

    pub fn id(&self) -> EpisodeId {
        self.id
    }

    pub fn agent(&self) -> &Entity {
        &self.agent
    }

    pub fn human(&self) -> &Entity {
        &self.human
    }

    pub fn mission(&self) -> &MissionState {
        &self.mission
    }

    pub fn human_tasks(&self) -> &HumanState {
        &self.human_state
    }

    // ── Runner ────────────────────────────────────────────────────────────

    /// Drive steps until the mission completes, fails, or `max_steps` is
    /// reached.  Every step emits a [`StepRecord`] to the observer.
    ///
    /// A timed-out episode has neither `completed` nor a `failure` set in
    /// its summary.
    pub fn run(
        &mut self,
        rng: &mut SimRng,
        validator: Option<&dyn PathValidator>,
        observer: &mut impl StepObserver,
    ) -> SimResult<EpisodeSummary> {
        while self.steps < self.config.max_steps && !self.mission.is_terminal() {
            let record = self.step(rng, validator)?;
            observer.on_step(&record);
        }

        let summary = EpisodeSummary {
            episode: self.id,
            completed: self.mission.complete && self.mission.failed.is_none(),
            steps: self.steps,
            failure: self.mission.failed,
        };
        observer.on_episode_end(&summary);
        Ok(summary)
    }

    // ── Step machine ──────────────────────────────────────────────────────

    /// Advance the simulation by one step.
    pub fn step(
        &mut self,
        rng: &mut SimRng,
        validator: Option<&dyn PathValidator>,
    ) -> SimResult<StepRecord> {
        self.steps += 1;

        self.load_phase()?;
        self.select_human_path()?;
        let heat = self.select_agent_path(validator)?;

        let human = self.move_human(rng);
        let mut agent = self.move_agent(rng, heat.as_ref())?;

        self.maybe_redirect(rng, &mut agent)?;

        if self.mission.stuck_count >= MAX_STUCK_STEPS {
            self.mission.failed = Some(FailureCause::Stuck);
        }
        if self.mission.phase_index > self.mission.n_phase {
            self.mission.complete = true;
        }
        self.prev_agent_state = Some(agent.state);

        Ok(StepRecord {
            step: self.steps,
            agent_before: agent.before,
            agent_intended: agent.intended,
            agent_after: agent.after,
            p_success: agent.p_success,
            p_return: agent.p_return,
            p_fail: agent.p_fail,
            draw: agent.draw,
            agent_state: agent.state,
            human_before: human.before,
            human_predicted: human.predicted,
            human_after: human.after,
            human_state: human.state,
        })
    }

    /// Stage 1: start the next phase once both entities are done with the
    /// previous one.
    pub(crate) fn load_phase(&mut self) -> SimResult<()> {
        if !(self.mission.phase_complete && self.human_state.phase_complete) {
            return Ok(());
        }
        if self.mission.phase_index > self.mission.n_phase {
            return Ok(());
        }

        let idx = self.mission.phase_index - 1;
        let phase = &self.mission.plan.phases[idx];
        let best = phase
            .best_by_probability
            .as_ref()
            .and_then(|b| b.orderings.first())
            .ok_or(MissionError::EmptyPhase { phase: idx })?;

        self.mission.active_tasks = best.clone();
        self.mission.task_index = 1;
        self.mission.phase_complete = false;
        self.human_state.assign(phase.human.iter().copied());
        Ok(())
    }

    /// Stage 2a: the human re-plans a min-distance path to its current
    /// task over its own map, with no contention adjustment.  An idle
    /// human carries a degenerate `[pos, pos]` path so prediction still
    /// has something to point at.
    pub(crate) fn select_human_path(&mut self) -> SimResult<()> {
        let selected = match self.human_state.current_target() {
            Some(target) => {
                let mut path = self.human.graph.shortest_path(
                    self.human.position,
                    target,
                    Objective::MinimizeDistance,
                )?;
                ensure_steppable(&mut path);
                path.rebuild_cumulative(self.human.graph.map());
                self.human.paths.min_distance = path.clone();
                path
            }
            None => PathInstance::new(vec![self.human.position, self.human.position], 0.0, 1.0),
        };
        self.human.paths.selected = selected;
        Ok(())
    }

    /// Stage 2b: the agent derives a heat map from the human's fresh path
    /// and position, computes both objective paths over it, and selects.
    ///
    /// With validation on, both candidates are scored by the oracle over
    /// the agent's base map and the min-distance path wins ties at working
    /// precision.  With it off, the max-probability path is taken as-is.
    ///
    /// Returns the heat map for the movement stage; `None` while the agent
    /// is waiting on the human (it plans nothing then).
    pub(crate) fn select_agent_path(
        &mut self,
        validator: Option<&dyn PathValidator>,
    ) -> SimResult<Option<EnvMap>> {
        if self.mission.phase_complete {
            return Ok(None);
        }
        let Some(target) = self.mission.current_target() else {
            return Ok(None);
        };

        let heat = self.agent.graph.heat_map(
            &self.human.paths.selected.nodes,
            self.human.position,
            self.config.heat_scale_full,
            self.config.heat_scale_partial,
        );

        let position = self.agent.position;
        let mut min_dist = shortest_path(&heat, position, target, Objective::MinimizeDistance)?;
        let mut max_prob = shortest_path(&heat, position, target, Objective::MaximizeProbability)?;

        let mut selected = if self.config.validate_agent {
            let oracle = validator.ok_or_else(|| {
                ValidatorError::Unavailable("path validation requested without a validator".into())
            })?;
            let base = self.agent.graph.map();
            let v_min = oracle.validate(base, position, &min_dist.nodes)?;
            let v_max = oracle.validate(base, position, &max_prob.nodes)?;
            min_dist.validated = Some(v_min);
            max_prob.validated = Some(v_max);

            if round_dp(v_min, PROB_DECIMALS) >= round_dp(v_max, PROB_DECIMALS) {
                min_dist.clone()
            } else {
                max_prob.clone()
            }
        } else {
            max_prob.clone()
        };

        self.agent.paths.min_distance = min_dist;
        self.agent.paths.max_probability = max_prob;

        ensure_steppable(&mut selected);
        selected.rebuild_cumulative(self.agent.graph.map());

        // Paths are re-planned every step; a return outcome leaves the agent
        // on the same edge, so the consecutive-return counter carries over
        // whenever the upcoming edge is unchanged.
        let prev = &self.agent.paths.selected;
        if (prev.current(), prev.next()) == (selected.current(), selected.next()) {
            selected.return_count = prev.return_count;
        }
        self.agent.paths.selected = selected;
        Ok(Some(heat))
    }

    /// Stage 3a: human movement.  The creativity draw comes first and can
    /// send the human to a uniformly random neighbor regardless of any
    /// active task.
    pub(crate) fn move_human(&mut self, rng: &mut SimRng) -> HumanMove {
        let before = self.human.position;
        let predicted = self.human.paths.selected.next().unwrap_or(before);
        let draw = rng.uniform();

        let state = if draw > 1.0 - self.config.creativity {
            let neighbors = self.human.graph.map().neighbor_nodes(before);
            if let Some(&node) = rng.choose(&neighbors) {
                self.human.position = node;
            }
            self.human.paths.selected.off_path = true;
            StepState::Creative
        } else if self.human_state.current_target().is_some() {
            if self.human.paths.selected.next().is_some() {
                self.human.paths.selected.index += 1;
                if let Some(node) = self.human.paths.selected.current() {
                    self.human.position = node;
                }
            }
            if Some(self.human.position) == self.human_state.current_target() {
                self.human_state.complete_current();
            }
            StepState::Predicted
        } else {
            StepState::Hold
        };

        HumanMove { before, predicted, after: self.human.position, state }
    }

    /// Stage 3b: agent movement over the heat map its path was planned on.
    pub(crate) fn move_agent(&mut self, rng: &mut SimRng, heat: Option<&EnvMap>) -> SimResult<AgentMove> {
        let before = self.agent.position;

        // Phase done: the agent idles until the human catches up.
        let (Some(heat), false) = (heat, self.mission.phase_complete) else {
            return Ok(AgentMove {
                before,
                intended: None,
                after: before,
                p_success: 0.0,
                p_return: 0.0,
                p_fail: 0.0,
                draw: None,
                state: StepState::Wait,
            });
        };

        let current = self.agent.paths.selected.current().unwrap_or(before);
        let next = self.agent.paths.selected.next().unwrap_or(current);

        // Zero-length steps (task at the current node) always succeed.
        let (p_success, p_return, p_fail) = if current != next {
            let t = heat
                .get(current, next)
                .ok_or(GraphError::NoPathFound { from: current, to: next })?;
            (t.success, t.ret, t.fail)
        } else {
            (1.0, 0.0, 0.0)
        };

        let (draw, state) = if p_success < STUCK_SUCCESS_THRESHOLD {
            // Too risky to move; most often the human is on the edge.
            self.mission.stuck_count += 1;
            (Some(0.0), StepState::Hold)
        } else {
            self.mission.stuck_count = 0;
            let total = p_success + p_return + p_fail;
            let u = round_dp(rng.gen_range(0.0..total), PROB_DECIMALS);

            if u <= p_success {
                self.agent.paths.selected.index += 1;
                self.agent.position = next;
                self.agent.paths.selected.return_count = 0;
                (Some(u), StepState::Success)
            } else if u <= p_success + p_return {
                self.agent.paths.selected.return_count += 1;
                if self.agent.paths.selected.return_count >= MAX_CONSECUTIVE_RETURNS {
                    self.mission.failed = Some(FailureCause::RepeatedReturns);
                }
                (Some(u), StepState::Return)
            } else {
                self.mission.failed = Some(FailureCause::Fail);
                (Some(u), StepState::Fail)
            }
        };

        self.complete_task_if_path_done();

        Ok(AgentMove {
            before,
            intended: Some(next),
            after: self.agent.position,
            p_success,
            p_return,
            p_fail,
            draw,
            state,
        })
    }

    /// End-of-path bookkeeping: archive the walked path, advance the task
    /// counters, and close the phase after its last task.
    pub(crate) fn complete_task_if_path_done(&mut self) {
        let selected = &self.agent.paths.selected;
        if !(selected.at_end() && Some(self.agent.position) == selected.terminal()) {
            return;
        }

        self.agent.paths.history.push(selected.nodes.clone());
        self.mission.task_index += 1;
        self.mission.total_tasks_done += 1;

        if self.mission.task_index == self.mission.active_tasks.len() {
            self.mission.phase_complete = true;
            self.mission.phase_index += 1;
        }
    }

    /// Stage 4: a stuck agent asks an idle human to clear out.  Never
    /// issued twice in a row, and never while the human still has phase
    /// tasks of its own.
    pub(crate) fn maybe_redirect(&mut self, rng: &mut SimRng, agent: &mut AgentMove) -> SimResult<()> {
        if self.mission.stuck_count <= 1
            || !self.human_state.phase_complete
            || self.prev_agent_state == Some(StepState::Redirect)
        {
            return Ok(());
        }

        let node = self.pick_redirect(rng)?;
        self.human_state.assign([node]);
        agent.state = StepState::Redirect;
        Ok(())
    }

    /// Choose a redirect target: a safe node when one is clear, otherwise
    /// any node that neither hosts a remaining task nor lies on the
    /// agent's path.
    pub(crate) fn pick_redirect(&self, rng: &mut SimRng) -> SimResult<NodeId> {
        let mut forbidden: FxHashSet<NodeId> =
            self.mission.remaining_tasks().iter().copied().collect();
        forbidden.extend(self.agent.paths.selected.nodes.iter().copied());

        let safe: Vec<NodeId> = self
            .safe_nodes
            .iter()
            .copied()
            .filter(|n| !forbidden.contains(n))
            .collect();

        let candidates = if safe.is_empty() {
            self.agent
                .graph
                .all_nodes()
                .filter(|n| !forbidden.contains(n))
                .collect()
        } else {
            safe
        };

        rng.choose(&candidates).copied().ok_or(SimError::NoAvailableRedirect)
    }
}

/// A single-node path cannot be stepped; duplicate the node so the
/// zero-length move is still simulated and logged.
fn ensure_steppable(path: &mut PathInstance) {
    if path.nodes.len() == 1 {
        path.nodes.push(path.nodes[0]);
    }
}
