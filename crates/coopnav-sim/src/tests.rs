use coopnav_core::{EpisodeId, NodeId, SimRng};
use coopnav_graph::{Connection, EnvMap, Layout, PathInstance, Transition};
use coopnav_mission::{Task, TaskRole};

use crate::builder::EpisodeBuilder;
use crate::config::EpisodeConfig;
use crate::episode::Episode;
use crate::error::SimError;
use crate::observer::{NoopObserver, StepObserver};
use crate::record::{EpisodeSummary, StepRecord};
use crate::state::{FailureCause, StepState};
use crate::validator::{PathValidator, RetryValidator, ValidatorError};

fn n(id: u32) -> NodeId {
    NodeId(id)
}

/// Line environment `1 - 2 - ... - len`, distance 1, uniform edge success.
fn line_layout(len: u32, success: f64, safe_nodes: &[u32]) -> Layout {
    Layout {
        connections: (1..len).map(|i| Connection::new(i, i + 1, 1.0, success)).collect(),
        safe_nodes: safe_nodes.iter().map(|&s| n(s)).collect(),
    }
}

/// Default config with a predictable human (no creative moves).
fn quiet_config() -> EpisodeConfig {
    EpisodeConfig { creativity: 0.0, ..EpisodeConfig::default() }
}

fn build_episode(
    layout: &Layout,
    agent: u32,
    human: u32,
    tasks: Vec<Task>,
    config: EpisodeConfig,
) -> Episode {
    EpisodeBuilder::new(layout)
        .config(config)
        .agent_start(n(agent))
        .human_start(n(human))
        .tasks(tasks)
        .build()
        .unwrap()
}

#[derive(Default)]
struct Recorder {
    records: Vec<StepRecord>,
    summary: Option<EpisodeSummary>,
}

impl StepObserver for Recorder {
    fn on_step(&mut self, record: &StepRecord) {
        self.records.push(record.clone());
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        self.summary = Some(*summary);
    }
}

mod validation {
    use super::*;

    fn edge_map(success: f64, ret: f64, fail: f64) -> EnvMap {
        let mut map = EnvMap::new();
        map.insert(n(1), n(2), Transition { distance: 1.0, success, ret, fail });
        map
    }

    #[test]
    fn eventual_success_discounts_only_the_fail_mass() {
        let v = RetryValidator;
        let map = edge_map(0.6, 0.3, 0.1);
        let p = v.validate(&map, n(1), &[n(1), n(2)]).unwrap();
        // Return retries the edge, so the geometric limit is s / (s + f).
        assert!((p - 0.6 / 0.7).abs() < 1e-12);
    }

    #[test]
    fn no_fail_mass_validates_to_certainty() {
        let v = RetryValidator;
        let map = edge_map(0.9, 0.1, 0.0);
        assert_eq!(v.validate(&map, n(1), &[n(1), n(2)]).unwrap(), 1.0);
    }

    #[test]
    fn blocked_edge_validates_to_zero() {
        let v = RetryValidator;
        let map = edge_map(0.0, 1.0, 0.0);
        assert_eq!(v.validate(&map, n(1), &[n(1), n(2)]).unwrap(), 0.0);
    }

    #[test]
    fn repeated_nodes_are_skipped() {
        let v = RetryValidator;
        let map = edge_map(0.8, 0.0, 0.2);
        let p = v.validate(&map, n(1), &[n(1), n(1), n(2)]).unwrap();
        assert!((p - 0.8).abs() < 1e-12);
    }

    #[test]
    fn missing_edge_is_an_error() {
        let v = RetryValidator;
        let map = edge_map(0.8, 0.0, 0.2);
        let err = v.validate(&map, n(2), &[n(2), n(3)]);
        assert!(matches!(err, Err(ValidatorError::MissingEdge { .. })));
    }
}

mod configuration {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EpisodeConfig::default().validate().unwrap();
    }

    #[test]
    fn creativity_outside_unit_interval_is_rejected() {
        let config = EpisodeConfig { creativity: 1.5, ..EpisodeConfig::default() };
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn heat_scales_outside_unit_interval_are_rejected() {
        let config = EpisodeConfig { heat_scale_full: -0.1, ..EpisodeConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_max_steps_is_rejected() {
        let config = EpisodeConfig { max_steps: 0, ..EpisodeConfig::default() };
        assert!(config.validate().is_err());
    }
}

mod building {
    use super::*;

    #[test]
    fn missing_start_position_is_rejected() {
        let layout = line_layout(4, 0.95, &[]);
        let result = EpisodeBuilder::new(&layout)
            .human_start(n(2))
            .tasks(vec![Task::new(3, TaskRole::Ordered)])
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn empty_task_list_is_rejected() {
        let layout = line_layout(4, 0.95, &[]);
        let result = EpisodeBuilder::new(&layout)
            .agent_start(n(1))
            .human_start(n(2))
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn human_map_is_two_outcome_but_shares_success_masses() {
        let layout = line_layout(4, 0.9, &[]);
        let episode = build_episode(
            &layout,
            1,
            4,
            vec![Task::new(3, TaskRole::Ordered)],
            quiet_config(),
        );

        let agent_t = episode.agent().graph.map().get(n(1), n(2)).unwrap();
        let human_t = episode.human().graph.map().get(n(1), n(2)).unwrap();
        assert_eq!(human_t.success, agent_t.success);
        assert_eq!(human_t.ret, 0.0);
        assert!((human_t.fail - (agent_t.ret + agent_t.fail)).abs() < 1e-9);
    }
}

mod stepping {
    use super::*;

    #[test]
    fn agent_waits_while_human_finishes_the_phase() {
        let layout = line_layout(5, 0.95, &[]);
        let mut episode =
            build_episode(&layout, 1, 5, vec![Task::new(2, TaskRole::Ordered)], quiet_config());

        episode.mission.phase_complete = true;
        episode.human_state.assign([n(4)]);

        let mut rng = SimRng::new(3);
        let record = episode.step(&mut rng, Some(&RetryValidator)).unwrap();

        assert_eq!(record.agent_state, StepState::Wait);
        assert_eq!(record.agent_intended, None);
        assert_eq!(record.draw, None);
        assert_eq!(record.p_success, 0.0);

        // The human advanced toward its delegated task meanwhile.
        assert_eq!(record.human_state, StepState::Predicted);
        assert_eq!(record.human_after, n(4));
        assert!(episode.human_tasks().phase_complete);
    }

    #[test]
    fn fully_creative_human_leaves_the_predicted_path() {
        let layout = line_layout(5, 0.95, &[]);
        let config = EpisodeConfig { creativity: 1.0, ..EpisodeConfig::default() };
        let mut episode =
            build_episode(&layout, 1, 3, vec![Task::new(2, TaskRole::Ordered)], config);

        let mut rng = SimRng::new(9);
        let record = episode.step(&mut rng, Some(&RetryValidator)).unwrap();

        assert_eq!(record.human_state, StepState::Creative);
        assert!(record.human_after == n(2) || record.human_after == n(4));
        assert!(episode.human().paths.selected.off_path);
    }

    #[test]
    fn blocked_edge_holds_the_agent_and_counts_stuck() {
        // Human idles on node 2, hard-blocking the only route to 3.
        let layout = line_layout(5, 0.95, &[]);
        let mut episode =
            build_episode(&layout, 1, 2, vec![Task::new(3, TaskRole::Ordered)], quiet_config());

        let mut rng = SimRng::new(1);
        let record = episode.step(&mut rng, Some(&RetryValidator)).unwrap();

        assert_eq!(record.agent_state, StepState::Hold);
        assert_eq!(record.agent_after, n(1));
        assert_eq!(record.p_success, 0.0);
        assert_eq!(record.draw, Some(0.0));
        assert_eq!(episode.mission().stuck_count, 1);
    }

    #[test]
    fn second_held_step_redirects_the_idle_human() {
        let layout = line_layout(5, 0.95, &[5]);
        let mut episode =
            build_episode(&layout, 1, 2, vec![Task::new(3, TaskRole::Ordered)], quiet_config());

        let mut rng = SimRng::new(1);
        let first = episode.step(&mut rng, Some(&RetryValidator)).unwrap();
        let second = episode.step(&mut rng, Some(&RetryValidator)).unwrap();

        assert_eq!(first.agent_state, StepState::Hold);
        assert_eq!(second.agent_state, StepState::Redirect);
        // The human was asked to move to the free safe node.
        assert_eq!(episode.human_tasks().current_target(), Some(n(5)));
    }

    #[test]
    fn redirect_skips_safe_nodes_hosting_remaining_tasks() {
        let layout = line_layout(14, 0.95, &[13, 14]);
        let mut episode =
            build_episode(&layout, 1, 2, vec![Task::new(13, TaskRole::Ordered)], quiet_config());

        episode.mission.active_tasks = vec![n(1), n(13)];
        episode.mission.task_index = 1;
        episode.agent.paths.selected = PathInstance::empty();

        // 13 is still a task, so 14 is the only safe candidate.
        let mut rng = SimRng::new(77);
        assert_eq!(episode.pick_redirect(&mut rng).unwrap(), n(14));
    }

    #[test]
    fn redirect_falls_back_to_any_unforbidden_node() {
        let layout = line_layout(4, 0.95, &[2]);
        let mut episode =
            build_episode(&layout, 1, 3, vec![Task::new(2, TaskRole::Ordered)], quiet_config());

        episode.mission.active_tasks = vec![n(1), n(2)];
        episode.mission.task_index = 1;
        episode.agent.paths.selected = PathInstance::new(vec![n(1), n(2)], 1.0, 0.9);

        let mut rng = SimRng::new(8);
        let node = episode.pick_redirect(&mut rng).unwrap();
        assert!(node == n(3) || node == n(4));
    }

    #[test]
    fn exhausted_redirect_candidates_are_a_fatal_error() {
        // Three nodes, all forbidden: 3 is the task, 1 and 2 lie on the path.
        let layout = line_layout(3, 0.95, &[]);
        let mut episode =
            build_episode(&layout, 1, 2, vec![Task::new(3, TaskRole::Ordered)], quiet_config());

        let mut rng = SimRng::new(1);
        episode.step(&mut rng, Some(&RetryValidator)).unwrap();
        let err = episode.step(&mut rng, Some(&RetryValidator));
        assert!(matches!(err, Err(SimError::NoAvailableRedirect)));
    }

    #[test]
    fn ten_held_steps_fail_the_mission_as_stuck() {
        let layout = line_layout(5, 0.95, &[5]);
        let mut episode =
            build_episode(&layout, 1, 2, vec![Task::new(3, TaskRole::Ordered)], quiet_config());

        episode.mission.stuck_count = 9;
        let mut rng = SimRng::new(2);
        episode.step(&mut rng, Some(&RetryValidator)).unwrap();

        assert_eq!(episode.mission().stuck_count, 10);
        assert_eq!(episode.mission().failed, Some(FailureCause::Stuck));
        assert!(episode.mission().is_terminal());
    }

    #[test]
    fn fifth_consecutive_return_fails_the_mission() {
        // Drive seeds until a return outcome lands on an edge whose
        // counter already sits one below the limit.
        let layout = line_layout(5, 0.9, &[]);
        let mut observed = false;

        for seed in 0..1000 {
            let mut episode = build_episode(
                &layout,
                1,
                5,
                vec![Task::new(2, TaskRole::Ordered)],
                quiet_config(),
            );
            let mut path = PathInstance::new(vec![n(1), n(2)], 1.0, 0.9);
            path.return_count = 4;
            episode.agent.paths.selected = path;

            let mut rng = SimRng::new(seed);
            let record = episode.step(&mut rng, Some(&RetryValidator)).unwrap();

            if record.agent_state == StepState::Return {
                assert_eq!(episode.mission().failed, Some(FailureCause::RepeatedReturns));
                assert_eq!(record.agent_after, n(1));
                observed = true;
                break;
            }
            // The only other reachable outcome on this edge.
            assert_eq!(record.agent_state, StepState::Success);
        }
        assert!(observed, "no seed produced a return outcome");
    }

    #[test]
    fn fail_mass_outcome_sets_the_fail_cause() {
        let layout = line_layout(3, 0.95, &[]);
        let mut episode =
            build_episode(&layout, 1, 3, vec![Task::new(2, TaskRole::Ordered)], quiet_config());

        let mut heat = EnvMap::new();
        heat.insert(n(1), n(2), Transition { distance: 1.0, success: 0.9, ret: 0.0, fail: 0.1 });

        episode.mission.active_tasks = vec![n(1), n(2)];

        let mut observed = false;
        for seed in 0..1000 {
            // A success draw completes the task, so rewind progress fully.
            episode.mission.task_index = 1;
            episode.mission.phase_index = 1;
            episode.mission.phase_complete = false;
            episode.mission.failed = None;
            episode.agent.position = n(1);
            episode.agent.paths.selected = PathInstance::new(vec![n(1), n(2)], 1.0, 0.9);

            let mut rng = SimRng::new(seed);
            let mv = episode.move_agent(&mut rng, Some(&heat)).unwrap();
            if mv.state == StepState::Fail {
                assert_eq!(episode.mission().failed, Some(FailureCause::Fail));
                observed = true;
                break;
            }
        }
        assert!(observed, "no seed produced a fail outcome");
    }

    #[test]
    fn task_at_current_node_completes_in_one_step() {
        let layout = line_layout(3, 0.95, &[]);
        let tasks = vec![Task::new(2, TaskRole::Unordered), Task::new(2, TaskRole::Ordered)];
        let mut episode = build_episode(&layout, 2, 1, tasks, quiet_config());

        let mut rng = SimRng::new(4);
        let mut recorder = Recorder::default();
        let summary = episode.run(&mut rng, Some(&RetryValidator), &mut recorder).unwrap();

        assert!(summary.completed);
        assert_eq!(summary.steps, 1);
        // The zero-length move is still simulated as a certain success.
        assert_eq!(recorder.records[0].p_success, 1.0);
        assert_eq!(recorder.records[0].agent_state, StepState::Success);
    }
}

mod episodes {
    use super::*;

    fn monitored_line() -> (Layout, Vec<Task>) {
        let layout = line_layout(4, 0.95, &[]);
        let tasks = vec![Task::new(2, TaskRole::Unordered), Task::new(3, TaskRole::Ordered)];
        (layout, tasks)
    }

    #[test]
    fn simple_mission_runs_to_completion() {
        let (layout, tasks) = monitored_line();
        let config = EpisodeConfig { max_steps: 300, ..quiet_config() };
        let mut episode = build_episode(&layout, 1, 4, tasks, config);

        let mut rng = SimRng::new(21);
        let mut recorder = Recorder::default();
        let summary = episode.run(&mut rng, Some(&RetryValidator), &mut recorder).unwrap();

        assert!(summary.completed, "mission did not complete: {summary:?}");
        assert_eq!(summary.failure, None);
        assert_eq!(episode.agent().position, n(3));
        assert!(episode.mission().complete);
        assert!(!episode.agent().paths.history.is_empty());
        assert_eq!(recorder.records.len() as u32, summary.steps);
    }

    #[test]
    fn identical_seeds_replay_identically() {
        let run = |seed: u64| {
            let (layout, tasks) = monitored_line();
            let mut episode = build_episode(&layout, 1, 4, tasks, quiet_config());
            let mut rng = SimRng::new(seed);
            let mut recorder = Recorder::default();
            let summary = episode.run(&mut rng, Some(&RetryValidator), &mut recorder).unwrap();
            (summary, recorder.records)
        };

        let (summary_a, records_a) = run(42);
        let (summary_b, records_b) = run(42);
        assert_eq!(summary_a, summary_b);
        assert_eq!(records_a, records_b);
    }

    #[test]
    fn timed_out_episode_is_neither_completed_nor_failed() {
        let layout = line_layout(5, 0.95, &[5]);
        let config = EpisodeConfig { max_steps: 1, ..quiet_config() };
        let mut episode =
            build_episode(&layout, 1, 2, vec![Task::new(3, TaskRole::Ordered)], config);

        let mut rng = SimRng::new(6);
        let summary = episode.run(&mut rng, Some(&RetryValidator), &mut NoopObserver).unwrap();

        assert!(!summary.completed);
        assert_eq!(summary.failure, None);
        assert_eq!(summary.steps, 1);
    }

    #[test]
    fn batches_are_deterministic_and_ordered() {
        let run_batch_once = || {
            crate::batch::run_batch(4, 7, |id, mut rng| {
                let (layout, tasks) = monitored_line();
                let mut episode = build_episode(&layout, 1, 4, tasks, quiet_config());
                episode.id = id;
                episode.run(&mut rng, Some(&RetryValidator), &mut NoopObserver)
            })
            .unwrap()
        };

        let first = run_batch_once();
        let second = run_batch_once();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
        let ids: Vec<EpisodeId> = first.iter().map(|s| s.episode).collect();
        assert_eq!(ids, vec![EpisodeId(1), EpisodeId(2), EpisodeId(3), EpisodeId(4)]);
    }
}
