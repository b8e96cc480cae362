//! bungalow — patrol mission demo for the coopnav framework.
//!
//! An agent sweeps a 30-node bungalow, visiting eight rooms in whichever
//! order the planner finds best while a human roams the same space.  Each
//! episode randomizes both start positions, runs the cooperative step loop,
//! and logs every step to CSV.

mod layout;

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use coopnav_core::{EpisodeId, NodeId, SimRng};
use coopnav_mission::{Task, TaskRole};
use coopnav_output::{CsvRunWriter, RecordingObserver};
use coopnav_sim::{EpisodeBuilder, EpisodeConfig, FailureCause, RetryValidator};

use layout::bungalow;

// ── Constants ─────────────────────────────────────────────────────────────────

const N_EPISODES: u32 = 100;
const SEED:       u64 = 42;
const CREATIVITY: f64 = 0.05; // chance per step the human wanders off-path
const FINAL_NODE: u32 = 22;
const OUT_DIR:    &str = "output/bungalow";

// ── Mission ───────────────────────────────────────────────────────────────────

/// The patrol mission: eight rooms in any order, then finish at
/// [`FINAL_NODE`].  The agent's start node is prepended by the planner.
fn patrol_tasks() -> Vec<Task> {
    let rooms = [3, 6, 9, 12, 16, 24, 28, 29];
    rooms
        .iter()
        .map(|&n| Task::new(n, TaskRole::Unordered))
        .chain([Task::new(FINAL_NODE, TaskRole::Ordered)])
        .collect()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== bungalow — coopnav cooperative navigation ===");
    println!("Episodes: {N_EPISODES}  |  Creativity: {CREATIVITY}  |  Seed: {SEED}");
    println!();

    let layout = bungalow();
    let node_count = layout.node_count() as u32;
    println!(
        "Layout: {} nodes, {} connections, {} safe nodes",
        node_count,
        layout.connections.len(),
        layout.safe_nodes.len()
    );

    let config = EpisodeConfig { creativity: CREATIVITY, ..EpisodeConfig::default() };

    std::fs::create_dir_all(OUT_DIR)?;
    let writer = CsvRunWriter::new(Path::new(OUT_DIR))?;
    let mut obs = RecordingObserver::new(writer);

    let mut completed = 0u32;
    let mut failed = 0u32;
    let mut repeated_returns = 0u32;
    let mut stuck = 0u32;
    let mut timed_out = 0u32;
    let mut total_steps = 0u64;

    // Same child-stream derivation as `run_batch`, so a parallel re-run with
    // the same master seed replays these episodes exactly.
    let mut master = SimRng::new(SEED);
    let t0 = Instant::now();

    for i in 1..=N_EPISODES {
        let mut rng = master.child(u64::from(i));

        let agent_start = NodeId(rng.gen_range(1..=node_count));
        let human_start = NodeId(rng.gen_range(1..=node_count));

        let mut episode = EpisodeBuilder::new(&layout)
            .config(config)
            .episode(EpisodeId(i))
            .agent_start(agent_start)
            .human_start(human_start)
            .tasks(patrol_tasks())
            .build()?;

        obs.begin_episode(EpisodeId(i));
        let summary = episode.run(&mut rng, Some(&RetryValidator), &mut obs)?;

        total_steps += u64::from(summary.steps);
        match (summary.completed, summary.failure) {
            (true, _) => completed += 1,
            (false, Some(FailureCause::Fail)) => failed += 1,
            (false, Some(FailureCause::RepeatedReturns)) => repeated_returns += 1,
            (false, Some(FailureCause::Stuck)) => stuck += 1,
            (false, None) => timed_out += 1,
        }
    }

    let elapsed = t0.elapsed();
    obs.finish();
    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    println!("Batch complete in {:.3} s", elapsed.as_secs_f64());
    println!();
    println!("{:<18} {:>6}", "Outcome", "Count");
    println!("{}", "-".repeat(26));
    println!("{:<18} {:>6}", "completed", completed);
    println!("{:<18} {:>6}", "fail", failed);
    println!("{:<18} {:>6}", "repeated returns", repeated_returns);
    println!("{:<18} {:>6}", "stuck", stuck);
    println!("{:<18} {:>6}", "timed out", timed_out);
    println!();
    println!(
        "Mean steps/episode: {:.1}   Success rate: {:.1}%",
        total_steps as f64 / f64::from(N_EPISODES),
        100.0 * f64::from(completed) / f64::from(N_EPISODES)
    );
    println!("Step logs and results written to {OUT_DIR}/");

    Ok(())
}
