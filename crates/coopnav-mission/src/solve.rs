//! Task-scoped map construction and exhaustive ordering evaluation.

use coopnav_core::{NodeId, round_dp};
use coopnav_graph::{EnvGraph, EnvMap, GraphError, Objective, Transition};

use crate::error::{MissionError, MissionResult};
use crate::phase::{Phase, PhaseBest};
use crate::task::TaskList;

/// Distance rounding on task-scoped edges.
const TASK_DIST_DECIMALS: u32 = 2;
/// Probability rounding on task-scoped edges.
const TASK_PROB_DECIMALS: u32 = 6;

// ── Task graph ────────────────────────────────────────────────────────────────

/// Build the task-scoped map: for every ordered pair of distinct task
/// nodes, the max-probability shortest path over the full environment is
/// collapsed into a single edge carrying the path's total distance and
/// success probability.
///
/// The search probabilities are conservative relative to an exhaustive
/// model checker, which is why selected paths may later be re-validated
/// (see the simulation crate).
pub fn build_task_graph(graph: &EnvGraph, tasks: &TaskList) -> MissionResult<EnvMap> {
    let nodes = tasks.unique_nodes();
    let mut map = EnvMap::new();

    for &from in &nodes {
        map.touch(from);
        for &to in &nodes {
            if from == to {
                continue;
            }
            let path = graph.shortest_path(from, to, Objective::MaximizeProbability)?;
            let distance = round_dp(path.length, TASK_DIST_DECIMALS);
            let success = round_dp(path.probability, TASK_PROB_DECIMALS);
            map.insert(
                from,
                to,
                Transition { distance, success, ret: 0.0, fail: 1.0 - success },
            );
        }
    }
    Ok(map)
}

// ── Solve ─────────────────────────────────────────────────────────────────────

/// Score every candidate ordering of every phase over the task-scoped map
/// and record the best orderings for both objectives.
///
/// Consecutive duplicate nodes in an ordering contribute nothing (the
/// entity is not moving).  Ties are kept in full, in enumeration order, so
/// downstream consumers can deterministically take the first.
pub fn solve(phases: &mut [Phase], task_map: &EnvMap) -> MissionResult<()> {
    for (idx, phase) in phases.iter_mut().enumerate() {
        if phase.orderings.is_empty() {
            return Err(MissionError::EmptyPhase { phase: idx });
        }

        let mut results = Vec::with_capacity(phase.orderings.len());
        for ordering in &phase.orderings {
            let mut dist = 0.0;
            let mut prob = 1.0;
            for hop in ordering.windows(2) {
                let (s1, s2) = (hop[0], hop[1]);
                if s1 == s2 {
                    continue;
                }
                let t = task_map
                    .get(s1, s2)
                    .ok_or(GraphError::NoPathFound { from: s1, to: s2 })
                    .map_err(MissionError::Graph)?;
                dist += t.distance;
                prob *= t.success;
            }
            results.push((dist, prob));
        }

        phase.best_by_distance = Some(collect_best(
            &phase.orderings,
            &results,
            |r| r.0,
            f64::min,
        ));
        phase.best_by_probability = Some(collect_best(
            &phase.orderings,
            &results,
            |r| r.1,
            f64::max,
        ));
    }
    Ok(())
}

fn collect_best(
    orderings: &[Vec<NodeId>],
    results: &[(f64, f64)],
    metric: impl Fn(&(f64, f64)) -> f64,
    fold: impl Fn(f64, f64) -> f64,
) -> PhaseBest {
    let mut best = metric(&results[0]);
    for r in &results[1..] {
        best = fold(best, metric(r));
    }
    let tied = results
        .iter()
        .zip(orderings)
        .filter(|(r, _)| metric(r) == best)
        .map(|(_, o)| o.clone())
        .collect();
    PhaseBest { value: best, orderings: tied }
}
