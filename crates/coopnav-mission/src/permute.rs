//! Exhaustive orderings of the unordered tasks in each phase.

use coopnav_core::NodeId;

use crate::error::{MissionError, MissionResult};
use crate::phase::Phase;

/// All permutations of `items` in lexicographic-by-index enumeration order.
///
/// Enumeration order matters: downstream tie-breaking keeps the first
/// ordering that achieves the best value, so the order must be stable.
/// Zero items yield exactly one (empty) permutation.
pub fn permutations(items: &[NodeId]) -> Vec<Vec<NodeId>> {
    if items.is_empty() {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for tail in permutations(&rest) {
            let mut ordering = Vec::with_capacity(items.len());
            ordering.push(head);
            ordering.extend(tail);
            out.push(ordering);
        }
    }
    out
}

/// Populate `orderings` for every phase: each permutation of the phase's
/// unordered tasks with the phase start prepended and, when `include_end`,
/// the phase end appended.
///
/// A phase with more than `max_unordered` unordered tasks fails before any
/// enumeration (factorial growth).
pub fn permute(phases: &mut [Phase], include_end: bool, max_unordered: usize) -> MissionResult<()> {
    for phase in phases.iter_mut() {
        if phase.unordered.len() > max_unordered {
            return Err(MissionError::TooManyUnordered {
                count: phase.unordered.len(),
                max: max_unordered,
            });
        }

        phase.orderings = permutations(&phase.unordered)
            .into_iter()
            .map(|p| {
                let mut ordering = Vec::with_capacity(p.len() + 2);
                ordering.push(phase.start);
                ordering.extend(p);
                if include_end {
                    ordering.push(phase.end);
                }
                ordering
            })
            .collect();
    }
    Ok(())
}
