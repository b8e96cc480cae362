//! Path validation against a probabilistic model of repeated traversal.
//!
//! The search-time probability of a path is the one-shot product of its
//! edge success masses.  A validator answers a different question: the
//! probability the entity *eventually* completes the path when a return
//! outcome lets it retry the same edge.  An external model checker can
//! answer this exhaustively; [`RetryValidator`] answers it analytically
//! with the same edge model (success advances, return retries in place,
//! fail absorbs), which makes it the in-process default for both tests and
//! batch runs.

use coopnav_core::NodeId;
use coopnav_graph::EnvMap;
use thiserror::Error;

/// Validator-layer errors.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The path references an edge the validation map does not contain.
    #[error("validation map has no edge {from} -> {to}")]
    MissingEdge { from: NodeId, to: NodeId },

    /// The backing oracle could not be reached or failed to answer.
    #[error("validation oracle unavailable: {0}")]
    Unavailable(String),
}

/// A synchronous path-validation oracle.
///
/// Implementations must be pure with respect to their inputs: the same map
/// and path always produce the same probability.
pub trait PathValidator {
    /// Probability of eventually completing `path` from `start` over `map`.
    fn validate(&self, map: &EnvMap, start: NodeId, path: &[NodeId]) -> Result<f64, ValidatorError>;
}

// ── RetryValidator ────────────────────────────────────────────────────────────

/// Analytic eventual-success validator.
///
/// Per edge, a return outcome retries the same transition, so the chance
/// of eventually succeeding before failing is the geometric limit
/// `s / (s + f)`.  The path probability is the product over its hops;
/// zero-progress hops (`s + f == 0`) never complete and score 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryValidator;

impl PathValidator for RetryValidator {
    fn validate(&self, map: &EnvMap, start: NodeId, path: &[NodeId]) -> Result<f64, ValidatorError> {
        debug_assert!(path.first().is_none_or(|&f| f == start));

        let mut prob = 1.0;
        for hop in path.windows(2) {
            let (from, to) = (hop[0], hop[1]);
            if from == to {
                continue;
            }
            let t = map.get(from, to).ok_or(ValidatorError::MissingEdge { from, to })?;
            let absorbing = t.success + t.fail;
            if absorbing == 0.0 {
                return Ok(0.0);
            }
            prob *= t.success / absorbing;
        }
        Ok(prob)
    }
}
