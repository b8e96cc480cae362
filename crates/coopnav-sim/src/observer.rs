//! Episode observer trait for progress reporting and data collection.

use crate::record::{EpisodeSummary, StepRecord};

/// Callbacks invoked by [`Episode::run`][crate::Episode::run] during the
/// step loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — step printer
///
/// ```rust,ignore
/// struct StepPrinter;
///
/// impl StepObserver for StepPrinter {
///     fn on_step(&mut self, record: &StepRecord) {
///         println!(
///             "[{}] agent {} -> {} ({})",
///             record.step, record.agent_before, record.agent_after, record.agent_state
///         );
///     }
/// }
/// ```
pub trait StepObserver {
    /// Called after every simulation step with the full step record.
    fn on_step(&mut self, _record: &StepRecord) {}

    /// Called once when the episode reaches a terminal state or times out.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) {}
}

/// A [`StepObserver`] that does nothing.  Use when you need to call `run`
/// but don't want step callbacks.
pub struct NoopObserver;

impl StepObserver for NoopObserver {}
