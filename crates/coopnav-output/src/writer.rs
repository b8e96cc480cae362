//! The `RunWriter` trait implemented by all backend writers.

use coopnav_core::EpisodeId;
use coopnav_sim::{EpisodeSummary, StepRecord};

use crate::OutputResult;

/// Trait implemented by output backends (CSV today; anything that can take a
/// step stream and an episode result).
///
/// A writer outlives individual episodes: call
/// [`begin_episode`](Self::begin_episode) before the first step of each
/// episode, then [`write_summary`](Self::write_summary) when it ends.
pub trait RunWriter {
    /// Open the step stream for `episode`.  Closes the previous episode's
    /// stream if one is still open.
    fn begin_episode(&mut self, episode: EpisodeId) -> OutputResult<()>;

    /// Write one step record to the current episode's stream.
    fn write_step(&mut self, record: &StepRecord) -> OutputResult<()>;

    /// Write the terminal result of one episode.
    fn write_summary(&mut self, summary: &EpisodeSummary) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
