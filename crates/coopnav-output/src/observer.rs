//! `RecordingObserver<W>` — bridges `StepObserver` to a `RunWriter`.

use coopnav_core::EpisodeId;
use coopnav_sim::{EpisodeSummary, StepObserver, StepRecord};

use crate::OutputError;
use crate::writer::RunWriter;

/// A [`StepObserver`] that forwards every step record and episode summary to
/// any [`RunWriter`] backend.
///
/// Errors from the writer are stored internally because `StepObserver`
/// methods have no return value.  After the episodes have run, check for
/// errors with [`take_error`][Self::take_error].
pub struct RecordingObserver<W: RunWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: RunWriter> RecordingObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Open the step stream for `episode`.  Call before each `run`.
    pub fn begin_episode(&mut self, episode: EpisodeId) {
        let result = self.writer.begin_episode(episode);
        self.store_err(result);
    }

    /// Flush the underlying writer.  Call once after the last episode.
    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Take the stored write error (if any) after the episodes have run.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: RunWriter> StepObserver for RecordingObserver<W> {
    fn on_step(&mut self, record: &StepRecord) {
        let result = self.writer.write_step(record);
        self.store_err(result);
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        let result = self.writer.write_summary(summary);
        self.store_err(result);
    }
}
