//! CSV output backend.
//!
//! Creates one `episode_<id>.csv` step file per episode plus a shared
//! `results.csv` in the configured output directory.  `results.csv` is
//! opened in append mode so successive runs accumulate into one file.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::Writer;

use coopnav_core::EpisodeId;
use coopnav_sim::{EpisodeSummary, StepRecord};

use crate::OutputResult;
use crate::writer::RunWriter;

const STEP_HEADER: [&str; 13] = [
    "step",
    "agent_before",
    "agent_intended",
    "agent_after",
    "p_success",
    "p_return",
    "p_fail",
    "draw",
    "agent_state",
    "human_before",
    "human_predicted",
    "human_after",
    "human_state",
];

/// Writes per-episode step files and a shared results file.
pub struct CsvRunWriter {
    dir:      PathBuf,
    steps:    Option<Writer<File>>,
    results:  Writer<File>,
    finished: bool,
}

impl CsvRunWriter {
    /// Open (or create) `results.csv` in `dir`.  The header row is written
    /// only when the file is new.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let path = dir.join("results.csv");
        let fresh = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut results = Writer::from_writer(file);
        if fresh {
            results.write_record(["episode", "completed", "steps", "failure"])?;
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            steps: None,
            results,
            finished: false,
        })
    }
}

impl RunWriter for CsvRunWriter {
    fn begin_episode(&mut self, episode: EpisodeId) -> OutputResult<()> {
        if let Some(mut prev) = self.steps.take() {
            prev.flush()?;
        }
        let mut steps = Writer::from_path(self.dir.join(format!("episode_{episode}.csv")))?;
        steps.write_record(STEP_HEADER)?;
        self.steps = Some(steps);
        Ok(())
    }

    fn write_step(&mut self, record: &StepRecord) -> OutputResult<()> {
        let steps = self.steps.as_mut().ok_or(crate::OutputError::NoOpenEpisode)?;
        steps.write_record(&[
            record.step.to_string(),
            record.agent_before.to_string(),
            record.agent_intended.map(|n| n.to_string()).unwrap_or_default(),
            record.agent_after.to_string(),
            record.p_success.to_string(),
            record.p_return.to_string(),
            record.p_fail.to_string(),
            record.draw.map(|d| d.to_string()).unwrap_or_default(),
            record.agent_state.to_string(),
            record.human_before.to_string(),
            record.human_predicted.to_string(),
            record.human_after.to_string(),
            record.human_state.to_string(),
        ])?;
        Ok(())
    }

    fn write_summary(&mut self, summary: &EpisodeSummary) -> OutputResult<()> {
        self.results.write_record(&[
            summary.episode.to_string(),
            (summary.completed as u8).to_string(),
            summary.steps.to_string(),
            summary.failure.map(|f| f.to_string()).unwrap_or_default(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if let Some(steps) = self.steps.as_mut() {
            steps.flush()?;
        }
        self.results.flush()?;
        Ok(())
    }
}
