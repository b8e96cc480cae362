//! Episode configuration.

use coopnav_graph::{CONTENTION_SCALE_FULL, CONTENTION_SCALE_PARTIAL};

use crate::error::{SimError, SimResult};

/// Tuning knobs for one episode.
///
/// | Field                | Default | Meaning                                   |
/// |----------------------|---------|-------------------------------------------|
/// | `creativity`         | 0.05    | chance per step the human moves randomly  |
/// | `validate_agent`     | true    | pick the agent path by validated probability |
/// | `heat_scale_full`    | 0.5     | success scale, both endpoints contended   |
/// | `heat_scale_partial` | 0.90    | success scale, one endpoint contended     |
/// | `max_steps`          | 1000    | hard cap on simulation steps              |
/// | `max_unordered`      | 8       | planner permutation budget per phase      |
#[derive(Debug, Clone, Copy)]
pub struct EpisodeConfig {
    pub creativity: f64,
    pub validate_agent: bool,
    pub heat_scale_full: f64,
    pub heat_scale_partial: f64,
    pub max_steps: u32,
    pub max_unordered: usize,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            creativity: 0.05,
            validate_agent: true,
            heat_scale_full: CONTENTION_SCALE_FULL,
            heat_scale_partial: CONTENTION_SCALE_PARTIAL,
            max_steps: 1000,
            max_unordered: 8,
        }
    }
}

impl EpisodeConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !(0.0..=1.0).contains(&self.creativity) {
            return Err(SimError::Config(format!(
                "creativity must lie in [0, 1], got {}",
                self.creativity
            )));
        }
        for (name, scale) in [
            ("heat_scale_full", self.heat_scale_full),
            ("heat_scale_partial", self.heat_scale_partial),
        ] {
            if !(0.0..=1.0).contains(&scale) {
                return Err(SimError::Config(format!("{name} must lie in [0, 1], got {scale}")));
            }
        }
        if self.max_steps == 0 {
            return Err(SimError::Config("max_steps must be positive".into()));
        }
        Ok(())
    }
}
