//! Cooperative agent/human episode simulation.
//!
//! | Module      | Contents                                               |
//! |-------------|--------------------------------------------------------|
//! | `config`    | `EpisodeConfig`                                        |
//! | `entity`    | `Entity`, `PathSet`                                    |
//! | `state`     | `StepState`, `FailureCause`, `MissionState`, `HumanState` |
//! | `validator` | `PathValidator`, `RetryValidator`, `ValidatorError`    |
//! | `builder`   | `EpisodeBuilder`                                       |
//! | `episode`   | `Episode` step machine and runner                      |
//! | `batch`     | `run_batch`                                            |
//! | `record`    | `StepRecord`, `EpisodeSummary`                         |
//! | `observer`  | `StepObserver`, `NoopObserver`                         |
//! | `error`     | `SimError`, `SimResult`                                |
//!
//! # Feature flags
//!
//! - `parallel` — run [`run_batch`] episodes on a rayon thread pool.

pub mod batch;
pub mod builder;
pub mod config;
pub mod entity;
pub mod episode;
pub mod error;
pub mod observer;
pub mod record;
pub mod state;
pub mod validator;

#[cfg(test)]
mod tests;

pub use batch::run_batch;
pub use builder::EpisodeBuilder;
pub use config::EpisodeConfig;
pub use entity::{Entity, PathSet};
pub use episode::{Episode, MAX_CONSECUTIVE_RETURNS, MAX_STUCK_STEPS, STUCK_SUCCESS_THRESHOLD};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, StepObserver};
pub use record::{EpisodeSummary, StepRecord};
pub use state::{FailureCause, HumanState, MissionState, StepState};
pub use validator::{PathValidator, RetryValidator, ValidatorError};
