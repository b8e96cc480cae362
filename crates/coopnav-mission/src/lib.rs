//! Mission planning: task lists, phase breakdown, exhaustive ordering
//! enumeration, and combinatorial solving over a task-scoped map.
//!
//! | Module    | Contents                                        |
//! |-----------|-------------------------------------------------|
//! | `task`    | `TaskRole`, `Task`, `TaskList`                  |
//! | `phase`   | `Phase`, `PhaseBest`, `breakdown`               |
//! | `permute` | permutation enumeration, `permute`              |
//! | `solve`   | `build_task_graph`, `solve`                     |
//! | `plan`    | `PlanOptions`, `MissionPlan`, `plan` pipeline   |
//! | `random`  | `random_mission` generator                      |
//! | `error`   | `MissionError`, `MissionResult`                 |

pub mod error;
pub mod permute;
pub mod phase;
pub mod plan;
pub mod random;
pub mod solve;
pub mod task;


pub use error::{MissionError, MissionResult};
pub use permute::permute;
pub use phase::{Phase, PhaseBest, breakdown};
pub use plan::{MissionPlan, PlanOptions, plan};
pub use random::{RandomMission, random_mission};
pub use solve::{build_task_graph, solve};
pub use task::{Task, TaskList, TaskRole};
