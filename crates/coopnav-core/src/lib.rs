//! `coopnav-core` — foundational types for the coopnav framework.
//!
//! This crate is a dependency of every other `coopnav-*` crate.  It
//! intentionally has no `coopnav-*` dependencies and minimal external ones
//! (only `rand`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                  |
//! |------------|-------------------------------------------|
//! | [`ids`]    | `NodeId`, `EpisodeId`                     |
//! | [`rng`]    | `SimRng` seeded RNG wrapper               |
//! | [`round`]  | fixed-decimal rounding, probability ε     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod ids;
pub mod rng;
pub mod round;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{EpisodeId, NodeId};
pub use rng::SimRng;
pub use round::{PROB_DECIMALS, PROB_EPSILON, decimal_places, prob_eq, round_dp};
