//! Environment graph engine: topology, outcome probabilities, contention
//! heat maps, and dual-objective path search.
//!
//! | Module   | Contents                                              |
//! |----------|-------------------------------------------------------|
//! | `map`    | `Transition`, `EnvMap` adjacency                      |
//! | `graph`  | `EnvGraph` construction, outcome synthesis, heat maps |
//! | `search` | `PathInstance`, Dijkstra by distance or probability   |
//! | `layout` | CSV layout loading                                    |
//! | `error`  | `GraphError`, `GraphResult`                           |

pub mod error;
pub mod graph;
pub mod layout;
pub mod map;
pub mod search;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use graph::{
    CONTENTION_SCALE_FULL, CONTENTION_SCALE_PARTIAL, Connection, EnvGraph, OutcomeArity,
    split_remainder,
};
pub use layout::{
    Layout, load_connections_csv, load_connections_reader, load_layout, load_safe_nodes_csv,
    load_safe_nodes_reader,
};
pub use map::{EnvMap, Transition};
pub use search::{BLOCKED_EDGE_NOMINAL, Objective, PathInstance, shortest_path};
