//! CSV layout loader.
//!
//! A layout file describes the raw undirected connections of an
//! environment, one per row:
//!
//! ```csv
//! node_a,node_b,distance,success
//! 1,2,3.0,0.95
//! 2,3,2.5,
//! ```
//!
//! The `success` column may be left empty for distance-only layouts.
//! Safe nodes (redirect fallback targets) come from a second single-column
//! file with a `node` header.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use coopnav_core::NodeId;

use crate::graph::Connection;
use crate::{GraphError, GraphResult};

// ── Records ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ConnectionRecord {
    node_a: u32,
    node_b: u32,
    distance: f64,
    success: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SafeNodeRecord {
    node: u32,
}

// ── Layout ────────────────────────────────────────────────────────────────────

/// A parsed environment layout.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub connections: Vec<Connection>,
    /// Preferred redirect targets, in file order.
    pub safe_nodes: Vec<NodeId>,
}

impl Layout {
    /// Largest node label referenced by any connection.
    pub fn node_count(&self) -> usize {
        self.connections
            .iter()
            .map(|c| c.a.0.max(c.b.0) as usize)
            .max()
            .unwrap_or(0)
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load connections from a CSV file on disk.
pub fn load_connections_csv(path: impl AsRef<Path>) -> GraphResult<Vec<Connection>> {
    load_connections_reader(File::open(path)?)
}

/// Load connections from any reader (tests pass in-memory CSV).
pub fn load_connections_reader(reader: impl Read) -> GraphResult<Vec<Connection>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut connections = Vec::new();

    for row in csv_reader.deserialize() {
        let record: ConnectionRecord = row.map_err(|e| GraphError::Parse(e.to_string()))?;
        if record.node_a == 0 || record.node_b == 0 {
            return Err(GraphError::Parse("node labels are 1-based".into()));
        }
        connections.push(Connection {
            a: NodeId(record.node_a),
            b: NodeId(record.node_b),
            distance: record.distance,
            success: record.success,
        });
    }
    Ok(connections)
}

/// Load safe-node labels from a CSV file on disk.
pub fn load_safe_nodes_csv(path: impl AsRef<Path>) -> GraphResult<Vec<NodeId>> {
    load_safe_nodes_reader(File::open(path)?)
}

pub fn load_safe_nodes_reader(reader: impl Read) -> GraphResult<Vec<NodeId>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut nodes = Vec::new();

    for row in csv_reader.deserialize() {
        let record: SafeNodeRecord = row.map_err(|e| GraphError::Parse(e.to_string()))?;
        nodes.push(NodeId(record.node));
    }
    Ok(nodes)
}

/// Load a full layout: a connections file plus an optional safe-node file.
pub fn load_layout(
    connections_path: impl AsRef<Path>,
    safe_nodes_path: Option<&Path>,
) -> GraphResult<Layout> {
    let connections = load_connections_csv(connections_path)?;
    let safe_nodes = match safe_nodes_path {
        Some(p) => load_safe_nodes_csv(p)?,
        None => Vec::new(),
    };
    Ok(Layout { connections, safe_nodes })
}
