//! Thirty-node single-storey house layout.
//!
//! Nodes are rooms and waypoints; edge success probabilities come from a
//! per-edge risk class (clutter, door thresholds, narrow passages).

use coopnav_core::NodeId;
use coopnav_graph::{Connection, Layout};

// ── Risk classes ──────────────────────────────────────────────────────────────

// Traversal success probability per risk class.
const ML: f64 = 0.995;
const M: f64 = 0.990;
const MH: f64 = 0.985;
const HL: f64 = 0.975;
const HM: f64 = 0.970;
const HH: f64 = 0.930;
const VH: f64 = 0.920;

// ── Layout ────────────────────────────────────────────────────────────────────

/// Build the bungalow layout: 30 nodes, 60 bidirectional connections, and
/// the four safe nodes the agent may redirect the human to.
pub fn bungalow() -> Layout {
    let connections = vec![
        Connection::new(1, 2, 0.7, ML),
        Connection::new(1, 4, 1.2, ML),
        Connection::new(1, 8, 2.0, ML),
        Connection::new(2, 3, 0.8, HL),
        Connection::new(2, 4, 1.2, ML),
        Connection::new(2, 8, 2.2, ML),
        Connection::new(4, 5, 0.7, HM),
        Connection::new(4, 6, 0.8, HM),
        Connection::new(4, 7, 0.7, HL),
        Connection::new(4, 8, 1.5, ML),
        Connection::new(5, 6, 0.3, HL),
        Connection::new(5, 7, 0.4, HL),
        Connection::new(6, 7, 0.3, HL),
        Connection::new(8, 9, 0.5, MH),
        Connection::new(8, 10, 0.8, HL),
        Connection::new(8, 11, 0.7, MH),
        Connection::new(8, 12, 1.2, HM),
        Connection::new(9, 10, 0.7, HL),
        Connection::new(9, 11, 1.3, HM),
        Connection::new(9, 12, 1.3, HM),
        Connection::new(9, 23, 1.1, HM),
        Connection::new(9, 25, 1.2, HL),
        Connection::new(9, 26, 1.2, MH),
        Connection::new(10, 11, 1.0, HL),
        Connection::new(10, 12, 0.8, HH),
        Connection::new(10, 23, 0.5, HH),
        Connection::new(10, 25, 0.8, HM),
        Connection::new(10, 26, 1.4, HL),
        Connection::new(11, 12, 0.7, HM),
        Connection::new(11, 14, 0.7, M),
        Connection::new(11, 15, 1.2, MH),
        Connection::new(12, 13, 0.8, HM),
        Connection::new(12, 19, 0.5, HM),
        Connection::new(12, 20, 0.4, VH),
        Connection::new(13, 14, 0.8, MH),
        Connection::new(13, 18, 0.5, MH),
        Connection::new(13, 19, 0.5, HL),
        Connection::new(14, 15, 0.5, MH),
        Connection::new(14, 16, 0.6, ML),
        Connection::new(14, 17, 0.6, ML),
        Connection::new(14, 18, 0.7, ML),
        Connection::new(15, 16, 0.6, ML),
        Connection::new(16, 17, 1.0, M),
        Connection::new(16, 18, 0.8, ML),
        Connection::new(17, 18, 0.5, M),
        Connection::new(18, 19, 0.7, MH),
        Connection::new(19, 21, 1.0, HM),
        Connection::new(20, 21, 0.7, VH),
        Connection::new(20, 23, 0.7, HH),
        Connection::new(21, 22, 0.7, MH),
        Connection::new(22, 24, 1.0, MH),
        Connection::new(23, 25, 1.0, MH),
        Connection::new(24, 25, 1.2, ML),
        Connection::new(25, 26, 1.4, ML),
        Connection::new(26, 27, 0.4, MH),
        Connection::new(26, 28, 0.8, MH),
        Connection::new(26, 29, 0.6, ML),
        Connection::new(26, 30, 0.7, MH),
        Connection::new(27, 28, 0.3, ML),
        Connection::new(29, 30, 0.4, ML),
    ];

    // Rooms the human can wait in without blocking any main corridor.
    let safe_nodes = vec![NodeId(13), NodeId(14), NodeId(20), NodeId(24)];

    Layout { connections, safe_nodes }
}
