//! # Power Graph Metrics
//!
//! Summary numbers of a built model, for the `stats` command and JSON output.
//!
//! The edge reduction is stored as an integer per-thousand so the metrics
//! compare and serialize exactly.

use crate::PowerGraph;
use serde::{Deserialize, Serialize};

/// Metrics extracted from a power graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerGraphMetrics {
    pub oriented: bool,
    pub node_count: usize,
    pub powernode_count: usize,
    pub root_count: usize,
    pub component_count: usize,
    /// Distinct undirected (power)edges.
    pub edge_count: usize,
    /// Distinct undirected node-level edges after expansion.
    pub initial_edge_count: usize,
    /// `(initial - edges) * 1000 / initial`, rounded toward zero.
    /// `None` when there is no node-level edge. Negative when power edges
    /// are redundant with each other.
    pub reduction_per_thousand: Option<i64>,
}

impl PowerGraphMetrics {
    /// Compute metrics from a graph.
    #[must_use]
    pub fn from_graph(graph: &PowerGraph) -> Self {
        let edge_count = graph.edge_count();
        let initial_edge_count = graph.initial_edge_count();

        // integer math only
        let reduction_per_thousand = if initial_edge_count > 0 {
            let initial = i64::try_from(initial_edge_count).unwrap_or(i64::MAX);
            let edges = i64::try_from(edge_count).unwrap_or(i64::MAX);
            Some(initial.saturating_sub(edges).saturating_mul(1000) / initial)
        } else {
            None
        };

        Self {
            oriented: graph.oriented(),
            node_count: graph.node_count(),
            powernode_count: graph.powernode_count(),
            root_count: graph.roots().len(),
            component_count: graph.connected_components().len(),
            edge_count,
            initial_edge_count,
            reduction_per_thousand,
        }
    }
}
