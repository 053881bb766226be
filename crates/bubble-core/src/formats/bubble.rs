//! Bubble re-serialisation.

use super::edge_pairs;
use crate::PowerGraph;
use crate::primitives::DEFAULT_WEIGHT;

/// Lines describing the graph, in a reloadable order: declarations, then
/// IN, then EDGE. Every line carries weight [`DEFAULT_WEIGHT`].
///
/// IN lines naming a NODE-declared container are written too, so the
/// contained identifiers stay out of the roots on reload.
pub fn lines(graph: &PowerGraph, declarations: bool) -> Vec<String> {
    let mut out = Vec::new();
    if declarations {
        out.extend(graph.nodes().map(|node| format!("NODE\t{}", node)));
        out.extend(
            graph
                .powernodes()
                .map(|name| format!("SET\t{}\t{}", name, DEFAULT_WEIGHT)),
        );
    }
    let mut containers: Vec<_> = graph
        .inclusions()
        .iter()
        .chain(graph.overridden_inclusions())
        .collect();
    containers.sort();
    for (container, members) in containers {
        for member in members {
            out.push(format!("IN\t{}\t{}", member, container));
        }
    }
    for (source, target) in edge_pairs(graph) {
        out.push(format!("EDGE\t{}\t{}\t{}", source, target, DEFAULT_WEIGHT));
    }
    out
}

/// The graph as bubble text, one record per line.
#[must_use]
pub fn to_bubble(graph: &PowerGraph, declarations: bool) -> String {
    lines(graph, declarations)
        .into_iter()
        .map(|line| line + "\n")
        .collect()
}
