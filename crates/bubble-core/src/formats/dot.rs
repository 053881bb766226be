//! Graphviz dot rendering.
//!
//! Each powernode is a `cluster_<name>` subgraph holding an invisible point
//! node named after the powernode; edges touching a powernode target that
//! point and are clipped to the cluster with `ltail`/`lhead` (which needs
//! `compound=true`).

use super::{edge_pairs, is_powernode, top_level};
use crate::PowerGraph;
use std::collections::BTreeSet;

const INDENT: &str = "    ";

/// `"id"`, with quotes and backslashes escaped.
fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}

fn cluster_name(id: &str) -> String {
    quote(&format!("cluster_{}", id))
}

/// Nesting deeper than this is written at this indentation.
const MAX_INDENT_DEPTH: usize = 64;

fn indent(depth: usize) -> String {
    INDENT.repeat(depth.min(MAX_INDENT_DEPTH))
}

enum Frame<'a> {
    Open(&'a str, usize),
    Close(usize),
}

/// Write `id` and everything it contains, clusters first-member-first.
/// Uses an explicit stack: containment chains can be arbitrarily deep.
fn render_member<'a>(
    graph: &'a PowerGraph,
    id: &'a str,
    depth: usize,
    visited: &mut BTreeSet<&'a str>,
    out: &mut Vec<String>,
) {
    let mut stack = vec![Frame::Open(id, depth)];
    while let Some(frame) = stack.pop() {
        let (id, depth) = match frame {
            Frame::Open(id, depth) => (id, depth),
            Frame::Close(depth) => {
                out.push(format!("{}}}", indent(depth)));
                continue;
            }
        };
        if !visited.insert(id) {
            continue;
        }
        if !is_powernode(graph, id) {
            out.push(format!("{}{};", indent(depth), quote(id)));
            continue;
        }

        let inner = indent(depth.saturating_add(1));
        out.push(format!("{}subgraph {} {{", indent(depth), cluster_name(id)));
        out.push(format!("{}color=lightgrey;", inner));
        out.push(format!("{}label=\"\";", inner));
        out.push(format!("{}penwidth=2;", inner));
        out.push(format!("{}{} [style=invis, shape=point];", inner, quote(id)));
        stack.push(Frame::Close(depth));
        if let Some(members) = graph.inclusions().get(id) {
            for member in members.iter().rev() {
                stack.push(Frame::Open(member, depth.saturating_add(1)));
            }
        }
    }
}

/// The graph as a dot document.
///
/// Unoriented graphs are a `graph` with `--` edges, each pair written once;
/// oriented graphs are a `digraph` with `->` edges.
#[must_use]
pub fn to_dot(graph: &PowerGraph) -> String {
    let (kind, arrow) = if graph.oriented() {
        ("digraph", "->")
    } else {
        ("graph", "--")
    };

    let mut out = vec![format!("{} {{", kind), format!("{}compound=true;", INDENT)];
    let mut visited = BTreeSet::new();
    for id in top_level(graph) {
        render_member(graph, id, 1, &mut visited, &mut out);
    }

    for (source, target) in edge_pairs(graph) {
        let mut attrs = Vec::new();
        if is_powernode(graph, source) {
            attrs.push(format!("ltail={}", cluster_name(source)));
        }
        if is_powernode(graph, target) {
            attrs.push(format!("lhead={}", cluster_name(target)));
        }
        let attrs = if attrs.is_empty() {
            String::new()
        } else {
            format!(" [{}]", attrs.join(", "))
        };
        out.push(format!(
            "{}{} {} {}{};",
            INDENT,
            quote(source),
            arrow,
            quote(target),
            attrs
        ));
    }
    out.push("}".to_string());

    let mut text = out.join("\n");
    text.push('\n');
    text
}
