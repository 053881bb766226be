//! GEXF 1.2 draft rendering, see <https://gephi.org/gexf/format/>.
//!
//! Powernodes with members become nodes holding a nested `<nodes>` element.

use super::{edge_pairs, is_powernode, top_level};
use crate::PowerGraph;
use std::collections::BTreeSet;

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gexf xmlns="http://www.gexf.net/1.2draft" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://www.gexf.net/1.2draft http://www.gexf.net/1.2draft/gexf.xsd" version="1.2">"#;

const INDENT: &str = "  ";

/// Escape a string for use in an XML attribute value.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
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

/// Write `id` and everything it contains. Uses an explicit stack:
/// containment chains can be arbitrarily deep.
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
                out.push(format!("{}</nodes>", indent(depth.saturating_add(1))));
                out.push(format!("{}</node>", indent(depth)));
                continue;
            }
        };
        if !visited.insert(id) {
            continue;
        }
        let id_attr = escape(id);
        let members = graph
            .inclusions()
            .get(id)
            .filter(|members| is_powernode(graph, id) && !members.is_empty());
        let Some(members) = members else {
            out.push(format!(
                "{}<node id=\"{}\" label=\"{}\"/>",
                indent(depth),
                id_attr,
                id_attr
            ));
            continue;
        };

        out.push(format!(
            "{}<node id=\"{}\" label=\"{}\">",
            indent(depth),
            id_attr,
            id_attr
        ));
        out.push(format!("{}<nodes>", indent(depth.saturating_add(1))));
        stack.push(Frame::Close(depth));
        for member in members.iter().rev() {
            stack.push(Frame::Open(member, depth.saturating_add(2)));
        }
    }
}

/// The graph as a GEXF document.
#[must_use]
pub fn to_gexf(graph: &PowerGraph) -> String {
    let edge_type = if graph.oriented() {
        "directed"
    } else {
        "undirected"
    };

    let mut out = vec![
        HEADER.to_string(),
        format!(
            "{}<graph mode=\"static\" defaultedgetype=\"{}\">",
            INDENT, edge_type
        ),
        format!("{}<nodes>", INDENT.repeat(2)),
    ];
    let mut visited = BTreeSet::new();
    for id in top_level(graph) {
        render_member(graph, id, 3, &mut visited, &mut out);
    }
    out.push(format!("{}</nodes>", INDENT.repeat(2)));

    out.push(format!("{}<edges>", INDENT.repeat(2)));
    for (idx, (source, target)) in edge_pairs(graph).into_iter().enumerate() {
        out.push(format!(
            "{}<edge id=\"{}\" source=\"{}\" target=\"{}\"/>",
            INDENT.repeat(3),
            idx,
            escape(source),
            escape(target)
        ));
    }
    out.push(format!("{}</edges>", INDENT.repeat(2)));
    out.push(format!("{}</graph>", INDENT));
    out.push("</gexf>".to_string());

    let mut text = out.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(lines: &[&str], oriented: bool) -> PowerGraph {
        PowerGraph::from_lines(lines.iter().copied(), oriented).expect("build")
    }

    #[test]
    fn nested_nodes_and_edges() {
        let graph = build(&["IN\ta\tp1", "IN\tb\tp1", "EDGE\tk\tp1\t1.0"], false);
        let gexf = to_gexf(&graph);
        let body = "\
  <graph mode=\"static\" defaultedgetype=\"undirected\">
    <nodes>
      <node id=\"k\" label=\"k\"/>
      <node id=\"p1\" label=\"p1\">
        <nodes>
          <node id=\"a\" label=\"a\"/>
          <node id=\"b\" label=\"b\"/>
        </nodes>
      </node>
    </nodes>
    <edges>
      <edge id=\"0\" source=\"k\" target=\"p1\"/>
    </edges>
  </graph>
</gexf>
";
        assert!(gexf.starts_with("<?xml"));
        assert!(gexf.ends_with(body), "{}", gexf);
    }

    #[test]
    fn edge_ids_are_unique() {
        let graph = build(&["EDGE\ta\tb\t1.0", "EDGE\ta\tc\t1.0", "EDGE\tb\tc\t1.0"], false);
        let gexf = to_gexf(&graph);
        for idx in 0..3 {
            assert!(gexf.contains(&format!("<edge id=\"{}\"", idx)));
        }
        assert_eq!(gexf.matches("<edge ").count(), 3);
    }

    #[test]
    fn oriented_is_directed() {
        let graph = build(&["EDGE\ta\tb\t1.0"], true);
        assert!(to_gexf(&graph).contains("defaultedgetype=\"directed\""));
    }

    #[test]
    fn empty_powernode_is_a_plain_node() {
        let graph = build(&["SET\tp\t1.0"], false);
        assert!(to_gexf(&graph).contains("<node id=\"p\" label=\"p\"/>"));
    }

    #[test]
    fn attributes_are_escaped() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn cyclic_containment_terminates() {
        let graph = build(&["IN\tp1\tp2", "IN\tp2\tp1"], false);
        let gexf = to_gexf(&graph);
        assert_eq!(gexf.matches("<node id=\"p1\"").count(), 1);
        assert_eq!(gexf.matches("<node id=\"p2\"").count(), 1);
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let chain: Vec<String> = (0..50_000)
            .map(|i| format!("IN\tp{}\tp{}", i, i + 1))
            .collect();
        let graph = build(&chain.iter().map(String::as_str).collect::<Vec<_>>(), false);
        let gexf = to_gexf(&graph);
        assert_eq!(gexf.matches("<nodes>").count(), 50_001);
        assert_eq!(gexf.matches("</nodes>").count(), 50_001);
        assert!(gexf.contains("<node id=\"p0\" label=\"p0\"/>"));
    }
}
