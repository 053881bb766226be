//! # Property-Based Tests
//!
//! Structural invariants checked with proptest on generated inputs.

use bubble_core::{
    Adjacency, ExportFormat, PowerGraph, Record, complete, detect_cycle, lines, validate, walk,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// STRATEGIES
// =============================================================================

fn adjacency(max_id: u8) -> impl Strategy<Value = Adjacency<u8>> {
    vec((0..max_id, 0..max_id), 0..40).prop_map(|pairs| {
        let mut graph = Adjacency::new();
        for (source, target) in pairs {
            graph.entry(source).or_insert_with(BTreeSet::new).insert(target);
        }
        graph
    })
}

fn id() -> impl Strategy<Value = String> {
    (0u8..8).prop_map(|i| format!("n{}", i))
}

/// EDGE, SET, NODE and IN records over a small identifier space.
fn record() -> impl Strategy<Value = Record> {
    prop_oneof![
        (id(), id()).prop_map(|(source, target)| Record::edge(source, target)),
        id().prop_map(Record::set),
        id().prop_map(Record::node),
        (id(), id()).prop_map(|(contained, container)| Record::inclusion(contained, container)),
    ]
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Completion is symmetric and idempotent.
    #[test]
    fn completion_symmetric_and_idempotent(graph in adjacency(12)) {
        let completed = complete(&graph);
        for (node, succs) in &completed {
            for succ in succs {
                prop_assert!(completed[succ].contains(node));
            }
        }
        prop_assert_eq!(complete(&completed), completed);
    }

    /// A walk never yields the same identifier twice.
    #[test]
    fn walk_yields_each_once(graph in adjacency(12), start in 0u8..12) {
        let yielded: Vec<&u8> = walk(&start, &[&graph]).collect();
        let distinct: BTreeSet<&u8> = yielded.iter().copied().collect();
        prop_assert_eq!(yielded.len(), distinct.len());
        prop_assert_eq!(yielded.first().copied(), Some(&start));
    }

    /// Edges that only go from lower to higher ids never form a cycle.
    #[test]
    fn dag_has_no_cycle(pairs in vec((0u8..20, 0u8..20), 0..50)) {
        let mut graph = Adjacency::new();
        for (a, b) in pairs {
            if a < b {
                graph.entry(a).or_insert_with(BTreeSet::new).insert(b);
            }
        }
        prop_assert!(detect_cycle(&graph).is_empty());
    }

    /// Every member of a ring is reported as cyclic.
    #[test]
    fn ring_is_a_cycle(size in 1u8..15) {
        let graph: Adjacency<u8> = (0..size)
            .map(|i| (i, BTreeSet::from([(i + 1) % size])))
            .collect();
        let cyclic = detect_cycle(&graph);
        prop_assert_eq!(cyclic.len(), usize::from(size));
    }

    /// Roots are exactly the identifiers no IN record contains, including
    /// the members dropped from NODE-declared containers.
    #[test]
    fn roots_are_uncontained(records in vec(record(), 0..30)) {
        let graph = PowerGraph::from_records_lenient(&records, false);
        let contained: BTreeSet<&String> = graph
            .inclusions()
            .values()
            .chain(graph.overridden_inclusions().values())
            .flatten()
            .collect();
        for id in graph.inclusions().keys() {
            prop_assert_eq!(graph.roots().contains(id), !contained.contains(id));
        }
    }

    /// Node and powernode counts partition the identifiers.
    #[test]
    fn counts_partition_identifiers(records in vec(record(), 0..30)) {
        let graph = PowerGraph::from_records_lenient(&records, false);
        prop_assert_eq!(
            graph.node_count() + graph.powernode_count(),
            graph.inclusions().len()
        );
    }

    /// A bubble export with declarations reloads to the same model.
    #[test]
    fn bubble_round_trip(records in vec(record(), 0..30), oriented in any::<bool>()) {
        let graph = PowerGraph::from_records(&records, oriented).expect("no ERROR record");
        let text = ExportFormat::Bubble.render(&graph, true);
        let reloaded = PowerGraph::from_lines(lines(&text), oriented).expect("reload");
        prop_assert_eq!(reloaded.roots(), graph.roots());
        prop_assert_eq!(reloaded, graph);
    }

    /// Validation is deterministic and never fails, whatever the input.
    #[test]
    fn validation_is_total_and_deterministic(raw in vec("[A-Z]{0,4}(\t[a-c]{1,2}){0,3}", 0..20)) {
        let first = validate(raw.iter().map(String::as_str), true);
        let second = validate(raw.iter().map(String::as_str), true);
        prop_assert_eq!(first, second);
    }
}
