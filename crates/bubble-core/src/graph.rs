//! # Graph Primitives
//!
//! Generic operations on adjacency mappings.
//!
//! An [`Adjacency`] maps an identifier to the set of its successors.
//! All mappings use `BTreeMap`/`BTreeSet` for deterministic ordering.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Adjacency mapping: identifier -> successors.
pub type Adjacency<T> = BTreeMap<T, BTreeSet<T>>;

// =============================================================================
// COMPLETION & REVERSAL
// =============================================================================

/// Symmetric completion: for every `a -> b`, `b -> a` is present too.
///
/// Identifiers with no successor at all are not kept as keys.
#[must_use]
pub fn complete<T: Ord + Clone>(graph: &Adjacency<T>) -> Adjacency<T> {
    let mut completed: Adjacency<T> = BTreeMap::new();
    for (node, succs) in graph {
        for succ in succs {
            completed
                .entry(node.clone())
                .or_default()
                .insert(succ.clone());
            completed
                .entry(succ.clone())
                .or_default()
                .insert(node.clone());
        }
    }
    completed
}

/// Reversal: maps every successor to the set of its predecessors.
#[must_use]
pub fn reverse<T: Ord + Clone>(graph: &Adjacency<T>) -> Adjacency<T> {
    let mut reversed: Adjacency<T> = BTreeMap::new();
    for (node, succs) in graph {
        for succ in succs {
            reversed
                .entry(succ.clone())
                .or_default()
                .insert(node.clone());
        }
    }
    reversed
}

// =============================================================================
// WALK
// =============================================================================

/// Reachability walk over the union of several adjacency mappings.
///
/// Yields the start first, then every reachable identifier exactly once.
/// The order past the start is not part of the contract.
#[derive(Debug, Clone)]
pub struct Walk<'a, T: Ord> {
    graphs: Vec<&'a Adjacency<T>>,
    stack: Vec<&'a T>,
    seen: BTreeSet<&'a T>,
}

impl<'a, T: Ord> Walk<'a, T> {
    /// Identifiers reached so far, yielded or still pending.
    #[must_use]
    pub fn seen(&self) -> &BTreeSet<&'a T> {
        &self.seen
    }
}

impl<'a, T: Ord> Iterator for Walk<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        for graph in self.graphs.iter().copied() {
            if let Some(succs) = graph.get(current) {
                for succ in succs {
                    if self.seen.insert(succ) {
                        self.stack.push(succ);
                    }
                }
            }
        }
        Some(current)
    }
}

/// Walk everything reachable from `start` in the union of `graphs`.
///
/// The walk is lazy; calling `walk` again restarts it from scratch.
pub fn walk<'a, T: Ord>(start: &'a T, graphs: &[&'a Adjacency<T>]) -> Walk<'a, T> {
    let mut seen = BTreeSet::new();
    seen.insert(start);
    Walk {
        graphs: graphs.to_vec(),
        stack: vec![start],
        seen,
    }
}

// =============================================================================
// CYCLE DETECTION
// =============================================================================

/// Identifiers involved in a cycle, or reachable only through one.
///
/// Topological elimination: an identifier is removed once all of its
/// predecessors are removed. Each identifier keeps a count of predecessors
/// not yet removed, so every edge is looked at once. Returns the empty set
/// for a DAG.
#[must_use]
pub fn detect_cycle<T: Ord + Clone>(graph: &Adjacency<T>) -> BTreeSet<T> {
    let predecessors = reverse(graph);
    let mut pending: BTreeMap<&T, usize> = graph
        .keys()
        .chain(predecessors.keys())
        .map(|node| (node, predecessors.get(node).map_or(0, BTreeSet::len)))
        .collect();

    let mut ready: VecDeque<&T> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(node, _)| *node)
        .collect();
    while let Some(node) = ready.pop_front() {
        pending.remove(node);
        for succ in graph.get(node).into_iter().flatten() {
            if let Some(count) = pending.get_mut(succ) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    ready.push_back(succ);
                }
            }
        }
    }

    pending.into_keys().cloned().collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(pairs: &[(u32, &[u32])]) -> Adjacency<u32> {
        pairs
            .iter()
            .map(|(node, succs)| (*node, succs.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn completed_graph() {
        let got = complete(&graph(&[(1, &[2, 3]), (3, &[1, 4, 2])]));
        let expected = graph(&[(1, &[2, 3]), (2, &[1, 3]), (3, &[1, 2, 4]), (4, &[3])]);
        assert_eq!(got, expected);
    }

    #[test]
    fn completion_is_idempotent() {
        let once = complete(&graph(&[(1, &[2]), (2, &[3]), (5, &[5])]));
        assert_eq!(complete(&once), once);
    }

    #[test]
    fn reversed_graph() {
        let got = reverse(&graph(&[(1, &[2, 3]), (3, &[1, 4, 2])]));
        let expected = graph(&[(2, &[1, 3]), (3, &[1]), (4, &[3]), (1, &[3])]);
        assert_eq!(got, expected);
    }

    #[test]
    fn walk_over_merged_graphs() {
        let grapha = complete(&graph(&[(1, &[11, 12, 13]), (2, &[21, 22]), (21, &[211, 212])]));
        // 22 -> 3 -> 1 introduces a loop, 4 - 5 is another component
        let graphb = complete(&graph(&[(22, &[3]), (3, &[1]), (4, &[5])]));
        let component: BTreeSet<u32> = [1, 11, 12, 13, 2, 21, 22, 211, 212, 3].into();

        for start in &component {
            let result: Vec<_> = walk(start, &[&grapha, &graphb]).copied().collect();
            assert_eq!(result.len(), component.len(), "no duplicate expected");
            assert_eq!(result.iter().copied().collect::<BTreeSet<_>>(), component);
        }

        let result: BTreeSet<_> = walk(&5, &[&grapha, &graphb]).copied().collect();
        assert_eq!(result, BTreeSet::from([4, 5]));
    }

    #[test]
    fn walk_yields_start_even_when_unknown() {
        let empty: Adjacency<u32> = BTreeMap::new();
        let result: Vec<_> = walk(&7, &[&empty]).collect();
        assert_eq!(result, vec![&7]);
    }

    #[test]
    fn walk_restarts_from_scratch() {
        let g = graph(&[(1, &[2]), (2, &[3])]);
        let first: BTreeSet<_> = walk(&1, &[&g]).collect();
        let second: BTreeSet<_> = walk(&1, &[&g]).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn no_cycle_in_dag() {
        assert!(detect_cycle(&graph(&[(1, &[2, 3]), (2, &[3])])).is_empty());
    }

    #[test]
    fn three_cycle() {
        let got = detect_cycle(&graph(&[(1, &[2]), (2, &[3]), (3, &[1])]));
        assert_eq!(got, BTreeSet::from([1, 2, 3]));
    }

    #[test]
    fn cycle_keeps_what_hangs_below_it() {
        // 0 -> 1 -> 2 -> 1, 2 -> 9: 0 is peeled, 9 only hangs below the cycle
        let got = detect_cycle(&graph(&[(0, &[1]), (1, &[2]), (2, &[1, 9])]));
        assert_eq!(got, BTreeSet::from([1, 2, 9]));
    }

    #[test]
    fn long_chain_is_peeled_in_one_sweep() {
        let mut chain: Adjacency<u32> = (0..100_000).map(|i| (i, BTreeSet::from([i + 1]))).collect();
        assert!(detect_cycle(&chain).is_empty());

        chain.insert(100_000, BTreeSet::from([50_000]));
        let got = detect_cycle(&chain);
        assert_eq!(got.len(), 50_001);
        assert!(!got.contains(&49_999));
        assert!(got.contains(&100_000));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        assert_eq!(detect_cycle(&graph(&[(4, &[4])])), BTreeSet::from([4]));
    }
}
