//! # Power-Graph Model
//!
//! The immutable model of a bubble file: edges between (power)nodes, the
//! containment forest, and the roots of that forest.
//!
//! The model is built once through [`PowerGraphBuilder`], then only read.
//! Derived counts are computed eagerly at build time and owned by the
//! instance, so a built `PowerGraph` can be shared freely between readers.

use crate::graph::{self, Adjacency};
use crate::{BubbleError, Record, classifier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// DERIVED DATA
// =============================================================================

/// Description of one powernode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Powernode {
    /// Number of leaf nodes below the powernode (its cover).
    pub size: usize,
    /// Every (power)node below the powernode, at any depth.
    pub contained: BTreeSet<String>,
    /// The powernodes among `contained`.
    pub contained_powernodes: BTreeSet<String>,
    /// The nodes among `contained`.
    pub contained_nodes: BTreeSet<String>,
}

/// Connected components of a power graph.
///
/// Each component is keyed by the root its walk started from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Components {
    /// Representative root -> every identifier of the component.
    pub members: BTreeMap<String, BTreeSet<String>>,
    /// Representative root -> the other roots absorbed by the component.
    /// Components without other roots have no entry.
    pub subroots: BTreeMap<String, BTreeSet<String>>,
}

impl Components {
    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Representative root of the component holding `id`.
    #[must_use]
    pub fn component_of(&self, id: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, members)| members.contains(id))
            .map(|(root, _)| root.as_str())
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Accumulates records, then finalizes them into a [`PowerGraph`].
///
/// By default an ERROR record fails the build. A lenient builder skips it.
#[derive(Debug, Clone, Default)]
pub struct PowerGraphBuilder {
    oriented: bool,
    lenient: bool,
    edges: Adjacency<String>,
    inclusions: Adjacency<String>,
    powernodes: BTreeSet<String>,
    declared_nodes: BTreeSet<String>,
    endpoints: BTreeSet<String>,
    contained: BTreeSet<String>,
    skipped: usize,
}

impl PowerGraphBuilder {
    /// Create a builder for an unoriented, strict build.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep edges directed instead of completing them.
    #[must_use]
    pub fn oriented(mut self, oriented: bool) -> Self {
        self.oriented = oriented;
        self
    }

    /// Skip ERROR records instead of failing.
    #[must_use]
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Add one record.
    pub fn push(&mut self, record: &Record) -> Result<(), BubbleError> {
        match record {
            Record::Error { raw } if !self.lenient => {
                Err(BubbleError::Format { line: raw.clone() })
            }
            _ => {
                self.accumulate(record);
                Ok(())
            }
        }
    }

    /// Record the content of one record. ERROR records are only counted.
    fn accumulate(&mut self, record: &Record) {
        match record {
            Record::Edge { source, target } => {
                self.edges
                    .entry(source.clone())
                    .or_default()
                    .insert(target.clone());
                self.endpoints.insert(source.clone());
                self.endpoints.insert(target.clone());
            }
            Record::Set { name } => {
                self.inclusions.entry(name.clone()).or_default();
                self.powernodes.insert(name.clone());
            }
            Record::Node { name } => {
                self.declared_nodes.insert(name.clone());
            }
            Record::In {
                contained,
                container,
            } => {
                self.inclusions
                    .entry(container.clone())
                    .or_default()
                    .insert(contained.clone());
                self.powernodes.insert(container.clone());
                self.contained.insert(contained.clone());
            }
            Record::Comment | Record::Empty => {}
            Record::Error { .. } => {
                self.skipped = self.skipped.saturating_add(1);
            }
        }
    }

    /// Add every record of a sequence, stopping at the first failure.
    pub fn extend<'r, I>(&mut self, records: I) -> Result<(), BubbleError>
    where
        I: IntoIterator<Item = &'r Record>,
    {
        for record in records {
            self.push(record)?;
        }
        Ok(())
    }

    /// Finalize the model.
    ///
    /// NODE declarations win over containment, every identifier seen gets an
    /// `inclusions` entry, and unoriented edges are completed.
    #[must_use]
    pub fn build(self) -> PowerGraph {
        let Self {
            oriented,
            edges,
            mut inclusions,
            mut powernodes,
            declared_nodes,
            endpoints,
            contained,
            skipped,
            ..
        } = self;

        let mut overridden = Adjacency::new();
        for name in declared_nodes {
            let members = std::mem::take(inclusions.entry(name.clone()).or_default());
            if !members.is_empty() {
                tracing::warn!(
                    "{} is declared as a node, dropping its {} member(s)",
                    name,
                    members.len()
                );
                overridden.insert(name.clone(), members);
            }
            powernodes.remove(&name);
        }

        let mut inferred = 0usize;
        for name in endpoints.iter().chain(contained.iter()) {
            if !inclusions.contains_key(name) {
                inclusions.insert(name.clone(), BTreeSet::new());
                inferred = inferred.saturating_add(1);
            }
        }

        let roots: BTreeSet<String> = inclusions
            .keys()
            .filter(|name| !contained.contains(*name))
            .cloned()
            .collect();

        let edges = if oriented {
            edges
        } else {
            graph::complete(&edges)
        };

        tracing::debug!(
            identifiers = inclusions.len(),
            powernodes = powernodes.len(),
            roots = roots.len(),
            inferred,
            skipped,
            oriented,
            "power graph built"
        );

        let mut graph = PowerGraph {
            edges,
            inclusions,
            overridden,
            powernodes,
            roots,
            oriented,
            edge_count: 0,
            initial_edge_count: 0,
        };
        graph.edge_count = graph.count_edges();
        graph.initial_edge_count = graph.count_node_level_edges();
        graph
    }
}

// =============================================================================
// POWER GRAPH
// =============================================================================

/// A power graph: (power)nodes, their containment forest, and edges.
///
/// An identifier is a powernode when it was declared by SET or used as an
/// IN container (and not declared by NODE), even if it contains nothing.
/// Every other identifier is a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerGraph {
    /// Identifier -> successors. Symmetric unless oriented.
    edges: Adjacency<String>,
    /// Identifier -> directly contained identifiers. Keys are every
    /// identifier of the model.
    inclusions: Adjacency<String>,
    /// NODE-declared identifier -> the members its IN records gave it.
    /// They are not part of `inclusions`, but they are not roots either.
    overridden: Adjacency<String>,
    powernodes: BTreeSet<String>,
    /// Identifiers contained by nothing.
    roots: BTreeSet<String>,
    oriented: bool,
    edge_count: usize,
    initial_edge_count: usize,
}

impl PowerGraph {
    /// Start building a power graph.
    #[must_use]
    pub fn builder() -> PowerGraphBuilder {
        PowerGraphBuilder::new()
    }

    /// Build from records; the first ERROR record fails the build.
    pub fn from_records<'r, I>(records: I, oriented: bool) -> Result<Self, BubbleError>
    where
        I: IntoIterator<Item = &'r Record>,
    {
        let mut builder = Self::builder().oriented(oriented);
        builder.extend(records)?;
        Ok(builder.build())
    }

    /// Build from records, skipping ERROR records.
    #[must_use]
    pub fn from_records_lenient<'r, I>(records: I, oriented: bool) -> Self
    where
        I: IntoIterator<Item = &'r Record>,
    {
        let mut builder = Self::builder().oriented(oriented).lenient(true);
        for record in records {
            builder.accumulate(record);
        }
        builder.build()
    }

    /// Classify raw bubble lines and build strictly.
    pub fn from_lines<'a, I>(lines: I, oriented: bool) -> Result<Self, BubbleError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let records: Vec<Record> = classifier::classify_all(lines).collect();
        Self::from_records(&records, oriented)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Identifier -> successors.
    #[must_use]
    pub fn edges(&self) -> &Adjacency<String> {
        &self.edges
    }

    /// Identifier -> directly contained identifiers.
    #[must_use]
    pub fn inclusions(&self) -> &Adjacency<String> {
        &self.inclusions
    }

    /// Members dropped from identifiers declared by NODE.
    #[must_use]
    pub fn overridden_inclusions(&self) -> &Adjacency<String> {
        &self.overridden
    }

    /// Identifiers contained by nothing.
    #[must_use]
    pub fn roots(&self) -> &BTreeSet<String> {
        &self.roots
    }

    #[must_use]
    pub fn oriented(&self) -> bool {
        self.oriented
    }

    /// True if the identifier is known to the model.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.inclusions.contains_key(id)
    }

    fn key(&self, id: &str, operation: &'static str) -> Result<&String, BubbleError> {
        self.inclusions
            .get_key_value(id)
            .map(|(key, _)| key)
            .ok_or_else(|| BubbleError::UnknownIdentifier {
                id: id.to_string(),
                operation,
            })
    }

    // -------------------------------------------------------------------------
    // Classification
    // -------------------------------------------------------------------------

    pub fn is_node(&self, id: &str) -> Result<bool, BubbleError> {
        self.key(id, "is_node")?;
        Ok(!self.powernodes.contains(id))
    }

    pub fn is_powernode(&self, id: &str) -> Result<bool, BubbleError> {
        self.key(id, "is_powernode")?;
        Ok(self.powernodes.contains(id))
    }

    /// All nodes, in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.inclusions
            .keys()
            .filter(|id| !self.powernodes.contains(*id))
            .map(String::as_str)
    }

    /// All powernodes, in identifier order.
    pub fn powernodes(&self) -> impl Iterator<Item = &str> {
        self.powernodes.iter().map(String::as_str)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inclusions.len().saturating_sub(self.powernodes.len())
    }

    #[must_use]
    pub fn powernode_count(&self) -> usize {
        self.powernodes.len()
    }

    // -------------------------------------------------------------------------
    // Containment
    // -------------------------------------------------------------------------

    /// Everything below a known key. The key itself is never included,
    /// even when containment loops back to it.
    fn below<'a>(&'a self, key: &'a String) -> BTreeSet<&'a str> {
        graph::walk(key, &[&self.inclusions])
            .skip(1)
            .map(String::as_str)
            .collect()
    }

    /// Every (power)node contained by `id`, at any depth.
    pub fn descendants(&self, id: &str) -> Result<BTreeSet<&str>, BubbleError> {
        let key = self.key(id, "descendants")?;
        Ok(self.below(key))
    }

    /// Every node contained by `id`, at any depth.
    pub fn descendant_nodes(&self, id: &str) -> Result<BTreeSet<&str>, BubbleError> {
        let key = self.key(id, "descendant_nodes")?;
        Ok(self
            .below(key)
            .into_iter()
            .filter(|d| !self.powernodes.contains(*d))
            .collect())
    }

    /// Every powernode contained by `id`, at any depth.
    pub fn descendant_powernodes(&self, id: &str) -> Result<BTreeSet<&str>, BubbleError> {
        let key = self.key(id, "descendant_powernodes")?;
        Ok(self
            .below(key)
            .into_iter()
            .filter(|d| self.powernodes.contains(*d))
            .collect())
    }

    /// Powernodes containing `id`.
    ///
    /// With `directly`, only the immediate parents. Otherwise every powernode
    /// containing `id` at some depth, found by walking the reversed
    /// containment from the parents.
    pub fn ancestors(&self, id: &str, directly: bool) -> Result<BTreeSet<&str>, BubbleError> {
        self.key(id, "ancestors")?;
        let parents: Vec<&String> = self
            .inclusions
            .iter()
            .filter(|(_, members)| members.contains(id))
            .map(|(container, _)| container)
            .collect();
        if directly {
            return Ok(parents.into_iter().map(String::as_str).collect());
        }

        let containers = graph::reverse(&self.inclusions);
        let mut found = BTreeSet::new();
        for parent in parents {
            if found.contains(parent.as_str()) {
                continue;
            }
            for ancestor in graph::walk(parent, &[&containers]) {
                if let Some((key, _)) = self.inclusions.get_key_value(ancestor.as_str()) {
                    found.insert(key.as_str());
                }
            }
        }
        Ok(found)
    }

    /// Leaf nodes covered by `id`: itself for a node.
    fn leaves<'a>(&'a self, key: &'a String) -> BTreeSet<&'a str> {
        if self.powernodes.contains(key) {
            self.below(key)
                .into_iter()
                .filter(|d| !self.powernodes.contains(*d))
                .collect()
        } else {
            BTreeSet::from([key.as_str()])
        }
    }

    /// Number of leaf nodes covered by `id`.
    pub fn cover(&self, id: &str) -> Result<usize, BubbleError> {
        let key = self.key(id, "cover")?;
        Ok(self.leaves(key).len())
    }

    /// Describe a powernode.
    pub fn powernode_descriptor(&self, name: &str) -> Result<Powernode, BubbleError> {
        let Some((key, _)) = self.inclusions.get_key_value(name) else {
            return Err(BubbleError::UnknownPowernode(name.to_string()));
        };
        if !self.powernodes.contains(key) {
            return Err(BubbleError::NotAPowernode(name.to_string()));
        }

        let contained = self.below(key);
        let (contained_powernodes, contained_nodes): (BTreeSet<&str>, BTreeSet<&str>) = contained
            .iter()
            .partition(|d| self.powernodes.contains(**d));

        Ok(Powernode {
            size: contained_nodes.len(),
            contained: contained.iter().map(|d| d.to_string()).collect(),
            contained_powernodes: contained_powernodes.iter().map(|d| d.to_string()).collect(),
            contained_nodes: contained_nodes.iter().map(|d| d.to_string()).collect(),
        })
    }

    // -------------------------------------------------------------------------
    // Edge metrics
    // -------------------------------------------------------------------------

    fn count_edges(&self) -> usize {
        let mut pairs = BTreeSet::new();
        for (source, targets) in &self.edges {
            for target in targets {
                pairs.insert(ordered(source, target));
            }
        }
        pairs.len()
    }

    fn count_node_level_edges(&self) -> usize {
        let mut covers: BTreeMap<&String, BTreeSet<&str>> = BTreeMap::new();
        let mut pairs = BTreeSet::new();
        for (source, targets) in &self.edges {
            for target in targets {
                for id in [source, target] {
                    if !covers.contains_key(id) {
                        covers.insert(id, self.leaves(id));
                    }
                }
                let (Some(source_leaves), Some(target_leaves)) =
                    (covers.get(source), covers.get(target))
                else {
                    continue;
                };
                // a node-level loop only comes from a literal node self-edge
                let self_edge = source == target && !self.powernodes.contains(source);
                for x in source_leaves {
                    for y in target_leaves {
                        if x != y || self_edge {
                            pairs.insert(ordered(x, y));
                        }
                    }
                }
            }
        }
        pairs.len()
    }

    /// Number of distinct undirected (power)edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of distinct undirected node-level edges once every power edge
    /// is expanded to the leaves it covers.
    #[must_use]
    pub fn initial_edge_count(&self) -> usize {
        self.initial_edge_count
    }

    /// Share of node-level edges saved by the power graph.
    #[allow(clippy::float_arithmetic)]
    pub fn edge_reduction_ratio(&self) -> Result<f64, BubbleError> {
        if self.initial_edge_count == 0 {
            return Err(BubbleError::NoEdges);
        }
        let initial = self.initial_edge_count as f64;
        Ok((initial - self.edge_count as f64) / initial)
    }

    // -------------------------------------------------------------------------
    // Connected components
    // -------------------------------------------------------------------------

    /// Connected components over edges and containment together.
    ///
    /// Walks start from each root not yet absorbed, in root order. Edges are
    /// completed for the walk when the graph is oriented; containment is
    /// always completed so walks can move up as well as down.
    #[must_use]
    pub fn connected_components(&self) -> Components {
        let inclusions = graph::complete(&self.inclusions);
        let completed_edges;
        let edges = if self.oriented {
            completed_edges = graph::complete(&self.edges);
            &completed_edges
        } else {
            &self.edges
        };

        let mut components = Components::default();
        let mut walked_roots: BTreeSet<&String> = BTreeSet::new();
        for root in &self.roots {
            if walked_roots.contains(root) {
                continue;
            }
            let mut members = BTreeSet::new();
            let mut absorbed = BTreeSet::new();
            for reached in graph::walk(root, &[edges, &inclusions]) {
                if reached != root && self.roots.contains(reached) {
                    walked_roots.insert(reached);
                    absorbed.insert(reached.clone());
                }
                members.insert(reached.clone());
            }
            if !absorbed.is_empty() {
                components.subroots.insert(root.clone(), absorbed);
            }
            components.members.insert(root.clone(), members);
        }
        components
    }
}

fn ordered<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

// =============================================================================
// SERIALIZABLE SNAPSHOT
// =============================================================================

/// Plain-data view of a power graph, for structured output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializablePowerGraph {
    pub oriented: bool,
    pub edges: Adjacency<String>,
    pub inclusions: Adjacency<String>,
    pub powernodes: BTreeSet<String>,
    pub roots: BTreeSet<String>,
}

impl From<&PowerGraph> for SerializablePowerGraph {
    fn from(graph: &PowerGraph) -> Self {
        Self {
            oriented: graph.oriented,
            edges: graph.edges.clone(),
            inclusions: graph.inclusions.clone(),
            powernodes: graph.powernodes.clone(),
            roots: graph.roots.clone(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<Record> {
        vec![
            Record::edge("k", "p1"),
            Record::edge("k", "p2"),
            Record::edge("p3", "p4"),
            Record::inclusion("a", "p3"),
            Record::inclusion("b", "p3"),
            Record::inclusion("c", "p1"),
            Record::inclusion("d", "p1"),
            Record::inclusion("e", "p4"),
            Record::inclusion("f", "p4"),
            Record::inclusion("g", "p2"),
            Record::inclusion("h", "p2"),
            Record::inclusion("p3", "p1"),
            Record::inclusion("p4", "p2"),
            Record::node("k"),
            Record::set("p1"),
            Record::set("p3"),
        ]
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn strs<'a>(ids: &[&'a str]) -> BTreeSet<&'a str> {
        ids.iter().copied().collect()
    }

    fn build(oriented: bool) -> PowerGraph {
        PowerGraph::from_records(&fixture(), oriented).expect("build")
    }

    fn adjacency(entries: &[(&str, &[&str])]) -> Adjacency<String> {
        entries
            .iter()
            .map(|(id, succs)| (id.to_string(), set(succs)))
            .collect()
    }

    #[test]
    fn fixture_maps_unoriented() {
        let graph = build(false);
        assert_eq!(
            graph.edges(),
            &adjacency(&[
                ("k", &["p1", "p2"]),
                ("p1", &["k"]),
                ("p2", &["k"]),
                ("p3", &["p4"]),
                ("p4", &["p3"]),
            ])
        );
        assert_eq!(
            graph.inclusions(),
            &adjacency(&[
                ("a", &[]),
                ("b", &[]),
                ("c", &[]),
                ("d", &[]),
                ("e", &[]),
                ("f", &[]),
                ("g", &[]),
                ("h", &[]),
                ("k", &[]),
                ("p1", &["c", "d", "p3"]),
                ("p2", &["g", "h", "p4"]),
                ("p3", &["a", "b"]),
                ("p4", &["e", "f"]),
            ])
        );
        assert_eq!(graph.roots(), &set(&["k", "p1", "p2"]));
    }

    #[test]
    fn fixture_maps_oriented() {
        let graph = build(true);
        assert_eq!(
            graph.edges(),
            &adjacency(&[("k", &["p1", "p2"]), ("p3", &["p4"])])
        );
        assert_eq!(graph.inclusions(), build(false).inclusions());
    }

    #[test]
    fn classification() {
        let graph = build(false);
        assert!(graph.is_node("k").expect("known"));
        assert!(graph.is_powernode("p4").expect("known"));
        assert!(graph.is_node("zz").is_err());
        assert_eq!(graph.node_count(), 9);
        assert_eq!(graph.powernode_count(), 4);
        assert_eq!(
            graph.powernodes().collect::<Vec<_>>(),
            vec!["p1", "p2", "p3", "p4"]
        );
    }

    #[test]
    fn error_record_fails_strict_build() {
        let records = vec![Record::node("a"), Record::Error { raw: "x".into() }];
        let result = PowerGraph::from_records(&records, false);
        assert!(matches!(result, Err(BubbleError::Format { line }) if line == "x"));
    }

    #[test]
    fn error_record_is_skipped_by_lenient_build() {
        let records = vec![Record::node("a"), Record::Error { raw: "x".into() }];
        let graph = PowerGraph::from_records_lenient(&records, false);
        assert_eq!(graph.roots(), &set(&["a"]));
    }

    #[test]
    fn declared_node_wins_over_containment() {
        let records = vec![Record::inclusion("a", "n"), Record::node("n")];
        let graph = PowerGraph::from_records(&records, false).expect("build");
        assert!(graph.is_node("n").expect("known"));
        assert!(graph.inclusions()["n"].is_empty());
        assert_eq!(graph.overridden_inclusions()["n"], set(&["a"]));
        // a is still recorded as contained
        assert_eq!(graph.roots(), &set(&["n"]));
    }

    #[test]
    fn lenient_build_matches_strict_on_valid_records() {
        let strict = build(false);
        let lenient = PowerGraph::from_records_lenient(&fixture(), false);
        assert_eq!(lenient, strict);
    }

    #[test]
    fn empty_declared_set_is_a_powernode() {
        let records = vec![Record::edge("a", "p1"), Record::set("p1")];
        let graph = PowerGraph::from_records(&records, false).expect("build");
        assert!(graph.is_powernode("p1").expect("known"));
        assert_eq!(graph.cover("p1").expect("known"), 0);
        assert_eq!(graph.initial_edge_count(), 0);
        assert!(matches!(graph.edge_reduction_ratio(), Err(BubbleError::NoEdges)));
    }

    #[test]
    fn descendants_of_p1() {
        let graph = build(false);
        assert_eq!(
            graph.descendants("p1").expect("known"),
            strs(&["a", "b", "c", "d", "p3"])
        );
        assert_eq!(
            graph.descendant_nodes("p1").expect("known"),
            strs(&["a", "b", "c", "d"])
        );
        assert_eq!(graph.descendant_powernodes("p1").expect("known"), strs(&["p3"]));
        assert!(graph.descendants("k").expect("known").is_empty());
    }

    #[test]
    fn ancestors_direct_and_transitive() {
        let graph = build(false);
        assert_eq!(graph.ancestors("a", true).expect("known"), strs(&["p3"]));
        assert_eq!(graph.ancestors("a", false).expect("known"), strs(&["p1", "p3"]));
        assert!(graph.ancestors("k", false).expect("known").is_empty());
        assert!(graph.ancestors("nope", false).is_err());
    }

    #[test]
    fn descendants_terminate_on_cyclic_containment() {
        let records = vec![
            Record::inclusion("p1", "p2"),
            Record::inclusion("p2", "p1"),
        ];
        let graph = PowerGraph::from_records(&records, false).expect("build");
        assert_eq!(graph.descendants("p1").expect("known"), strs(&["p2"]));
        assert_eq!(graph.ancestors("p1", false).expect("known"), strs(&["p1", "p2"]));
    }

    #[test]
    fn descriptor_of_p2() {
        let graph = build(false);
        let p2 = graph.powernode_descriptor("p2").expect("powernode");
        assert_eq!(p2.size, 4);
        assert_eq!(p2.contained_nodes, set(&["e", "f", "g", "h"]));
        assert_eq!(p2.contained_powernodes, set(&["p4"]));
        assert_eq!(p2.contained, set(&["e", "f", "g", "h", "p4"]));
    }

    #[test]
    fn descriptor_errors() {
        let graph = build(false);
        assert!(matches!(
            graph.powernode_descriptor("zz"),
            Err(BubbleError::UnknownPowernode(name)) if name == "zz"
        ));
        assert!(matches!(
            graph.powernode_descriptor("k"),
            Err(BubbleError::NotAPowernode(name)) if name == "k"
        ));
    }

    #[test]
    #[allow(clippy::float_arithmetic)]
    fn edge_counts_and_ratio() {
        let graph = build(false);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.initial_edge_count(), 12);
        let ratio = graph.edge_reduction_ratio().expect("edges");
        assert!((ratio - 0.75).abs() < 1e-9);
    }

    #[test]
    fn oriented_counts_match_unoriented() {
        let graph = build(true);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.initial_edge_count(), 12);
    }

    #[test]
    fn clique_powernode_expands_to_pairs() {
        let records = vec![
            Record::edge("p", "p"),
            Record::inclusion("a", "p"),
            Record::inclusion("b", "p"),
            Record::inclusion("c", "p"),
        ];
        let graph = PowerGraph::from_records(&records, false).expect("build");
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.initial_edge_count(), 3);
    }

    #[test]
    fn single_component_with_two_subroots() {
        for oriented in [false, true] {
            let components = build(oriented).connected_components();
            assert_eq!(components.len(), 1);
            let (root, members) = components.members.iter().next().expect("one component");
            assert_eq!(members.len(), 13);
            assert_eq!(components.subroots.len(), 1);
            assert_eq!(components.subroots[root].len(), 2);
            assert_eq!(components.component_of("h"), Some(root.as_str()));
        }
    }

    #[test]
    fn disconnected_roots_make_separate_components() {
        let records = vec![Record::edge("a", "b"), Record::node("c")];
        let components = PowerGraph::from_records(&records, false)
            .expect("build")
            .connected_components();
        assert_eq!(components.len(), 2);
        assert_eq!(components.members["a"], set(&["a", "b"]));
        assert_eq!(components.members["c"], set(&["c"]));
        assert_eq!(components.subroots["a"], set(&["b"]));
        assert!(!components.subroots.contains_key("c"));
    }

    #[test]
    fn snapshot_carries_structure() {
        let graph = build(false);
        let snapshot = SerializablePowerGraph::from(&graph);
        assert_eq!(&snapshot.roots, graph.roots());
        assert_eq!(&snapshot.edges, graph.edges());
        assert!(!snapshot.oriented);
    }
}
