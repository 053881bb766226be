//! # Validator
//!
//! Structural health checks over bubble lines.
//!
//! - Findings are data (`Diagnostic`), never errors
//! - Every check runs; nothing aborts the pass early
//! - Output order is deterministic for a given input

use crate::graph;
use crate::primitives::TOP_LEVEL;
use crate::{PowerGraph, Record, RecordKind, classifier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        })
    }
}

/// One validation finding. Displays as `LEVEL message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level, self.message)
    }
}

/// True if at least one diagnostic is an error.
#[must_use]
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// `{a, b, c}`
fn fmt_set<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let items: Vec<&str> = items.into_iter().collect();
    format!("{{{}}}", items.join(", "))
}

// =============================================================================
// ENTRY POINT
// =============================================================================

/// Validate bubble lines.
///
/// With `profiling`, INFO lines describing the input and the model are
/// emitted as well. ERROR lines are reported and otherwise ignored: the
/// model is built from the valid records only, unoriented.
pub fn validate<'a, I>(lines: I, profiling: bool) -> Vec<Diagnostic>
where
    I: IntoIterator<Item = &'a str>,
{
    let records: Vec<Record> = classifier::classify_all(lines).collect();
    let mut diagnostics = Vec::new();

    let mut counts: BTreeMap<RecordKind, usize> = BTreeMap::new();
    for record in &records {
        let count = counts.entry(record.kind()).or_default();
        *count = count.saturating_add(1);
    }
    let count_of = |kind: RecordKind| counts.get(&kind).copied().unwrap_or(0);

    if profiling {
        for (kind, count) in &counts {
            diagnostics.push(Diagnostic::info(format!("{} lines of type {}", count, kind)));
        }
        let payload: usize = counts
            .iter()
            .filter(|(kind, _)| kind.is_payload())
            .map(|(_, count)| count)
            .sum();
        diagnostics.push(Diagnostic::info(format!("{} lines of payload", payload)));
    }

    for record in &records {
        if let Record::Error { raw } = record {
            diagnostics.push(Diagnostic::error(format!("line is not bubble: \"{}\"", raw)));
        }
    }
    diagnostics.extend(declaration_validation(&records));

    let graph = PowerGraph::from_records_lenient(&records, false);
    let components = graph.connected_components();
    tracing::debug!(
        records = records.len(),
        components = components.len(),
        "validating power graph"
    );

    if profiling {
        diagnostics.push(Diagnostic::info(format!(
            "{} top (power)nodes",
            graph.roots().len()
        )));
        diagnostics.push(Diagnostic::info(format!(
            "{} connected components",
            components.len()
        )));
        diagnostics.push(Diagnostic::info(format!(
            "{} nodes are defined, {} are used",
            count_of(RecordKind::Node),
            graph.node_count()
        )));
        diagnostics.push(Diagnostic::info(format!(
            "{} powernodes are defined, {} are used",
            count_of(RecordKind::Set),
            graph.powernode_count()
        )));
    }

    diagnostics.extend(inclusions_validation(&graph));
    diagnostics.extend(mergeability_validation(&graph));
    diagnostics
}

// =============================================================================
// CHECKS
// =============================================================================

/// Identifiers declared by NODE but used as IN containers.
pub fn declaration_validation(records: &[Record]) -> Vec<Diagnostic> {
    let declared: BTreeSet<&str> = records
        .iter()
        .filter_map(|record| match record {
            Record::Node { name } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    let mut members: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for record in records {
        if let Record::In {
            contained,
            container,
        } = record
        {
            if declared.contains(container.as_str()) {
                members
                    .entry(container.as_str())
                    .or_default()
                    .insert(contained.as_str());
            }
        }
    }
    members
        .into_iter()
        .map(|(name, contained)| {
            Diagnostic::error(format!(
                "node used as container: {} is declared as a node, but contains {}",
                name,
                fmt_set(contained)
            ))
        })
        .collect()
}

/// Overlaps, inconsistencies, empty and singleton powernodes, and cycles
/// in the containment relation.
///
/// The pairwise overlap check is quadratic in the number of powernodes.
pub fn inclusions_validation(graph: &PowerGraph) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    // nodes contain nothing, so only powernode pairs can share descendants
    let descendants: BTreeMap<&str, BTreeSet<&str>> = graph
        .powernodes()
        .map(|name| (name, graph.descendants(name).unwrap_or_default()))
        .collect();
    let names: Vec<&str> = descendants.keys().copied().collect();

    for (i, one) in names.iter().enumerate() {
        for two in names.iter().skip(i.saturating_add(1)) {
            let (Some(one_inc), Some(two_inc)) = (descendants.get(one), descendants.get(two))
            else {
                continue;
            };
            let common: BTreeSet<&str> = one_inc.intersection(two_inc).copied().collect();
            if common.is_empty() {
                continue;
            }
            if common == *one_inc {
                if !two_inc.contains(one) {
                    diagnostics.push(inconsistency(one, two));
                }
            } else if common == *two_inc {
                if !one_inc.contains(two) {
                    diagnostics.push(inconsistency(two, one));
                }
            } else {
                diagnostics.push(Diagnostic::error(format!(
                    "overlapping powernodes: {} nodes are shared by {} and {}, \
                     which are not in inclusion. Shared nodes are {}",
                    common.len(),
                    one,
                    two,
                    fmt_set(common.iter().copied())
                )));
            }
        }
    }

    for name in graph.powernodes() {
        let Some(members) = graph.inclusions().get(name) else {
            continue;
        };
        match members.len() {
            0 => diagnostics.push(Diagnostic::warning(format!(
                "empty powernode: {} is defined, but contains nothing",
                name
            ))),
            1 => diagnostics.push(Diagnostic::warning(format!(
                "singleton powernode: {} is defined, but contains only {}",
                name,
                fmt_set(members.iter().map(String::as_str))
            ))),
            _ => {}
        }
    }

    let in_cycles = graph::detect_cycle(graph.inclusions());
    if !in_cycles.is_empty() {
        diagnostics.push(Diagnostic::error(format!(
            "inclusion cycle: the following {} nodes are involved: {}",
            in_cycles.len(),
            fmt_set(in_cycles.iter().map(String::as_str))
        )));
    }

    diagnostics
}

fn inconsistency(inner: &str, outer: &str) -> Diagnostic {
    Diagnostic::error(format!(
        "inconsistency in inclusions: {} is both included and not included in {}.",
        inner, outer
    ))
}

/// Siblings sharing at least one edge neighbour.
///
/// Siblings are the direct members of one powernode, or the roots. Such a
/// pair could be merged into a single powernode with one power edge.
pub fn mergeability_validation(graph: &PowerGraph) -> Vec<Diagnostic> {
    let mut groups: Vec<(String, Vec<&str>)> = vec![(
        TOP_LEVEL.to_string(),
        graph.roots().iter().map(String::as_str).collect(),
    )];
    for name in graph.powernodes() {
        if let Some(members) = graph.inclusions().get(name) {
            groups.push((
                format!("powernode {}", name),
                members.iter().map(String::as_str).collect(),
            ));
        }
    }

    let mut diagnostics = Vec::new();
    for (level, siblings) in &groups {
        for (i, one) in siblings.iter().enumerate() {
            let Some(one_neighbors) = graph.edges().get(*one) else {
                continue;
            };
            for two in siblings.iter().skip(i.saturating_add(1)) {
                let Some(two_neighbors) = graph.edges().get(*two) else {
                    continue;
                };
                let shared: BTreeSet<&str> = one_neighbors
                    .intersection(two_neighbors)
                    .map(String::as_str)
                    .filter(|neighbor| neighbor != one && neighbor != two)
                    .collect();
                if shared.is_empty() {
                    continue;
                }
                let both_nodes = graph.is_node(one).unwrap_or(false)
                    && graph.is_node(two).unwrap_or(false);
                diagnostics.push(Diagnostic::warning(format!(
                    "mergeable {}: {} and {} in {} share {} neighbors: {}",
                    if both_nodes { "nodes" } else { "powernodes" },
                    one,
                    two,
                    level,
                    shared.len(),
                    fmt_set(shared.iter().copied())
                )));
            }
        }
    }
    diagnostics
}

// =============================================================================
// TESTS
// =============================================================================
