//! # Core Type Definitions
//!
//! This module contains the types shared by every stage of the pipeline:
//! - Classified input lines (`Record`, `RecordKind`)
//! - Error types (`BubbleError`)
//!
//! ## Determinism Guarantees
//!
//! `RecordKind` implements `Ord` following the classification priority,
//! so per-kind counters kept in a `BTreeMap` always report in the same order.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// RECORD KIND
// =============================================================================

/// The kind of a bubble line.
///
/// Variants are declared in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Edge,
    Set,
    In,
    Node,
    Comment,
    Empty,
    Error,
}

impl RecordKind {
    /// The keyword used for this kind in bubble files and diagnostics.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            RecordKind::Edge => "EDGE",
            RecordKind::Set => "SET",
            RecordKind::In => "IN",
            RecordKind::Node => "NODE",
            RecordKind::Comment => "COMMENT",
            RecordKind::Empty => "EMPTY",
            RecordKind::Error => "ERROR",
        }
    }

    /// True for the kinds that carry structure (EDGE, SET, IN, NODE).
    #[must_use]
    pub fn is_payload(&self) -> bool {
        matches!(
            self,
            RecordKind::Edge | RecordKind::Set | RecordKind::In | RecordKind::Node
        )
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// One classified bubble line.
///
/// Identifiers are opaque strings. The numeric weight of EDGE and SET lines
/// is only used for classification and is not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Record {
    /// `EDGE <source> <target> <weight>`
    Edge { source: String, target: String },
    /// `SET <name> <weight>`
    Set { name: String },
    /// `NODE <name>`
    Node { name: String },
    /// `IN <contained> <container>`
    In { contained: String, container: String },
    /// A `#` comment, possibly indented.
    Comment,
    /// An empty line.
    Empty,
    /// Anything else. The raw text is kept for reporting.
    Error { raw: String },
}

impl Record {
    /// Create an EDGE record.
    #[must_use]
    pub fn edge(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Edge {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Create a SET record.
    #[must_use]
    pub fn set(name: impl Into<String>) -> Self {
        Self::Set { name: name.into() }
    }

    /// Create a NODE record.
    #[must_use]
    pub fn node(name: impl Into<String>) -> Self {
        Self::Node { name: name.into() }
    }

    /// Create an IN record: `contained` is directly inside `container`.
    #[must_use]
    pub fn inclusion(contained: impl Into<String>, container: impl Into<String>) -> Self {
        Self::In {
            contained: contained.into(),
            container: container.into(),
        }
    }

    /// The kind of this record.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Edge { .. } => RecordKind::Edge,
            Record::Set { .. } => RecordKind::Set,
            Record::Node { .. } => RecordKind::Node,
            Record::In { .. } => RecordKind::In,
            Record::Comment => RecordKind::Comment,
            Record::Empty => RecordKind::Empty,
            Record::Error { .. } => RecordKind::Error,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while building or querying a power graph.
///
/// - No silent failures
/// - Use `Result<T, BubbleError>` for fallible operations
/// - The core never panics; all errors are recoverable
#[derive(Debug, Error)]
pub enum BubbleError {
    /// A line could not be classified as a bubble record.
    #[error("line is not bubble: \"{line}\"")]
    Format { line: String },

    /// A query named an identifier absent from the model.
    #[error("{operation}: unknown identifier '{id}'")]
    UnknownIdentifier { id: String, operation: &'static str },

    /// A powernode-only operation was given an unknown name.
    #[error("Powernode '{0}' does not exist")]
    UnknownPowernode(String),

    /// A powernode-only operation was given a node.
    #[error("Given name '{0}' is a node")]
    NotAPowernode(String),

    /// The edge reduction ratio is undefined for a graph without edges.
    #[error("Edge reduction is undefined: the graph has no node-level edge")]
    NoEdges,

    /// An export format name was not recognized.
    #[error("Unknown export format '{0}' (expected bubble, dot or gexf)")]
    UnknownFormat(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_kind_matches_constructor() {
        assert_eq!(Record::edge("a", "b").kind(), RecordKind::Edge);
        assert_eq!(Record::set("p").kind(), RecordKind::Set);
        assert_eq!(Record::node("a").kind(), RecordKind::Node);
        assert_eq!(Record::inclusion("a", "p").kind(), RecordKind::In);
    }

    #[test]
    fn kinds_order_by_priority() {
        let mut kinds = vec![RecordKind::Error, RecordKind::Node, RecordKind::Edge];
        kinds.sort();
        assert_eq!(
            kinds,
            vec![RecordKind::Edge, RecordKind::Node, RecordKind::Error]
        );
    }

    #[test]
    fn payload_kinds() {
        assert!(RecordKind::In.is_payload());
        assert!(!RecordKind::Comment.is_payload());
        assert!(!RecordKind::Error.is_payload());
    }

    #[test]
    fn format_error_quotes_line() {
        let err = BubbleError::Format {
            line: "hello".to_string(),
        };
        assert_eq!(err.to_string(), "line is not bubble: \"hello\"");
    }
}
