//! # Format Primitives
//!
//! Hardcoded constants of the bubble format.
//!
//! The line grammar is fixed: these patterns are compiled once and never
//! change at runtime.
//!
//! ## Record Patterns
//!
//! Patterns are anchored and matched in declaration order; the first match
//! wins. A line matched by none of them is an `ERROR` record.

use crate::RecordKind;

/// Non-negative decimal weight, as accepted on EDGE and SET lines.
pub const WEIGHT_PATTERN: &str = r"[0-9]*\.?[0-9]+";

/// `EDGE <source> <target> <weight>`
pub const EDGE_PATTERN: &str = r"^EDGE\t([^\t]+)\t([^\t]+)\t[0-9]*\.?[0-9]+$";

/// `SET <name> <weight>`
pub const SET_PATTERN: &str = r"^SET\t([^\t]+)\t[0-9]*\.?[0-9]+$";

/// `IN <contained> <container>`
pub const IN_PATTERN: &str = r"^IN\t([^\t]+)\t([^\t]+)$";

/// `NODE <name>`
pub const NODE_PATTERN: &str = r"^NODE\t([^\t]+)$";

/// Optional leading whitespace, then `#`.
pub const COMMENT_PATTERN: &str = r"^\s*#.*$";

/// Nothing at all.
pub const EMPTY_PATTERN: &str = r"^$";

/// Ordered classification rules. ERROR is the implicit fallback.
pub const RECORD_PATTERNS: [(&str, RecordKind); 6] = [
    (EDGE_PATTERN, RecordKind::Edge),
    (SET_PATTERN, RecordKind::Set),
    (IN_PATTERN, RecordKind::In),
    (NODE_PATTERN, RecordKind::Node),
    (COMMENT_PATTERN, RecordKind::Comment),
    (EMPTY_PATTERN, RecordKind::Empty),
];

/// Weight written on EDGE and SET lines when serializing a model.
///
/// The model does not keep weights, so every exported line carries this one.
pub const DEFAULT_WEIGHT: &str = "1.0";

/// Label of the sibling group made of the roots, used in diagnostics.
pub const TOP_LEVEL: &str = "top level";
