//! # bubble-core
//!
//! The deterministic power-graph engine behind the `bubble` tool.
//!
//! This crate reads the bubble line format, builds the power-graph model
//! (nodes, nested powernodes, edges), validates its structure, and renders
//! it to text formats.
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network, no file I/O (the app layer reads and
//!   writes files)
//! - Deterministic: `BTreeMap`/`BTreeSet` only, so every accessor and
//!   every diagnostic comes out in a stable order
//! - A built model is immutable

// =============================================================================
// MODULES
// =============================================================================

pub mod classifier;
pub mod formats;
pub mod graph;
pub mod metrics;
pub mod primitives;
pub mod tree;
pub mod types;
pub mod validator;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{BubbleError, Record, RecordKind};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use classifier::{classify, classify_all, kind_of, lines};
pub use graph::{Adjacency, Walk, complete, detect_cycle, reverse, walk};
pub use metrics::PowerGraphMetrics;
pub use tree::{Components, PowerGraph, PowerGraphBuilder, Powernode, SerializablePowerGraph};
pub use validator::{Diagnostic, Level, has_errors, validate};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{ExportFormat, to_bubble, to_dot, to_gexf};
