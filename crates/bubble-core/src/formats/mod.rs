//! # Export Formats
//!
//! Text renderings of a finished [`PowerGraph`].
//!
//! Renderers only read the public accessors of the model. File output is
//! the app layer's business.
//!
//! - `bubble`: re-serialisation, reloadable
//! - `dot`: Graphviz, powernodes as nested clusters
//! - `gexf`: GEXF 1.2 draft, powernodes as nested nodes
//!
//! Containment is walked recursively with a visited set, so cyclic
//! containment renders every identifier once and terminates.

pub mod bubble;
pub mod dot;
pub mod gexf;

use crate::{BubbleError, PowerGraph};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use bubble::to_bubble;
pub use dot::to_dot;
pub use gexf::to_gexf;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Bubble,
    #[default]
    Dot,
    Gexf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Bubble, ExportFormat::Dot, ExportFormat::Gexf];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Bubble => "bubble",
            ExportFormat::Dot => "dot",
            ExportFormat::Gexf => "gexf",
        }
    }

    /// Conventional file extension, without the dot.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Bubble => "bbl",
            ExportFormat::Dot => "dot",
            ExportFormat::Gexf => "gexf",
        }
    }

    /// Guess a format from a file extension (case-insensitive).
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "bbl" | "bubble" => Some(ExportFormat::Bubble),
            "dot" | "gv" => Some(ExportFormat::Dot),
            "gexf" => Some(ExportFormat::Gexf),
            _ => None,
        }
    }

    /// Render a graph in this format.
    ///
    /// `declarations` only affects the bubble format: it prepends NODE and
    /// SET lines so isolated nodes and empty powernodes survive a reload.
    #[must_use]
    pub fn render(&self, graph: &PowerGraph, declarations: bool) -> String {
        match self {
            ExportFormat::Bubble => to_bubble(graph, declarations),
            ExportFormat::Dot => to_dot(graph),
            ExportFormat::Gexf => to_gexf(graph),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = BubbleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bubble" | "bbl" => Ok(ExportFormat::Bubble),
            "dot" => Ok(ExportFormat::Dot),
            "gexf" => Ok(ExportFormat::Gexf),
            _ => Err(BubbleError::UnknownFormat(s.to_string())),
        }
    }
}

// =============================================================================
// SHARED TRAVERSAL
// =============================================================================

/// Identifiers to start rendering from: roots first, then whatever the
/// roots do not reach (cyclic containment, members of a NODE-declared
/// container), powernodes before nodes. Renderers skip what they already
/// visited.
fn top_level(graph: &PowerGraph) -> impl Iterator<Item = &str> {
    graph
        .roots()
        .iter()
        .map(String::as_str)
        .chain(graph.powernodes())
        .chain(graph.nodes())
}

/// Edges to render: every pair when oriented, each unordered pair once
/// otherwise.
fn edge_pairs(graph: &PowerGraph) -> Vec<(&str, &str)> {
    graph
        .edges()
        .iter()
        .flat_map(|(source, targets)| {
            targets
                .iter()
                .map(move |target| (source.as_str(), target.as_str()))
        })
        .filter(|(source, target)| graph.oriented() || source <= target)
        .collect()
}

fn is_powernode(graph: &PowerGraph, id: &str) -> bool {
    graph.is_powernode(id).unwrap_or(false)
}

// =============================================================================
// TESTS
// =============================================================================
