//! # Line Classifier
//!
//! Turns raw bubble lines into typed [`Record`]s.
//!
//! - Ordered rules, first match wins
//! - Every line gets exactly one kind; `ERROR` is the fallback
//! - Malformed lines are data, never a failure of this module

use crate::primitives::RECORD_PATTERNS;
use crate::{Record, RecordKind};
use regex::Regex;
use std::sync::LazyLock;

/// Compiled classification rules, in priority order.
///
/// The patterns are constants; a rule that failed to compile would only
/// send more lines to the ERROR fallback.
static RULES: LazyLock<Vec<(Regex, RecordKind)>> = LazyLock::new(|| {
    RECORD_PATTERNS
        .iter()
        .filter_map(|(pattern, kind)| {
            Regex::new(pattern)
                .map_err(|e| tracing::error!("invalid record pattern {}: {}", pattern, e))
                .ok()
                .map(|regex| (regex, *kind))
        })
        .collect()
});

/// Classify a single line.
///
/// The line is matched as-is: trailing whitespace is significant.
#[must_use]
pub fn classify(line: &str) -> Record {
    for (regex, kind) in RULES.iter() {
        let Some(caps) = regex.captures(line) else {
            continue;
        };
        let field = |i: usize| caps.get(i).map_or_else(String::new, |m| m.as_str().to_string());
        return match kind {
            RecordKind::Edge => Record::Edge {
                source: field(1),
                target: field(2),
            },
            RecordKind::Set => Record::Set { name: field(1) },
            RecordKind::In => Record::In {
                contained: field(1),
                container: field(2),
            },
            RecordKind::Node => Record::Node { name: field(1) },
            RecordKind::Comment => Record::Comment,
            RecordKind::Empty => Record::Empty,
            RecordKind::Error => Record::Error {
                raw: line.to_string(),
            },
        };
    }
    Record::Error {
        raw: line.to_string(),
    }
}

/// Kind of a single line, without extracting its fields.
#[must_use]
pub fn kind_of(line: &str) -> RecordKind {
    RULES
        .iter()
        .find(|(regex, _)| regex.is_match(line))
        .map_or(RecordKind::Error, |(_, kind)| *kind)
}

/// Split a text buffer into bubble lines.
///
/// Trailing whitespace is removed and blank lines are skipped, the way
/// bubble files are read.
pub fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim_end).filter(|line| !line.is_empty())
}

/// Classify every line of a sequence.
pub fn classify_all<'a, I>(lines: I) -> impl Iterator<Item = Record>
where
    I: IntoIterator<Item = &'a str>,
{
    lines.into_iter().map(classify)
}

// =============================================================================
// TESTS
// =============================================================================
