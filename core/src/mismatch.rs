//! Mismatch accumulation — every discrepancy found in one pass.
//!
//! The matcher never aborts on the first failed comparison; it records a
//! [`Mismatch`] and continues with sibling fields and elements. A failed
//! match therefore surfaces as a [`MatchFailure`] carrying the complete
//! list, one line per mismatch, so a human gets one useful diagnostic
//! instead of the first arbitrary difference.

use std::fmt;

/// One discrepancy between a pattern and an actual value.
///
/// `path` locates the discrepancy from the tree root in a JSONPath-like
/// form: `$` for the root, `$.data.id` for map keys, `$.items[2]` for
/// sequence positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Location of the discrepancy, from the root.
    pub path: String,
    /// Rendered form of what the pattern required.
    pub expected: String,
    /// Rendered form of what the actual value held.
    pub actual: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.path, self.expected, self.actual
        )
    }
}

/// A failed match: a non-empty, ordered list of mismatches.
///
/// Ordering follows the traversal order of the pattern (map keys in
/// lexicographic order, sequence elements by position), so output is
/// deterministic for a given pattern/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFailure {
    mismatches: Vec<Mismatch>,
}

impl MatchFailure {
    /// Build a failure from accumulated mismatches.
    ///
    /// Callers must pass at least one mismatch; an empty list is a
    /// successful match, not a failure.
    #[must_use]
    pub(crate) fn new(mismatches: Vec<Mismatch>) -> Self {
        debug_assert!(!mismatches.is_empty());
        Self { mismatches }
    }

    /// The accumulated mismatches, in traversal order.
    #[must_use]
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// Number of mismatches found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mismatches.len()
    }

    /// Always `false`: a `MatchFailure` carries at least one mismatch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Returns `true` if any mismatch is located at the given path.
    #[must_use]
    pub fn has_path(&self, path: &str) -> bool {
        self.mismatches.iter().any(|m| m.path == path)
    }
}

/// One mismatch per line, in traversal order.
impl fmt::Display for MatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mismatch) in self.mismatches.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{mismatch}")?;
        }
        Ok(())
    }
}

impl std::error::Error for MatchFailure {}
