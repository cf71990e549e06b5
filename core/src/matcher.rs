//! Structural matching of an actual value against a partial pattern.
//!
//! [`match_pattern`] is a pure function: no shared state, no side effects,
//! safe to call concurrently. Subset semantics throughout — only what the
//! pattern specifies constrains the actual value — and mismatch
//! accumulation: comparison continues across sibling fields and elements so
//! one pass surfaces every discrepancy.

use serde_json::Value;

use crate::{MatchFailure, Mismatch, Pattern};

/// Match an actual (decoded, dynamically shaped) value against a partially
/// specified pattern.
///
/// # Rules
///
/// - An empty map or empty sequence pattern matches any value of any shape
///   (vacuous subset match).
/// - `Map`: the actual value must be an object; every pattern key must be
///   present and match recursively. Extra actual keys are ignored.
/// - `Seq`: the actual value must be an array of the same length; elements
///   are compared pairwise by position.
/// - Scalars: same JSON kind, equal value. Numbers compare by numeric
///   value, so `1` matches `1.0`.
/// - `OneOf`: the actual value must be a string equal to one of the
///   allowed literals.
///
/// # Errors
///
/// Returns a [`MatchFailure`] carrying every mismatch found, in traversal
/// order. The caller decides whether any mismatch is fatal.
///
/// # Example
///
/// ```
/// use attest::{match_pattern, Pattern};
/// use serde_json::json;
///
/// let pattern = Pattern::from(json!({"id": 1}));
/// let actual = json!({"id": 1, "name": "Ann"});
/// assert!(match_pattern(&pattern, &actual).is_ok());
///
/// let failure = match_pattern(&Pattern::from(json!({"id": 2})), &actual).unwrap_err();
/// assert!(failure.has_path("$.id"));
/// ```
pub fn match_pattern(expected: &Pattern, actual: &Value) -> Result<(), MatchFailure> {
    let mut walker = Walker::default();
    walker.compare(expected, actual);
    if walker.mismatches.is_empty() {
        Ok(())
    } else {
        Err(MatchFailure::new(walker.mismatches))
    }
}

/// Path segments and accumulated mismatches for one traversal.
#[derive(Default)]
struct Walker {
    path: Vec<Segment>,
    mismatches: Vec<Mismatch>,
}

enum Segment {
    Key(String),
    Index(usize),
}

impl Walker {
    fn compare(&mut self, expected: &Pattern, actual: &Value) {
        match expected {
            // Vacuous patterns first: the scripting surface cannot
            // distinguish an empty map from an empty list, so both match
            // anything.
            Pattern::Map(entries) if entries.is_empty() => {}
            Pattern::Seq(items) if items.is_empty() => {}

            Pattern::Map(entries) => self.compare_map(expected, entries, actual),
            Pattern::Seq(items) => self.compare_seq(expected, items, actual),

            Pattern::Null => {
                if !actual.is_null() {
                    self.record(expected, actual);
                }
            }
            Pattern::Bool(want) => {
                if actual.as_bool() != Some(*want) {
                    self.record(expected, actual);
                }
            }
            Pattern::Number(want) => {
                // Numeric value comparison, not textual: JSON decoding may
                // produce 1.0 where the pattern says 1.
                let equal = match (want.as_f64(), actual.as_f64()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                };
                if !equal {
                    self.record(expected, actual);
                }
            }
            Pattern::String(want) => {
                if actual.as_str() != Some(want.as_str()) {
                    self.record(expected, actual);
                }
            }
            Pattern::OneOf(literals) => {
                let hit = actual
                    .as_str()
                    .is_some_and(|s| literals.iter().any(|lit| lit == s));
                if !hit {
                    self.record(expected, actual);
                }
            }
        }
    }

    fn compare_map(
        &mut self,
        expected: &Pattern,
        entries: &std::collections::BTreeMap<String, Pattern>,
        actual: &Value,
    ) {
        let Some(object) = actual.as_object() else {
            self.record(expected, actual);
            return;
        };
        for (key, want) in entries {
            self.path.push(Segment::Key(key.clone()));
            match object.get(key) {
                Some(got) => self.compare(want, got),
                None => self.record_rendered(want.to_string(), "<missing>".to_string()),
            }
            self.path.pop();
        }
    }

    fn compare_seq(&mut self, expected: &Pattern, items: &[Pattern], actual: &Value) {
        let Some(array) = actual.as_array() else {
            self.record(expected, actual);
            return;
        };
        if array.len() != items.len() {
            self.record_rendered(
                format!("sequence of length {}", items.len()),
                format!("sequence of length {}", array.len()),
            );
            return;
        }
        for (index, (want, got)) in items.iter().zip(array).enumerate() {
            self.path.push(Segment::Index(index));
            self.compare(want, got);
            self.path.pop();
        }
    }

    fn record(&mut self, expected: &Pattern, actual: &Value) {
        self.record_rendered(expected.to_string(), actual.to_string());
    }

    fn record_rendered(&mut self, expected: String, actual: String) {
        self.mismatches.push(Mismatch {
            path: self.render_path(),
            expected,
            actual,
        });
    }

    fn render_path(&self) -> String {
        use std::fmt::Write as _;

        let mut out = String::from("$");
        for segment in &self.path {
            match segment {
                Segment::Key(key) => {
                    let _ = write!(out, ".{key}");
                }
                Segment::Index(index) => {
                    let _ = write!(out, "[{index}]");
                }
            }
        }
        out
    }
}
