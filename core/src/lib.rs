//! attest — structural assertion matching for integration-test runtimes
//!
//! A pure matching engine that compares an actual (decoded, dynamically
//! shaped) JSON value against a *partially specified* expected pattern.
//!
//! # Architecture
//!
//! - [`Pattern`] — Closed tagged-union expected-value tree (map, sequence,
//!   scalars, plus an allowed-literal-set [`Pattern::OneOf`] constraint)
//! - [`match_pattern`] — Pure comparison with subset semantics
//! - [`Mismatch`] / [`MatchFailure`] — Failure aggregation: every
//!   discrepancy found in one pass, each with a path from the tree root
//!
//! # Key Design Insights
//!
//! 1. **Subset semantics**: absence of a key in the pattern never causes a
//!    mismatch; presence requires a recursive match. A test declares only
//!    the fields it cares about.
//!
//! 2. **Accumulate, don't abort**: a failed comparison records one entry
//!    and continues with sibling fields and elements, so a single check
//!    surfaces every mismatch instead of the first arbitrary one.
//!
//! 3. **No shared state**: matching is a pure function, safe to call
//!    concurrently from any thread.
//!
//! # Example
//!
//! ```
//! use attest::{match_pattern, Pattern};
//! use serde_json::json;
//!
//! let pattern = Pattern::from(json!({"id": 1}));
//! let actual = json!({"id": 1, "name": "Ann"});
//!
//! // Extra fields in the actual value are ignored.
//! assert!(match_pattern(&pattern, &actual).is_ok());
//!
//! // A differing field fails with its path from the root.
//! let failure = match_pattern(&Pattern::from(json!({"id": 2})), &actual).unwrap_err();
//! assert_eq!(failure.to_string(), "$.id: expected 2, got 1");
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod matcher;
mod mismatch;
mod pattern;

#[cfg(feature = "fixtures")]
pub mod fixture;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use matcher::match_pattern;
pub use mismatch::{MatchFailure, Mismatch};
pub use pattern::{Pattern, PatternError};

/// Prelude module for convenient imports.
///
/// ```
/// use attest::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{match_pattern, MatchFailure, Mismatch, Pattern, PatternError};
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed depth for nested patterns.
///
/// Protects against stack overflow from deeply nested expectations.
/// Validate at pattern construction time via [`Pattern::validate`].
pub const MAX_DEPTH: usize = 32;
