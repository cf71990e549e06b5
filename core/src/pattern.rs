//! `Pattern` — The expected-value tree supplied by a test.
//!
//! A pattern has the same shape as a decoded JSON value (map, sequence,
//! scalar) and is read as a *partial* specification: fields absent from the
//! pattern never constrain the actual value, fields present in the pattern
//! must match. The one variant with no JSON counterpart is [`Pattern::OneOf`],
//! an allowed-literal-set constraint for string values.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::MAX_DEPTH;

/// A partially specified expected-value tree.
///
/// Built from a decoded JSON value via `From<serde_json::Value>`, or
/// programmatically. `OneOf` can only be constructed through the API —
/// it has no JSON representation.
///
/// # Example
///
/// ```
/// use attest::Pattern;
/// use serde_json::json;
///
/// let pattern = Pattern::from(json!({"id": 1}));
/// assert!(pattern.is_map());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// JSON null.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar. Compared by numeric value, not textual form.
    Number(serde_json::Number),
    /// String scalar.
    String(String),
    /// Allowed-literal-set constraint: the actual value must be a string
    /// equal to one of these literals.
    OneOf(Vec<String>),
    /// Ordered sequence, compared element-wise by position.
    Seq(Vec<Pattern>),
    /// Map with subset semantics: only the keys present here constrain
    /// the actual value.
    Map(BTreeMap<String, Pattern>),
}

impl Pattern {
    /// Create an allowed-literal-set pattern.
    ///
    /// # Example
    ///
    /// ```
    /// use attest::Pattern;
    ///
    /// let method = Pattern::one_of(["GET", "POST"]);
    /// ```
    pub fn one_of<I, S>(literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(literals.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if this is the `Map` variant.
    #[inline]
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Returns `true` if this is the `Seq` variant.
    #[inline]
    #[must_use]
    pub fn is_seq(&self) -> bool {
        matches!(self, Self::Seq(_))
    }

    /// Returns `true` for a pattern that constrains nothing: an empty map
    /// or an empty sequence.
    ///
    /// The scripting surface this serves cannot distinguish an empty map
    /// from an empty list, so both are vacuous (they match any value of
    /// any shape).
    #[must_use]
    pub fn is_vacuous(&self) -> bool {
        match self {
            Self::Map(m) => m.is_empty(),
            Self::Seq(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Calculate the maximum nesting depth of this pattern tree.
    ///
    /// Scalars and `OneOf` have depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) | Self::OneOf(_) => 1,
            Self::Seq(items) => 1 + items.iter().map(Pattern::depth).max().unwrap_or(0),
            Self::Map(entries) => 1 + entries.values().map(Pattern::depth).max().unwrap_or(0),
        }
    }

    /// Validate this pattern against safety constraints.
    ///
    /// Call at pattern construction time, before matching; matching itself
    /// never fails on a valid pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::DepthExceeded`] if nesting exceeds
    /// [`MAX_DEPTH`].
    pub fn validate(&self) -> Result<(), PatternError> {
        let depth = self.depth();
        if depth > MAX_DEPTH {
            return Err(PatternError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        Ok(())
    }
}

impl From<Value> for Pattern {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Seq(items.into_iter().map(Pattern::from).collect()),
            Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Pattern::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for Pattern {
    fn from(value: &Value) -> Self {
        Pattern::from(value.clone())
    }
}

/// Renders a compact JSON-like form, used in mismatch descriptions.
/// `OneOf` renders as `one_of["a","b"]`.
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::OneOf(literals) => {
                write!(f, "one_of[")?;
                for (i, lit) in literals.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{lit:?}")?;
                }
                write!(f, "]")
            }
            Self::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{key:?}:{value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Errors from pattern validation.
///
/// Caught before matching; a validated pattern never fails structurally
/// at match time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Pattern nesting exceeds [`MAX_DEPTH`].
    DepthExceeded {
        /// Actual depth of the pattern tree.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DepthExceeded { depth, max } => {
                write!(
                    f,
                    "pattern nesting depth is {depth}, but maximum allowed is {max}"
                )
            }
        }
    }
}

impl std::error::Error for PatternError {}
