//! Errors from the REST session.
//!
//! All variants are terminal for the current test-script invocation: the
//! policy is fail-fast with a maximally informative message. Ordinary
//! mismatches are values, never panics.

use attest::MatchFailure;
use std::fmt;

/// A failed send or check on the REST session.
#[derive(Debug)]
pub enum RestError {
    /// `check` was called with no captured response.
    SendNotCalled,
    /// The captured status code differs from the expected one.
    StatusMismatch {
        /// The status the test declared.
        expected: u16,
        /// The status the handler returned.
        actual: u16,
        /// Raw response body, for diagnostics.
        body: String,
    },
    /// The captured body could not be decoded as JSON.
    Decode {
        /// The underlying decode error message.
        source: String,
    },
    /// A structured request body could not be serialized.
    Serialization {
        /// The underlying serialization error message.
        source: String,
    },
    /// The request could not be constructed (bad method, path, or header).
    RequestConstruction {
        /// The underlying construction error message.
        source: String,
    },
    /// The decoded response body did not match the expected pattern.
    ResponseMismatch(MatchFailure),
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SendNotCalled => write!(f, "send not called"),
            Self::StatusMismatch {
                expected,
                actual,
                body,
            } => {
                write!(
                    f,
                    "expected response code {expected}, got {actual}\n{body}"
                )
            }
            Self::Decode { source } => write!(f, "unable to decode response: {source}"),
            Self::Serialization { source } => {
                write!(f, "unable to serialize request body: {source}")
            }
            Self::RequestConstruction { source } => {
                write!(f, "unable to construct request: {source}")
            }
            Self::ResponseMismatch(failure) => write!(f, "{failure}"),
        }
    }
}

impl std::error::Error for RestError {}

impl From<MatchFailure> for RestError {
    fn from(failure: MatchFailure) -> Self {
        Self::ResponseMismatch(failure)
    }
}
