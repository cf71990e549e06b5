//! attest-rest: In-process HTTP domain for attest
//!
//! Executes simulated requests directly against a handler under test — no
//! network socket, no routing — and captures the most recent response for
//! pattern-based checking. Exactly one response is "current" per session;
//! each send replaces it.
//!
//! # Example
//!
//! ```
//! use attest::Pattern;
//! use attest_rest::RestSession;
//! use http::{Method, Request, Response};
//! use serde_json::json;
//!
//! let handler = |_req: Request<Vec<u8>>| {
//!     Response::builder()
//!         .status(200)
//!         .body(br#"{"id":1,"name":"Ann"}"#.to_vec())
//!         .unwrap()
//! };
//!
//! let mut session = RestSession::new(handler);
//! session.send(Method::GET, "/users/1", None).unwrap();
//! assert!(session.check(200, &Pattern::from(json!({"id": 1}))).is_ok());
//! ```

mod error;
mod report;
mod session;

pub use error::RestError;
pub use report::{MemoryReporter, NullReporter, Record, RecordKind, Reporter};
pub use session::{CapturedResponse, Handler, RequestBody, RestSession};

// The wire types come straight from the `http` crate; re-export the two the
// session surface needs so callers don't have to depend on it directly.
pub use http::{Method, StatusCode};
