//! `RestSession` — Request executor and single-slot response capture.
//!
//! Requests execute synchronously and in process against a [`Handler`]
//! under test: no socket, no timeout, the handler call is a direct blocking
//! invocation. The most recent response is captured verbatim (status plus
//! raw body bytes) and decoded lazily, only when a check runs.

use attest::{match_pattern, Pattern};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Response, StatusCode};
use std::sync::Arc;

use crate::report::{NullReporter, Record, RecordKind, Reporter};
use crate::RestError;

/// The system under test: an in-process HTTP handler.
///
/// Implemented by closures taking a request and returning a response:
///
/// ```
/// use attest_rest::Handler;
/// use http::{Request, Response};
///
/// let handler = |_req: Request<Vec<u8>>| {
///     Response::builder()
///         .status(200)
///         .body(br#"{"ok":true}"#.to_vec())
///         .unwrap()
/// };
/// fn assert_handler(_: &impl Handler) {}
/// assert_handler(&handler);
/// ```
pub trait Handler: Send + Sync {
    /// Handle one request, blocking until the response is ready.
    fn handle(&self, request: Request<Vec<u8>>) -> Response<Vec<u8>>;
}

impl<F> Handler for F
where
    F: Fn(Request<Vec<u8>>) -> Response<Vec<u8>> + Send + Sync,
{
    fn handle(&self, request: Request<Vec<u8>>) -> Response<Vec<u8>> {
        self(request)
    }
}

/// An outgoing request body.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Raw text, attached as-is.
    Text(String),
    /// A structured value, serialized to canonical JSON before sending.
    Structured(serde_json::Value),
}

/// The captured result of the most recent send: status code plus raw body
/// bytes, kept verbatim until a check decodes them.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl CapturedResponse {
    /// The captured status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The raw body bytes, exactly as the handler returned them.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// One REST session: handler under test, accumulated headers, and the
/// single response slot. Owned by one test run and discarded at its end.
pub struct RestSession {
    handler: Arc<dyn Handler>,
    headers: HeaderMap,
    response: Option<CapturedResponse>,
    reporter: Box<dyn Reporter>,
}

impl RestSession {
    /// Create a session around the handler under test, with diagnostics
    /// discarded.
    pub fn new(handler: impl Handler + 'static) -> Self {
        Self::with_reporter(handler, Box::new(NullReporter))
    }

    /// Create a session that forwards request/response diagnostics to the
    /// given sink.
    pub fn with_reporter(handler: impl Handler + 'static, reporter: Box<dyn Reporter>) -> Self {
        Self {
            handler: Arc::new(handler),
            headers: HeaderMap::new(),
            response: None,
            reporter,
        }
    }

    /// Append a header to the outgoing set.
    ///
    /// Headers accumulate: they are attached to every subsequent request
    /// until changed, and adding the same key twice yields multiple values.
    ///
    /// # Errors
    ///
    /// [`RestError::RequestConstruction`] on an invalid name or value.
    pub fn add_header(&mut self, key: &str, value: &str) -> Result<(), RestError> {
        let name = HeaderName::try_from(key).map_err(|e| RestError::RequestConstruction {
            source: e.to_string(),
        })?;
        let value = HeaderValue::try_from(value).map_err(|e| RestError::RequestConstruction {
            source: e.to_string(),
        })?;
        self.headers.append(name, value);
        Ok(())
    }

    /// Execute a request against the handler under test and capture its
    /// response.
    ///
    /// Any previously captured response is invalidated first, so a stale
    /// response can never satisfy a later check — even if this send fails.
    ///
    /// # Errors
    ///
    /// - [`RestError::Serialization`] if a structured body cannot be
    ///   serialized
    /// - [`RestError::RequestConstruction`] on an invalid method/path pair
    pub fn send(
        &mut self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<(), RestError> {
        self.response = None;

        let body_content = match body {
            None => String::new(),
            Some(RequestBody::Text(text)) => text,
            Some(RequestBody::Structured(value)) => serde_json::to_string(&value)
                .map_err(|e| self.fail(RestError::Serialization {
                    source: e.to_string(),
                }))?,
        };

        let mut request_info = format!("{method} {path}");
        if !body_content.is_empty() {
            request_info.push_str("\n\n");
            request_info.push_str(&body_content);
        }
        self.reporter.record(Record {
            kind: RecordKind::Request,
            title: "HTTP Request".to_string(),
            content: request_info,
            language: "text",
        });

        let mut request = Request::builder()
            .method(method.clone())
            .uri(path)
            .body(body_content.into_bytes())
            .map_err(|e| self.fail(RestError::RequestConstruction {
                source: e.to_string(),
            }))?;
        request.headers_mut().extend(self.headers.clone());

        tracing::debug!(%method, path, "executing in-process request");
        let response = self.handler.handle(request);
        let (parts, body) = response.into_parts();
        let captured = CapturedResponse {
            status: parts.status,
            body,
        };

        self.reporter.record(Record {
            kind: RecordKind::Response,
            title: format!("HTTP Response ({})", captured.status.as_u16()),
            content: captured.body_text(),
            language: "json",
        });
        tracing::debug!(status = captured.status.as_u16(), "response captured");

        self.response = Some(captured);
        Ok(())
    }

    /// Validate the captured response against an expected status and body
    /// pattern. The matcher is applied once — there is exactly one
    /// response, so there is nothing to retry across.
    ///
    /// # Errors
    ///
    /// - [`RestError::SendNotCalled`] if no response is captured
    /// - [`RestError::StatusMismatch`] if status codes differ
    /// - [`RestError::Decode`] if the body is not valid JSON
    /// - [`RestError::ResponseMismatch`] with the full mismatch list
    pub fn check(&self, status: u16, expected: &Pattern) -> Result<(), RestError> {
        let Some(response) = &self.response else {
            return Err(RestError::SendNotCalled);
        };

        if response.status.as_u16() != status {
            return Err(RestError::StatusMismatch {
                expected: status,
                actual: response.status.as_u16(),
                body: response.body_text(),
            });
        }

        let decoded: serde_json::Value =
            serde_json::from_slice(&response.body).map_err(|e| RestError::Decode {
                source: e.to_string(),
            })?;

        match_pattern(expected, &decoded)?;
        Ok(())
    }

    /// The captured response, if a send has completed.
    #[must_use]
    pub fn response(&self) -> Option<&CapturedResponse> {
        self.response.as_ref()
    }

    /// The currently accumulated outgoing headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Report a send failure to the sink, then hand the error back.
    fn fail(&self, error: RestError) -> RestError {
        self.reporter.record(Record {
            kind: RecordKind::Error,
            title: "Request failed".to_string(),
            content: error.to_string(),
            language: "text",
        });
        error
    }
}

impl std::fmt::Debug for RestSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestSession")
            .field("headers", &self.headers)
            .field("has_response", &self.response.is_some())
            .finish()
    }
}
