//! Diagnostic records for human-readable request/response reporting.
//!
//! The session formats one [`Record`] per request, response, or error and
//! hands it to a [`Reporter`]; what happens to it (terminal, log file, test
//! report) is the sink's business, never interpreted here.

use std::sync::{Mutex, PoisonError};

/// What a diagnostic record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// An outgoing simulated request.
    Request,
    /// A captured response.
    Response,
    /// A failure while constructing or executing a request.
    Error,
}

/// One human-readable diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// What this record describes.
    pub kind: RecordKind,
    /// Short heading, e.g. `"HTTP Response (200)"`.
    pub title: String,
    /// The formatted payload.
    pub content: String,
    /// Rendering hint for the sink (`"text"`, `"json"`).
    pub language: &'static str,
}

/// Sink receiving diagnostic records.
pub trait Reporter: Send + Sync {
    /// Consume one record.
    fn record(&self, record: Record);
}

/// Discards every record. The default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn record(&self, _record: Record) {}
}

/// Retains records in memory, for tests asserting on diagnostics.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    records: Mutex<Vec<Record>>,
}

impl MemoryReporter {
    /// Create an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all records received so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Reporter for MemoryReporter {
    fn record(&self, record: Record) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}

impl<R: Reporter + ?Sized> Reporter for std::sync::Arc<R> {
    fn record(&self, record: Record) {
        (**self).record(record);
    }
}
