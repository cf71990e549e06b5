//! attest-pubsub: Faked pub/sub domain for attest
//!
//! Messages are locally captured, never sent over a network. A producer
//! (possibly concurrent with the test-script thread) records messages as
//! they "arrive"; the script later checks that at least one received
//! message matches a declared pattern.
//!
//! # Example
//!
//! ```
//! use attest::Pattern;
//! use attest_pubsub::{Message, PubSub};
//! use serde_json::json;
//!
//! let pubsub = PubSub::new();
//! pubsub.receive("orders", Message::new(json!({"id": 7})));
//!
//! let expected = Pattern::from(json!({"data": {"id": 7}}));
//! assert!(pubsub.check("orders", &expected).is_ok());
//! ```

use std::fmt;

mod check;
mod message;
mod store;

pub use check::CheckError;
pub use message::Message;
pub use store::TopicStore;

/// Callback observing every published message. May fail; the failure
/// propagates to the publisher.
pub type PublishHook =
    Box<dyn Fn(&str, &Message) -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send + Sync>;

/// The pub/sub runtime surface for one test run.
///
/// Owns the topic store plus an optional publish hook. All methods take
/// `&self`; wrap in `Arc` to share with producer threads. One instance per
/// executing test file — discarded, not persisted, at end of run.
#[derive(Default)]
pub struct PubSub {
    store: TopicStore,
    on_publish: Option<PublishHook>,
}

impl PubSub {
    /// Create a runtime with no publish hook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runtime whose hook observes every published message.
    #[must_use]
    pub fn with_publish_hook(hook: PublishHook) -> Self {
        Self {
            store: TopicStore::new(),
            on_publish: Some(hook),
        }
    }

    /// The underlying topic store.
    #[must_use]
    pub fn store(&self) -> &TopicStore {
        &self.store
    }

    /// Record a message as sent on `topic` and invoke the publish hook.
    ///
    /// The message is recorded before the hook runs, so a failing hook
    /// still leaves the capture intact for diagnostics.
    ///
    /// # Errors
    ///
    /// Propagates the hook's failure, if any.
    pub fn publish(
        &self,
        topic: &str,
        message: Message,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.store.record_sent(topic, message.clone());
        tracing::debug!(topic, "message published");
        if let Some(hook) = &self.on_publish {
            hook(topic, &message)?;
        }
        Ok(())
    }

    /// Record a message as received on `topic`. Never fails; callable from
    /// a producer context concurrent with the test-script thread.
    pub fn receive(&self, topic: &str, message: Message) {
        self.store.record_received(topic, message);
        tracing::debug!(topic, "message received");
    }

    /// Reset the topic's sent/received lists if the topic exists.
    pub fn empty_topic(&self, topic: &str) {
        self.store.reset(topic);
    }
}

impl fmt::Debug for PubSub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PubSub")
            .field("topics", &self.store.names())
            .field("has_publish_hook", &self.on_publish.is_some())
            .finish()
    }
}
