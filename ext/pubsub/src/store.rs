//! `TopicStore` — Thread-safe per-topic capture of sent and received
//! messages.
//!
//! One coarse mutex guards the whole topic table: test message volumes are
//! small, so correctness wins over throughput. Every operation acquires the
//! lock for its own duration only; snapshots copy out under the lock so the
//! (potentially slow) matcher never runs while producers are blocked.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::Message;

/// Ordered sent/received capture for one topic.
#[derive(Debug, Clone, Default)]
struct Topic {
    sent: Vec<Message>,
    received: Vec<Message>,
}

/// Mutex-guarded table mapping topic name to captured messages.
///
/// Topics are created implicitly on first append. All methods take `&self`;
/// producers running concurrently with the test-script thread can append
/// through a shared reference.
///
/// # Example
///
/// ```
/// use attest_pubsub::{Message, TopicStore};
/// use serde_json::json;
///
/// let store = TopicStore::new();
/// store.record_received("orders", Message::new(json!({"id": 7})));
/// assert!(store.exists("orders"));
/// assert_eq!(store.received_snapshot("orders").len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct TopicStore {
    topics: Mutex<HashMap<String, Topic>>,
}

impl TopicStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to a topic's sent list, creating the topic if absent.
    /// Never fails.
    pub fn record_sent(&self, topic: &str, message: Message) {
        let mut topics = self.lock();
        topics.entry(topic.to_string()).or_default().sent.push(message);
    }

    /// Append to a topic's received list, creating the topic if absent.
    /// Never fails; safe to call from a producer context concurrent with
    /// the test-script thread.
    pub fn record_received(&self, topic: &str, message: Message) {
        let mut topics = self.lock();
        topics
            .entry(topic.to_string())
            .or_default()
            .received
            .push(message);
    }

    /// Returns `true` if the topic has been written to (or reset) before.
    #[must_use]
    pub fn exists(&self, topic: &str) -> bool {
        self.lock().contains_key(topic)
    }

    /// Names of all known topics, sorted for stable diagnostics.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Copy of the topic's received list at call time. Later appends never
    /// affect a snapshot already taken. Empty for an unknown topic.
    #[must_use]
    pub fn received_snapshot(&self, topic: &str) -> Vec<Message> {
        self.lock()
            .get(topic)
            .map(|t| t.received.clone())
            .unwrap_or_default()
    }

    /// Copy of the topic's sent list at call time.
    #[must_use]
    pub fn sent_snapshot(&self, topic: &str) -> Vec<Message> {
        self.lock()
            .get(topic)
            .map(|t| t.sent.clone())
            .unwrap_or_default()
    }

    /// Replace the topic's sent/received lists with empty ones. The topic
    /// stays registered. Resetting an unknown topic is a no-op and does not
    /// register it.
    pub fn reset(&self, topic: &str) {
        let mut topics = self.lock();
        if let Some(entry) = topics.get_mut(topic) {
            *entry = Topic::default();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Topic>> {
        // A poisoned lock only means a panicking appender; the table itself
        // stays consistent (appends are single push operations).
        self.topics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn msg(id: i64) -> Message {
        Message::new(json!({ "id": id }))
    }

    #[test]
    fn test_topics_created_implicitly() {
        let store = TopicStore::new();
        assert!(!store.exists("orders"));

        store.record_sent("orders", msg(1));
        assert!(store.exists("orders"));

        store.record_received("billing", msg(2));
        assert!(store.exists("billing"));
    }

    #[test]
    fn test_names_sorted() {
        let store = TopicStore::new();
        store.record_received("zebra", msg(1));
        store.record_received("alpha", msg(2));
        assert_eq!(store.names(), vec!["alpha".to_string(), "zebra".to_string()]);
    }

    #[test]
    fn test_snapshot_isolated_from_later_appends() {
        let store = TopicStore::new();
        store.record_received("orders", msg(1));

        let snapshot = store.received_snapshot("orders");
        store.record_received("orders", msg(2));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.received_snapshot("orders").len(), 2);
    }

    #[test]
    fn test_snapshot_of_unknown_topic_is_empty() {
        let store = TopicStore::new();
        assert!(store.received_snapshot("nope").is_empty());
        assert!(store.sent_snapshot("nope").is_empty());
    }

    #[test]
    fn test_sent_and_received_are_separate() {
        let store = TopicStore::new();
        store.record_sent("orders", msg(1));
        assert!(store.received_snapshot("orders").is_empty());
        assert_eq!(store.sent_snapshot("orders").len(), 1);
    }

    #[test]
    fn test_reset_clears_but_keeps_registration() {
        let store = TopicStore::new();
        store.record_sent("orders", msg(1));
        store.record_received("orders", msg(2));

        store.reset("orders");

        assert!(store.exists("orders"));
        assert!(store.sent_snapshot("orders").is_empty());
        assert!(store.received_snapshot("orders").is_empty());
    }

    #[test]
    fn test_reset_unknown_topic_is_noop() {
        let store = TopicStore::new();
        store.reset("ghost");
        assert!(!store.exists("ghost"));
    }

    #[test]
    fn test_concurrent_appends() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(TopicStore::new());
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..50 {
                        store.record_received("orders", msg(worker * 100 + i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("producer thread");
        }

        assert_eq!(store.received_snapshot("orders").len(), 200);
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TopicStore>();
    }
}
