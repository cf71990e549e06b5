//! Retry-across-candidates check policy.
//!
//! Topics are fan-in buffers: several messages may have accumulated before
//! the assertion runs, and the test should not have to know which one
//! corresponds to its expectation. The check tries the matcher against each
//! received message in arrival order and succeeds on the first hit; if none
//! hits, every candidate's mismatch list is reported.
//!
//! The check inspects only messages already present at call time — it never
//! polls or waits for a message that might arrive later. Deliberate
//! simplicity/latency trade-off; the producer is assumed to have run before
//! the check is invoked.

use attest::{match_pattern, MatchFailure, Pattern};
use std::fmt;

use crate::PubSub;

/// A failed topic check. Terminal for the invoking test script.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckError {
    /// The topic was never written to or reset. A usage error, not an
    /// assertion failure; carries the topics that do exist.
    UnregisteredTopic {
        /// The requested topic name.
        topic: String,
        /// Currently known topic names, sorted.
        known: Vec<String>,
    },
    /// The topic exists but its received list was empty at call time.
    NoMessagesReceived {
        /// The checked topic name.
        topic: String,
    },
    /// Every received message was tried and none matched.
    NoMatchingMessage {
        /// The checked topic name.
        topic: String,
        /// One failure per candidate, in arrival order.
        attempts: Vec<MatchFailure>,
    },
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnregisteredTopic { topic, known } => {
                write!(f, "topic {topic:?} not registered, has: {known:?}")
            }
            Self::NoMessagesReceived { topic } => {
                write!(f, "no messages received on topic {topic:?}")
            }
            Self::NoMatchingMessage { topic, attempts } => {
                writeln!(f, "no matching messages received on topic {topic:?}:")?;
                for (i, attempt) in attempts.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "candidate {i}:\n{attempt}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CheckError {}

impl PubSub {
    /// Check that at least one message received on `topic` matches the
    /// expected pattern.
    ///
    /// Candidates are tried in arrival order against
    /// `{"data": body, "attributes": attributes}`; the first match wins and
    /// remaining candidates are not tried. A matched message is not
    /// consumed — later checks on the same topic can match it again.
    ///
    /// # Errors
    ///
    /// - [`CheckError::UnregisteredTopic`] if the topic is unknown
    /// - [`CheckError::NoMessagesReceived`] if nothing was received yet
    /// - [`CheckError::NoMatchingMessage`] with every candidate's mismatch
    ///   list if all candidates fail
    pub fn check(&self, topic: &str, expected: &Pattern) -> Result<(), CheckError> {
        let store = self.store();
        if !store.exists(topic) {
            return Err(CheckError::UnregisteredTopic {
                topic: topic.to_string(),
                known: store.names(),
            });
        }

        // Snapshot under the lock, match outside it.
        let candidates = store.received_snapshot(topic);
        if candidates.is_empty() {
            return Err(CheckError::NoMessagesReceived {
                topic: topic.to_string(),
            });
        }

        let mut attempts = Vec::with_capacity(candidates.len());
        for message in &candidates {
            match match_pattern(expected, &message.candidate_value()) {
                Ok(()) => {
                    tracing::debug!(topic, candidates = candidates.len(), "topic check matched");
                    return Ok(());
                }
                Err(failure) => attempts.push(failure),
            }
        }

        Err(CheckError::NoMatchingMessage {
            topic: topic.to_string(),
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;
    use serde_json::json;

    fn pattern(value: serde_json::Value) -> Pattern {
        Pattern::from(value)
    }

    #[test]
    fn test_unregistered_topic_lists_known() {
        let pubsub = PubSub::new();
        pubsub.receive("orders", Message::new(json!({})));
        pubsub.receive("billing", Message::new(json!({})));

        let err = pubsub.check("ghost", &pattern(json!({}))).unwrap_err();
        match err {
            CheckError::UnregisteredTopic { topic, known } => {
                assert_eq!(topic, "ghost");
                assert_eq!(known, vec!["billing".to_string(), "orders".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_topic_fails_with_no_messages() {
        let pubsub = PubSub::new();
        pubsub.receive("orders", Message::new(json!({"id": 7})));
        pubsub.empty_topic("orders");

        let err = pubsub.check("orders", &pattern(json!({}))).unwrap_err();
        assert!(matches!(err, CheckError::NoMessagesReceived { .. }));
    }

    #[test]
    fn test_first_matching_candidate_wins() {
        let pubsub = PubSub::new();
        pubsub.receive("orders", Message::new(json!({"id": 1})));
        pubsub.receive("orders", Message::new(json!({"id": 2})));

        // Only the second message matches; success is order-independent.
        assert!(pubsub
            .check("orders", &pattern(json!({"data": {"id": 2}})))
            .is_ok());
    }

    #[test]
    fn test_no_match_reports_every_candidate() {
        let pubsub = PubSub::new();
        pubsub.receive("orders", Message::new(json!({"id": 1})));
        pubsub.receive("orders", Message::new(json!({"id": 2})));

        let err = pubsub
            .check("orders", &pattern(json!({"data": {"id": 3}})))
            .unwrap_err();
        match &err {
            CheckError::NoMatchingMessage { attempts, .. } => assert_eq!(attempts.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }

        // Display carries both candidates' mismatch text.
        let text = err.to_string();
        assert!(text.contains("candidate 0"));
        assert!(text.contains("candidate 1"));
        assert!(text.contains("$.data.id"));
    }

    #[test]
    fn test_attributes_participate_in_matching() {
        let pubsub = PubSub::new();
        pubsub.receive(
            "orders",
            Message::new(json!({"id": 7})).with_attribute("source", "checkout"),
        );

        assert!(pubsub
            .check(
                "orders",
                &pattern(json!({"data": {"id": 7}, "attributes": {"source": "checkout"}})),
            )
            .is_ok());
        assert!(pubsub
            .check(
                "orders",
                &pattern(json!({"attributes": {"source": "warehouse"}})),
            )
            .is_err());
    }

    #[test]
    fn test_matched_messages_are_reusable() {
        let pubsub = PubSub::new();
        pubsub.receive("orders", Message::new(json!({"id": 7})));

        let wanted = pattern(json!({"data": {"id": 7}}));
        assert!(pubsub.check("orders", &wanted).is_ok());
        assert!(pubsub.check("orders", &wanted).is_ok());
    }
}
