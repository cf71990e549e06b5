//! End-to-end topic check scenarios, including a concurrent producer.

use attest::Pattern;
use attest_pubsub::{CheckError, Message, PubSub};
use serde_json::json;
use std::sync::Arc;
use std::thread;

#[test]
fn orders_scenario() {
    let pubsub = PubSub::new();
    pubsub.receive("orders", Message::new(json!({"id": 7})));

    let expected = Pattern::from(json!({"data": {"id": 7}}));
    assert!(pubsub.check("orders", &expected).is_ok());

    // After emptying the topic the same check reports an empty topic,
    // not an unregistered one.
    pubsub.empty_topic("orders");
    let err = pubsub.check("orders", &expected).unwrap_err();
    assert!(matches!(err, CheckError::NoMessagesReceived { .. }));
}

#[test]
fn later_candidate_satisfies_the_check() {
    let pubsub = PubSub::new();
    pubsub.receive("orders", Message::new(json!({"id": 1})));
    pubsub.receive("orders", Message::new(json!({"id": 2})));

    // m1 does not match; m2 does. The check is order-independent.
    let expected = Pattern::from(json!({"data": {"id": 2}}));
    assert!(pubsub.check("orders", &expected).is_ok());
}

#[test]
fn failure_text_covers_every_candidate() {
    let pubsub = PubSub::new();
    pubsub.receive("orders", Message::new(json!({"id": 1})));
    pubsub.receive("orders", Message::new(json!({"id": 2})));

    let expected = Pattern::from(json!({"data": {"id": 3}}));
    let text = pubsub.check("orders", &expected).unwrap_err().to_string();
    assert!(text.contains("expected 3, got 1"));
    assert!(text.contains("expected 3, got 2"));
}

#[test]
fn unregistered_topic_is_a_usage_error() {
    let pubsub = PubSub::new();
    pubsub.receive("billing", Message::new(json!({})));

    let err = pubsub
        .check("orders", &Pattern::from(json!({})))
        .unwrap_err();
    let text = err.to_string();
    assert!(text.contains("orders"));
    assert!(text.contains("billing"));
}

#[test]
fn producer_thread_delivers_before_check() {
    let pubsub = Arc::new(PubSub::new());

    // A delivery simulator appending from its own thread, as the runtime
    // does while the system under test publishes asynchronously.
    let producer = {
        let pubsub = Arc::clone(&pubsub);
        thread::spawn(move || {
            for id in 0..10 {
                pubsub.receive(
                    "orders",
                    Message::new(json!({"id": id})).with_attribute("seq", id.to_string()),
                );
            }
        })
    };
    producer.join().expect("producer thread");

    let expected = Pattern::from(json!({"data": {"id": 9}, "attributes": {"seq": "9"}}));
    assert!(pubsub.check("orders", &expected).is_ok());
}
