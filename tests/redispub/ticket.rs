//! Ticket realm end to end through the dispatcher.

use redispub::{Error, LifecycleEvent, PublishError, Record, Snapshot, Value};
use serde_json::json;

use crate::support::{harness, json, ticket};

#[test]
fn created_ticket_is_published_on_realm_channel() {
    let h = harness(Some("trac"));

    h.dispatcher
        .dispatch(&LifecycleEvent::created("ticket", ticket(1, "new")))
        .unwrap();

    let message = h.gateway.last_on("trac.myproj.ticket.created").unwrap();
    assert_eq!(message.payload, r#"{"id":1,"summary":"Fix bug","status":"new"}"#);
}

#[test]
fn changed_ticket_is_published_on_keyed_channel() {
    let h = harness(Some("trac"));
    let change = Record::new().with("status", "new");

    h.dispatcher
        .dispatch(&LifecycleEvent::changed("ticket", ticket(1, "closed"), change, "alice", "done"))
        .unwrap();

    assert_eq!(h.gateway.channels(), vec!["trac.myproj.ticket.changed.1"]);
    assert_eq!(
        h.gateway.messages()[0].payload,
        r#"{"id":1,"new_values":{"status":"closed"},"old_values":{"status":"new"},"author":"alice","comment":"done"}"#
    );
}

#[test]
fn new_values_keys_equal_change_keys() {
    let h = harness(None);
    let snapshot = Snapshot::new(
        5,
        Record::new()
            .with("summary", "Crash")
            .with("status", "assigned")
            .with("owner", "carol"),
    );
    let change = Record::new()
        .with("owner", "")
        .with("status", "new")
        .with("keywords", "old");

    h.dispatcher
        .dispatch(&LifecycleEvent::changed("ticket", snapshot, change, "carol", ""))
        .unwrap();

    let payload = json(&h.gateway.messages()[0].payload);
    assert_eq!(
        payload["new_values"],
        json!({"owner": "carol", "status": "assigned", "keywords": ""})
    );
    assert_eq!(
        payload["old_values"],
        json!({"owner": "", "status": "new", "keywords": "old"})
    );
}

#[test]
fn deleted_payload_matches_created_payload() {
    let h = harness(Some("trac"));
    let snapshot = ticket(9, "closed");

    h.dispatcher
        .dispatch(&LifecycleEvent::created("ticket", snapshot.clone()))
        .unwrap();
    h.dispatcher
        .dispatch(&LifecycleEvent::deleted("ticket", snapshot))
        .unwrap();

    let messages = h.gateway.messages();
    assert_eq!(messages[0].payload, messages[1].payload);
    assert_eq!(
        h.gateway.channels(),
        vec!["trac.myproj.ticket.created", "trac.myproj.ticket.deleted"]
    );
}

#[test]
fn empty_prefix_drops_the_segment() {
    let h = harness(Some(""));
    h.dispatcher
        .dispatch(&LifecycleEvent::created("ticket", ticket(1, "new")))
        .unwrap();
    assert_eq!(h.gateway.channels(), vec!["myproj.ticket.created"]);
}

#[test]
fn events_publish_in_dispatch_order() {
    let h = harness(Some("trac"));
    for status in ["new", "assigned", "closed"] {
        let change = Record::new().with("status", "previous");
        h.dispatcher
            .dispatch(&LifecycleEvent::changed("ticket", ticket(2, status), change, "a", ""))
            .unwrap();
    }

    let statuses: Vec<serde_json::Value> = h
        .gateway
        .messages()
        .iter()
        .map(|m| json(&m.payload)["new_values"]["status"].clone())
        .collect();
    assert_eq!(statuses, vec![json!("new"), json!("assigned"), json!("closed")]);
}

#[test]
fn unsupported_field_aborts_the_event() {
    let h = harness(Some("trac"));
    let snapshot = Snapshot::new(
        1,
        Record::new().with("attachment", Value::unsupported("AttachmentStream")),
    );

    let err = h
        .dispatcher
        .dispatch(&LifecycleEvent::created("ticket", snapshot))
        .unwrap_err();

    assert!(matches!(err, Error::Serialization(_)));
    assert!(h.gateway.is_empty());
}

#[test]
fn broker_failure_reaches_the_host() {
    let h = harness(Some("trac"));
    h.gateway.fail_with("MISCONF");

    let err = h
        .dispatcher
        .dispatch(&LifecycleEvent::deleted("ticket", ticket(1, "new")))
        .unwrap_err();

    assert!(matches!(err, Error::Publish(PublishError::Rejected(ref r)) if r == "MISCONF"));
}
