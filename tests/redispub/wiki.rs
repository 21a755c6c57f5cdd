//! Wiki realm end to end through the dispatcher.

use redispub::{LifecycleEvent, Record};
use serde_json::json;

use crate::support::{harness, json, page};

#[test]
fn created_page_carries_page_attributes() {
    let h = harness(Some("trac"));

    h.dispatcher
        .dispatch(&LifecycleEvent::created("wiki", page("Home", 1, "hello")))
        .unwrap();

    let message = h.gateway.last_on("trac.myproj.wiki.created").unwrap();
    assert_eq!(
        message.payload,
        r#"{"name":"Home","version":1,"time":"2018-03-02T12:31:28.184283","author":"somebody","text":"hello","comment":"edit comment","readonly":0}"#
    );
}

#[test]
fn changed_page_is_keyed_by_name_and_carries_old_text() {
    let h = harness(Some("trac"));
    let change = Record::new().with("text", "old").with("version", 1);

    h.dispatcher
        .dispatch(&LifecycleEvent::changed(
            "wiki",
            page("Home", 2, "new"),
            change,
            "somebody",
            "edit comment",
        ))
        .unwrap();

    assert_eq!(h.gateway.channels(), vec!["trac.myproj.wiki.changed.Home"]);
    let payload = json(&h.gateway.messages()[0].payload);
    assert_eq!(payload["name"], json!("Home"));
    assert_eq!(payload["version"], json!(2));
    assert_eq!(payload["text"], json!("new"));
    assert_eq!(payload["old_text"], json!("old"));
    assert_eq!(payload["new_values"], json!({"text": "new", "version": 2}));
    assert_eq!(payload["old_values"], json!({"text": "old", "version": 1}));
}

#[test]
fn deleted_page_is_built_from_the_hook_snapshot() {
    let h = harness(Some("trac"));

    h.dispatcher
        .dispatch(&LifecycleEvent::created("wiki", page("Scratch", 1, "first")))
        .unwrap();
    h.dispatcher
        .dispatch(&LifecycleEvent::deleted("wiki", page("Sandbox", 4, "gone")))
        .unwrap();

    let message = h.gateway.last_on("trac.myproj.wiki.deleted").unwrap();
    let payload = json(&message.payload);
    assert_eq!(payload["name"], json!("Sandbox"));
    assert_eq!(payload["text"], json!("gone"));

    let created = json(&h.gateway.messages()[0].payload);
    let created_keys: Vec<&String> = created.as_object().unwrap().keys().collect();
    let deleted_keys: Vec<&String> = payload.as_object().unwrap().keys().collect();
    assert_eq!(created_keys.len(), deleted_keys.len());
    for key in created_keys {
        assert!(payload.get(key).is_some(), "deleted payload lacks {key}");
    }
}
