//! Realm definitions: which snapshot fields a realm publishes, and under
//! which key.

use crate::value::{ChangeRecord, Record, Snapshot, Value};

/// Per-realm payload shape.
pub trait Realm: Send + Sync {
    /// Realm token used in channel names, e.g. `ticket`.
    fn name(&self) -> &'static str;

    /// Output key carrying the entity key (`id`, `name`).
    fn key_field(&self) -> &'static str;

    /// Entity record published on `created` and `deleted`, key field first.
    fn record(&self, snapshot: &Snapshot) -> Record;

    /// Fields placed ahead of the change envelope on `changed`.
    fn change_preamble(&self, _snapshot: &Snapshot, _change: &ChangeRecord) -> Record {
        Record::new()
    }
}

/// Tickets: `id` plus every field of the snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct TicketRealm;

impl Realm for TicketRealm {
    fn name(&self) -> &'static str {
        "ticket"
    }

    fn key_field(&self) -> &'static str {
        "id"
    }

    fn record(&self, snapshot: &Snapshot) -> Record {
        let mut record = Record::new().with("id", snapshot.key().clone());
        record.extend(snapshot.fields().iter().map(|(k, v)| (k, v.clone())));
        // a snapshot field called `id` must not shadow the ticket key
        record.insert("id", snapshot.key().clone());
        record
    }
}

/// Page attributes published for every wiki event, after `name`.
pub const WIKI_PAGE_FIELDS: &[&str] = &["version", "time", "author", "text", "comment", "readonly"];

/// Wiki pages: a fixed attribute set; changes also carry `old_text`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WikiRealm;

impl Realm for WikiRealm {
    fn name(&self) -> &'static str {
        "wiki"
    }

    fn key_field(&self) -> &'static str {
        "name"
    }

    fn record(&self, snapshot: &Snapshot) -> Record {
        let mut record = Record::new().with("name", snapshot.key().clone());
        for field in WIKI_PAGE_FIELDS {
            record.insert(*field, snapshot.get(field).cloned().unwrap_or_default());
        }
        record
    }

    fn change_preamble(&self, snapshot: &Snapshot, change: &ChangeRecord) -> Record {
        let old_text = snapshot
            .get("old_text")
            .or_else(|| change.get("text"))
            .cloned()
            .unwrap_or_else(|| Value::from(""));
        self.record(snapshot).with("old_text", old_text)
    }
}
