//! Field values, ordered records and entity snapshots handed over by the host.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::serializer::{format_date, format_datetime, format_zoned_datetime};

/// A single field value of an entity snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    /// Date-time without zone information (local time of the host).
    DateTime(NaiveDateTime),
    ZonedDateTime(DateTime<FixedOffset>),
    List(Vec<Value>),
    Record(Record),
    /// A host value that has no JSON encoding (binary attachments, handles...).
    /// Serializing it always fails.
    Unsupported { type_name: String },
}

impl Value {
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Value::Unsupported {
            type_name: type_name.into(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) if !f.is_finite() => Err(S::Error::custom(format!(
                "non-finite float {} has no JSON encoding",
                f
            ))),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&format_date(d)),
            Value::DateTime(dt) => serializer.serialize_str(&format_datetime(dt)),
            Value::ZonedDateTime(dt) => serializer.serialize_str(&format_zoned_datetime(dt)),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Record(record) => record.serialize(serializer),
            Value::Unsupported { type_name } => Err(S::Error::custom(format!(
                "value of type `{}` has no JSON encoding",
                type_name
            ))),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(dt: DateTime<Tz>) -> Self {
        Value::ZonedDateTime(dt.fixed_offset())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<EntityKey> for Value {
    fn from(key: EntityKey) -> Self {
        match key {
            EntityKey::Id(id) => Value::Int(id),
            EntityKey::Name(name) => Value::Text(name),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Insertion-ordered mapping from field name to value.
///
/// Inserting a key that already exists replaces the value in place, so the
/// field keeps its original position in the serialized object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        record.extend(iter);
        record
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Record {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Mapping from field name to the value it had before a change.
pub type ChangeRecord = Record;

/// Stable identifying key of an entity: numeric for tickets, a name for wiki pages.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Id(i64),
    Name(String),
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Id(id) => write!(f, "{}", id),
            EntityKey::Name(name) => f.write_str(name),
        }
    }
}

impl Serialize for EntityKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntityKey::Id(id) => serializer.serialize_i64(*id),
            EntityKey::Name(name) => serializer.serialize_str(name),
        }
    }
}

impl From<i64> for EntityKey {
    fn from(id: i64) -> Self {
        EntityKey::Id(id)
    }
}

impl From<i32> for EntityKey {
    fn from(id: i32) -> Self {
        EntityKey::Id(id.into())
    }
}

impl From<&str> for EntityKey {
    fn from(name: &str) -> Self {
        EntityKey::Name(name.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(name: String) -> Self {
        EntityKey::Name(name)
    }
}

/// Full state of an entity at one point in time, plus its key.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    key: EntityKey,
    fields: Record,
}

impl Snapshot {
    pub fn new(key: impl Into<EntityKey>, fields: Record) -> Self {
        Self {
            key: key.into(),
            fields,
        }
    }

    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    pub fn fields(&self) -> &Record {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}
