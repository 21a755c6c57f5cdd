//! Channel naming: `[prefix.]env[.realm].kind[.key]`.
//!
//! Subscribers depend on this layout to pattern-subscribe per realm
//! (`trac.myproj.ticket.changed.*`) or to the non-keyed variants
//! (`trac.myproj.ticket.created`).

use std::fmt;

use crate::event::EventKind;
use crate::value::EntityKey;

/// A fully built channel name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChannelName(String);

impl ChannelName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build a channel name.
///
/// `prefix` and `realm` are omitted when empty; `env` is always present and
/// must be non-empty. `key`, when given and non-empty, becomes the last
/// segment.
pub fn channel_name(
    prefix: &str,
    env: &str,
    realm: &str,
    kind: EventKind,
    key: Option<&EntityKey>,
) -> ChannelName {
    let mut channel = kind.as_str().to_string();
    if !realm.is_empty() {
        channel = format!("{}.{}", realm, channel);
    }
    channel = format!("{}.{}", env, channel);
    if !prefix.is_empty() {
        channel = format!("{}.{}", prefix, channel);
    }
    if let Some(key) = key.map(EntityKey::to_string).filter(|k| !k.is_empty()) {
        channel = format!("{}.{}", channel, key);
    }
    ChannelName(channel)
}

/// The process-wide `(prefix, env)` pair shared by every realm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelNamer {
    prefix: String,
    env: String,
}

impl ChannelNamer {
    pub fn new(prefix: impl Into<String>, env: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            env: env.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn channel(&self, realm: &str, kind: EventKind, key: Option<&EntityKey>) -> ChannelName {
        channel_name(&self.prefix, &self.env, realm, kind, key)
    }
}
