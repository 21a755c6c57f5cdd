//! In-memory gateway for tests and single-process embedding.

use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use super::{Gateway, Message, PublishError};
use crate::channel::ChannelName;

/// Records every published message in order.
///
/// Clones share the same log, so a test can hand one clone to the streams
/// and inspect another.
///
/// ```
/// use redispub::gateway::{Gateway, InMemoryGateway};
/// use redispub::{channel_name, EventKind};
///
/// let gateway = InMemoryGateway::new();
/// let channel = channel_name("trac", "proj", "ticket", EventKind::Created, None);
/// gateway.publish(&channel, r#"{"id":1}"#).unwrap();
///
/// assert_eq!(gateway.channels(), vec!["trac.proj.ticket.created".to_string()]);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryGateway {
    log: Arc<RwLock<Vec<Message>>>,
    /// When set, every publish fails with `Rejected(reason)`.
    failure: Arc<Mutex<Option<String>>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent publishes fail with `PublishError::Rejected(reason)`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(reason.into());
    }

    /// Let subsequent publishes succeed again.
    pub fn recover(&self) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// All published messages, oldest first.
    pub fn messages(&self) -> Vec<Message> {
        self.log.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Channel names in publish order.
    pub fn channels(&self) -> Vec<String> {
        self.log
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|m| m.channel.to_string())
            .collect()
    }

    /// Most recent message published on `channel`.
    pub fn last_on(&self, channel: &str) -> Option<Message> {
        self.log
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .rev()
            .find(|m| m.channel.as_str() == channel)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.log.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.log.write().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Gateway for InMemoryGateway {
    fn publish(&self, channel: &ChannelName, payload: &str) -> Result<(), PublishError> {
        if let Some(reason) = self
            .failure
            .lock()
            .map_err(|_| PublishError::Poisoned)?
            .clone()
        {
            return Err(PublishError::Rejected(reason));
        }
        debug!(channel = %channel, bytes = payload.len(), "recorded in-memory publish");
        self.log
            .write()
            .map_err(|_| PublishError::Poisoned)?
            .push(Message::new(channel.clone(), payload.to_string()));
        Ok(())
    }
}
