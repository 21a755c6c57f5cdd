//! Realm event streams: translate lifecycle events into channel messages and
//! publish them through the shared gateway.

use tracing::debug;

use crate::channel::ChannelNamer;
use crate::dispatch::ChangeListener;
use crate::environment::Environment;
use crate::error::Error;
use crate::event::EventKind;
use crate::gateway::{Gateway, Message, SharedGateway};
use crate::realm::{Realm, TicketRealm, WikiRealm};
use crate::serializer::{to_json, SerializationError};
use crate::value::{ChangeRecord, Record, Snapshot, Value};

/// Publishes the lifecycle events of one realm.
pub struct EventStream<R: Realm> {
    realm: R,
    namer: ChannelNamer,
    gateway: SharedGateway,
}

pub type TicketStream = EventStream<TicketRealm>;
pub type WikiStream = EventStream<WikiRealm>;

impl<R: Realm + Default> EventStream<R> {
    /// Build the stream from an environment.
    ///
    /// Fails with [`Error::DependencyNotEnabled`] when the environment has no
    /// gateway, and with [`Error::Configuration`] when the channel prefix
    /// cannot be resolved.
    pub fn new(env: &Environment) -> Result<Self, Error> {
        let realm = R::default();
        let gateway = env.require_gateway(&format!("redispub.{}", realm.name()))?;
        let namer = env.channel_namer()?;
        Ok(Self::with_gateway(realm, namer, gateway))
    }
}

impl<R: Realm> EventStream<R> {
    pub fn with_gateway(realm: R, namer: ChannelNamer, gateway: SharedGateway) -> Self {
        Self {
            realm,
            namer,
            gateway,
        }
    }

    pub fn namer(&self) -> &ChannelNamer {
        &self.namer
    }

    /// Message for a created entity; channel `…<realm>.created`.
    pub fn created_message(&self, snapshot: &Snapshot) -> Result<Message, SerializationError> {
        let channel = self.namer.channel(self.realm.name(), EventKind::Created, None);
        Ok(Message::new(channel, to_json(&self.realm.record(snapshot))?))
    }

    /// Message for a changed entity; channel `…<realm>.changed.<key>`.
    ///
    /// `new_values` holds exactly the fields of `change`, valued from the
    /// current snapshot (`""` for fields the snapshot no longer has).
    pub fn changed_message(
        &self,
        snapshot: &Snapshot,
        change: &ChangeRecord,
        author: &str,
        comment: &str,
    ) -> Result<Message, SerializationError> {
        let new_values: Record = change
            .keys()
            .map(|field| {
                let current = snapshot.get(field).cloned().unwrap_or_else(|| Value::from(""));
                (field, current)
            })
            .collect();

        let payload = self
            .realm
            .change_preamble(snapshot, change)
            .with(self.realm.key_field(), snapshot.key().clone())
            .with("new_values", new_values)
            .with("old_values", change.clone())
            .with("author", author)
            .with("comment", comment);

        let channel = self
            .namer
            .channel(self.realm.name(), EventKind::Changed, Some(snapshot.key()));
        Ok(Message::new(channel, to_json(&payload)?))
    }

    /// Message for a deleted entity; same payload shape as `created`, built
    /// from the snapshot taken just before removal.
    pub fn deleted_message(&self, snapshot: &Snapshot) -> Result<Message, SerializationError> {
        let channel = self.namer.channel(self.realm.name(), EventKind::Deleted, None);
        Ok(Message::new(channel, to_json(&self.realm.record(snapshot))?))
    }

    fn publish(&self, message: Message) -> Result<Message, Error> {
        self.gateway.publish(&message.channel, &message.payload)?;
        debug!(realm = self.realm.name(), channel = %message.channel, "event published");
        Ok(message)
    }
}

impl<R: Realm> ChangeListener for EventStream<R> {
    fn realm(&self) -> &str {
        self.realm.name()
    }

    fn on_created(&self, snapshot: &Snapshot) -> Result<Message, Error> {
        self.publish(self.created_message(snapshot)?)
    }

    fn on_changed(
        &self,
        snapshot: &Snapshot,
        change: &ChangeRecord,
        author: &str,
        comment: &str,
    ) -> Result<Message, Error> {
        self.publish(self.changed_message(snapshot, change, author, comment)?)
    }

    fn on_deleted(&self, snapshot: &Snapshot) -> Result<Message, Error> {
        self.publish(self.deleted_message(snapshot)?)
    }
}
