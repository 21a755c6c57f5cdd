//! Dispatcher - routes host lifecycle events to the listeners of their realm.
//!
//! The host does not know about concrete streams; it hands every event to the
//! dispatcher, which looks listeners up by capability and realm.
//!
//! ```ignore
//! let dispatcher = Dispatcher::new()
//!     .register(TicketStream::new(&env)?)
//!     .register(WikiStream::new(&env)?);
//!
//! dispatcher.dispatch(&LifecycleEvent::created("ticket", snapshot))?;
//! ```

use crate::error::Error;
use crate::event::LifecycleEvent;
use crate::gateway::Message;
use crate::value::{ChangeRecord, Snapshot};

/// Capability set of a lifecycle listener.
pub trait ChangeListener: Send + Sync {
    /// Realm whose events this listener handles.
    fn realm(&self) -> &str;

    fn on_created(&self, snapshot: &Snapshot) -> Result<Message, Error>;

    fn on_changed(
        &self,
        snapshot: &Snapshot,
        change: &ChangeRecord,
        author: &str,
        comment: &str,
    ) -> Result<Message, Error>;

    /// `snapshot` is the entity as it was right before deletion.
    fn on_deleted(&self, snapshot: &Snapshot) -> Result<Message, Error>;
}

/// Registry of listeners.
#[derive(Default)]
pub struct Dispatcher {
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Returns `self` for chaining.
    pub fn register<L: ChangeListener + 'static>(mut self, listener: L) -> Self {
        self.add(listener);
        self
    }

    pub fn add<L: ChangeListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    /// Realms that have at least one listener, in registration order.
    pub fn realms(&self) -> Vec<&str> {
        let mut realms: Vec<&str> = Vec::new();
        for listener in &self.listeners {
            if !realms.contains(&listener.realm()) {
                realms.push(listener.realm());
            }
        }
        realms
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Hand `event` to every listener of its realm, in registration order.
    ///
    /// Stops at the first failure and returns it; messages already published
    /// by earlier listeners stay published. An event for a realm nobody
    /// listens to yields no messages.
    pub fn dispatch(&self, event: &LifecycleEvent) -> Result<Vec<Message>, Error> {
        self.listeners
            .iter()
            .filter(|listener| listener.realm() == event.realm())
            .map(|listener| match event {
                LifecycleEvent::Created { snapshot, .. } => listener.on_created(snapshot),
                LifecycleEvent::Changed {
                    snapshot,
                    change,
                    author,
                    comment,
                    ..
                } => listener.on_changed(snapshot, change, author, comment),
                LifecycleEvent::Deleted { snapshot, .. } => listener.on_deleted(snapshot),
            })
            .collect()
    }
}
