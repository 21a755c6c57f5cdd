//! Publisher gateway - the only path from the core to the broker.
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │ TicketStream │   │  WikiStream  │   one per realm
//! └──────┬───────┘   └──────┬───────┘
//!        └────────┬─────────┘
//!                 ▼
//!      SharedGateway (Arc<dyn Gateway>)
//!                 │
//!     ┌───────────┼────────────────┐
//!     ▼           ▼                ▼
//! RedisGateway  InMemoryGateway  LogGateway
//! (PUBLISH)     (tests)          (dry runs)
//! ```

mod in_memory;
mod log;
#[cfg(feature = "redis")]
mod redis_gateway;

pub use in_memory::InMemoryGateway;
pub use log::LogGateway;
#[cfg(feature = "redis")]
pub use redis_gateway::RedisGateway;

use std::sync::Arc;

use thiserror::Error;

use crate::channel::ChannelName;

/// A translated event: the channel to publish on and the JSON payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub channel: ChannelName,
    pub payload: String,
}

impl Message {
    pub fn new(channel: ChannelName, payload: String) -> Self {
        Self { channel, payload }
    }
}

/// Error type for publish operations.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The broker could not be reached.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// The broker answered but refused the command.
    #[error("publish rejected: {0}")]
    Rejected(String),
    /// A previous publish panicked while holding the connection.
    #[error("gateway lock poisoned")]
    Poisoned,
}

/// Publishes payloads on broker channels.
///
/// Implementations must be safe to share between every realm stream of the
/// process; if the underlying client is not, they serialize internally.
pub trait Gateway: Send + Sync {
    fn publish(&self, channel: &ChannelName, payload: &str) -> Result<(), PublishError>;
}

/// The one gateway instance shared by every stream of a process.
pub type SharedGateway = Arc<dyn Gateway>;

impl<G: Gateway + ?Sized> Gateway for Arc<G> {
    fn publish(&self, channel: &ChannelName, payload: &str) -> Result<(), PublishError> {
        (**self).publish(channel, payload)
    }
}
