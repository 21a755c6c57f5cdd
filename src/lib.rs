//! Publish issue-tracker lifecycle events on Redis pub/sub channels.
//!
//! Ticket and wiki events are translated into a channel name and a JSON
//! payload and handed to a single, shared [`gateway::Gateway`]:
//!
//! | event | channel | payload |
//! |---|---|---|
//! | created | `<prefix>.<env>.<realm>.created` | entity fields with its key |
//! | changed | `<prefix>.<env>.<realm>.changed.<key>` | key, `new_values`, `old_values`, `author`, `comment` |
//! | deleted | `<prefix>.<env>.<realm>.deleted` | same as created |
//!
//! ```ignore
//! let mut env = Environment::new("myproj", Config::load("conf/redispub.toml")?);
//! let dispatcher = Plugin::load(&mut env)?;
//! dispatcher.dispatch(&LifecycleEvent::created("ticket", snapshot))?;
//! ```

mod channel;
pub mod config;
mod dispatch;
mod environment;
mod error;
mod event;
pub mod gateway;
mod plugin;
mod realm;
pub mod serializer;
mod stream;
mod value;

pub use channel::{channel_name, ChannelName, ChannelNamer};
pub use config::{Config, ConfigError, PublisherOptions, RedisClientOptions};
pub use dispatch::{ChangeListener, Dispatcher};
pub use environment::Environment;
pub use error::Error;
pub use event::{EventKind, LifecycleEvent};
pub use gateway::{Gateway, Message, PublishError, SharedGateway};
pub use plugin::Plugin;
pub use realm::{Realm, TicketRealm, WikiRealm, WIKI_PAGE_FIELDS};
pub use serializer::{to_json, SerializationError};
pub use stream::{EventStream, TicketStream, WikiStream};
pub use value::{ChangeRecord, EntityKey, Record, Snapshot, Value};
