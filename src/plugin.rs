//! Plug-in loader: enables the components named in `[components]` and wires
//! the realm streams to the shared gateway.
//!
//! ```toml
//! [components]
//! "redispub.client" = "enabled"
//! "redispub.ticket" = "enabled"
//! "redispub.wiki" = "disabled"
//! ```
//!
//! Component keys contain a dot and must be quoted in TOML. Every component
//! is enabled when the section is absent. With `[redispub] dry_run` switched
//! on, the client component logs each publish instead of connecting.

use tracing::info;

use crate::config::{self, PublisherOptions, CLIENT_COMPONENT, TICKET_COMPONENT, WIKI_COMPONENT};
use crate::dispatch::Dispatcher;
use crate::environment::Environment;
use crate::error::Error;
use crate::gateway::LogGateway;
use crate::stream::{TicketStream, WikiStream};

pub struct Plugin;

impl Plugin {
    /// Validate the whole configuration, enable the broker client (or the
    /// dry-run log) unless a gateway is already installed, and register the
    /// enabled streams.
    ///
    /// A stream enabled while the client is disabled fails with
    /// [`Error::DependencyNotEnabled`].
    pub fn load(env: &mut Environment) -> Result<Dispatcher, Error> {
        config::validate(env.config())?;

        if CLIENT_COMPONENT.is_enabled(env.config())? && !env.has_gateway() {
            if PublisherOptions::from_config(env.config())?.dry_run {
                env.install_gateway(LogGateway::new());
            } else {
                Self::enable_client(env)?;
            }
        }

        let mut dispatcher = Dispatcher::new();
        if TICKET_COMPONENT.is_enabled(env.config())? {
            dispatcher.add(TicketStream::new(env)?);
        }
        if WIKI_COMPONENT.is_enabled(env.config())? {
            dispatcher.add(WikiStream::new(env)?);
        }

        info!(env = env.name(), realms = ?dispatcher.realms(), "redispub loaded");
        Ok(dispatcher)
    }

    #[cfg(feature = "redis")]
    fn enable_client(env: &mut Environment) -> Result<(), Error> {
        env.enable_redis_client()
    }

    // Without the redis feature the host has to install a gateway itself.
    #[cfg(not(feature = "redis"))]
    fn enable_client(_env: &mut Environment) -> Result<(), Error> {
        Ok(())
    }
}
