//! The host environment as seen by this crate.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::channel::ChannelNamer;
use crate::config::{Config, PublisherOptions, CLIENT_COMPONENT};
use crate::error::Error;
use crate::gateway::{Gateway, SharedGateway};

/// An environment: its name (the `<env>` channel segment), its configuration
/// and, once the client component is enabled, the shared gateway.
pub struct Environment {
    name: String,
    config: Config,
    gateway: Option<SharedGateway>,
}

impl Environment {
    pub fn new(name: impl Into<String>, config: Config) -> Self {
        Self {
            name: name.into(),
            config,
            gateway: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve `[redis_client]` and install a [`RedisGateway`] built from it.
    ///
    /// [`RedisGateway`]: crate::gateway::RedisGateway
    #[cfg(feature = "redis")]
    pub fn enable_redis_client(&mut self) -> Result<(), Error> {
        let options = crate::config::RedisClientOptions::from_config(&self.config)?;
        let gateway = crate::gateway::RedisGateway::new(&options)?;
        info!(env = %self.name, address = %gateway.address(), "redis client enabled");
        self.gateway = Some(Arc::new(gateway));
        Ok(())
    }

    /// Install an already constructed gateway in place of the Redis client.
    pub fn install_gateway(&mut self, gateway: impl Gateway + 'static) {
        info!(env = %self.name, "gateway installed");
        self.gateway = Some(Arc::new(gateway));
    }

    pub fn has_gateway(&self) -> bool {
        self.gateway.is_some()
    }

    /// The shared gateway, on behalf of `component`.
    pub fn require_gateway(&self, component: &str) -> Result<SharedGateway, Error> {
        self.gateway
            .clone()
            .ok_or_else(|| Error::DependencyNotEnabled {
                component: component.to_string(),
                required: CLIENT_COMPONENT.name.to_string(),
            })
    }

    pub fn channel_namer(&self) -> Result<ChannelNamer, Error> {
        let options = PublisherOptions::from_config(&self.config)?;
        Ok(ChannelNamer::new(options.channel_prefix, self.name.clone()))
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("gateway", &self.gateway.is_some())
            .finish()
    }
}
