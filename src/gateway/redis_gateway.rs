//! Redis-backed gateway.

use std::sync::Mutex;

use redis::{Client, Commands, Connection, ConnectionAddr, ConnectionInfo, RedisConnectionInfo, RedisError};
use tracing::{debug, warn};

use super::{Gateway, PublishError};
use crate::channel::ChannelName;
use crate::config::RedisClientOptions;

/// Publishes with `PUBLISH channel payload` over a single connection.
///
/// The connection is opened on first use and guarded by a mutex, so publishes
/// from every stream of the process are serialized on the wire. A connection
/// that failed with an I/O error is dropped and the next publish opens a new
/// one; the failed publish itself is not retried.
pub struct RedisGateway {
    client: Client,
    connection: Mutex<Option<Connection>>,
}

impl RedisGateway {
    pub fn new(options: &RedisClientOptions) -> Result<Self, PublishError> {
        let client = Client::open(connection_info(options)?).map_err(connection_failed)?;
        Ok(Self {
            client,
            connection: Mutex::new(None),
        })
    }

    /// Where this gateway connects to, e.g. `localhost:6379/0`.
    pub fn address(&self) -> String {
        let info = self.client.get_connection_info();
        format!("{}/{}", info.addr, info.redis.db)
    }
}

impl Gateway for RedisGateway {
    fn publish(&self, channel: &ChannelName, payload: &str) -> Result<(), PublishError> {
        let mut slot = self.connection.lock().map_err(|_| PublishError::Poisoned)?;

        let mut connection = match slot.take() {
            Some(connection) => connection,
            None => self.client.get_connection().map_err(connection_failed)?,
        };

        let sent: redis::RedisResult<i64> = connection.publish(channel.as_str(), payload);
        match sent {
            Ok(receivers) => {
                *slot = Some(connection);
                debug!(channel = %channel, bytes = payload.len(), receivers, "published");
                Ok(())
            }
            Err(err) if is_connection_error(&err) => {
                warn!(channel = %channel, error = %err, "dropping broken redis connection");
                Err(connection_failed(err))
            }
            Err(err) => {
                *slot = Some(connection);
                Err(PublishError::Rejected(err.to_string()))
            }
        }
    }
}

fn connection_info(options: &RedisClientOptions) -> Result<ConnectionInfo, PublishError> {
    let addr = match &options.unix_socket_path {
        #[cfg(unix)]
        Some(path) => ConnectionAddr::Unix(path.clone()),
        #[cfg(not(unix))]
        Some(path) => {
            return Err(PublishError::ConnectionFailed(format!(
                "unix socket {} is not supported on this platform",
                path.display()
            )))
        }
        None => ConnectionAddr::Tcp(options.host.clone(), options.port),
    };
    Ok(ConnectionInfo {
        addr,
        redis: RedisConnectionInfo {
            db: options.db,
            password: options.password.clone(),
            ..Default::default()
        },
    })
}

fn is_connection_error(err: &RedisError) -> bool {
    err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() || err.is_timeout()
}

fn connection_failed(err: RedisError) -> PublishError {
    PublishError::ConnectionFailed(err.to_string())
}
