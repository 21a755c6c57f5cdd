use std::sync::{Arc, Mutex};

use tracing::info;

use super::{Gateway, PublishError};
use crate::channel::ChannelName;

/// A gateway that only logs what would have been published.
///
/// Without a buffer every publish becomes a `tracing` event; with a buffer
/// the formatted lines are collected instead.
#[derive(Default)]
pub struct LogGateway {
    buffer: Option<Arc<Mutex<Vec<String>>>>,
}

impl LogGateway {
    pub fn new() -> Self {
        LogGateway { buffer: None }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<String>>>) -> Self {
        LogGateway {
            buffer: Some(buffer),
        }
    }
}

impl Gateway for LogGateway {
    fn publish(&self, channel: &ChannelName, payload: &str) -> Result<(), PublishError> {
        match &self.buffer {
            Some(buffer) => {
                let mut buffer = buffer.lock().map_err(|_| PublishError::Poisoned)?;
                buffer.push(format!("[PUBLISH] {} {}", channel, payload));
            }
            None => info!(channel = %channel, payload, "publish (dry run)"),
        }
        Ok(())
    }
}
