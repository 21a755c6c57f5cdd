use thiserror::Error;

use crate::config::ConfigError;
use crate::gateway::PublishError;
use crate::serializer::SerializationError;

/// Every failure the crate reports to its host.
///
/// Nothing is retried or swallowed internally: each variant reaches the
/// caller of the operation that triggered it.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or mistyped configuration value; raised at startup.
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    /// A component was constructed without the component it depends on.
    #[error("the {required} component must be enabled in order to use the {component} component")]
    DependencyNotEnabled { component: String, required: String },
    /// A payload could not be encoded; the event was not published.
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    /// The broker was unreachable or refused the publish.
    #[error(transparent)]
    Publish(#[from] PublishError),
}
