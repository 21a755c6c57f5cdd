//! Configuration surface.
//!
//! Raw configuration is a section-scoped key/value store of strings. Typed
//! options are declared up front in an explicit schema ([`OptionSpec`]) and
//! resolved eagerly, so a malformed value fails at startup rather than on the
//! first event.
//!
//! ```toml
//! [redis_client]
//! host = "redis.internal"
//! port = 6380
//! unix_socket_path = "run/redis.sock"   # relative to the config file
//!
//! [redispub]
//! channel_prefix = "trac"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("[{section}] {key} = {raw:?} is not a valid {expected}")]
    InvalidValue {
        section: String,
        key: String,
        expected: OptionKind,
        raw: String,
    },
    #[error("malformed configuration: {0}")]
    Malformed(String),
    #[error("cannot read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Section-scoped raw configuration values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    sections: BTreeMap<String, BTreeMap<String, String>>,
    base_dir: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text. Each top-level table is a section; scalar values are
    /// kept in their textual form and coerced later by the option schema.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let table: toml::Table =
            toml::from_str(text).map_err(|e| ConfigError::Malformed(e.to_string()))?;

        let mut config = Config::new();
        for (section, entries) in table {
            let toml::Value::Table(entries) = entries else {
                return Err(ConfigError::Malformed(format!(
                    "top-level key `{}` must be a section table",
                    section
                )));
            };
            for (key, value) in entries {
                let raw = match value {
                    toml::Value::String(s) => s,
                    toml::Value::Integer(n) => n.to_string(),
                    toml::Value::Float(f) => f.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    toml::Value::Datetime(dt) => dt.to_string(),
                    toml::Value::Array(_) | toml::Value::Table(_) => {
                        return Err(ConfigError::Malformed(format!(
                            "[{}] {} must be a scalar value",
                            section, key
                        )));
                    }
                };
                config.set(&section, &key, raw);
            }
        }
        Ok(config)
    }

    /// Load a TOML file. Relative path options resolve against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }
}

/// Declared type of an option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionKind {
    Text,
    Integer,
    Path,
    /// `enabled`/`disabled` (also on/off, yes/no, true/false, 1/0).
    Switch,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OptionKind::Text => "string",
            OptionKind::Integer => "integer",
            OptionKind::Path => "path",
            OptionKind::Switch => "switch (enabled/disabled)",
        })
    }
}

/// A resolved option value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    Text(String),
    Integer(i64),
    Path(PathBuf),
    Switch(bool),
    Unset,
}

/// One entry of the option schema.
#[derive(Clone, Copy, Debug)]
pub struct OptionSpec {
    pub section: &'static str,
    pub name: &'static str,
    pub kind: OptionKind,
    pub default: Option<&'static str>,
}

impl OptionSpec {
    /// Look the option up in `config`, falling back to the default, and
    /// coerce it to the declared kind.
    pub fn resolve(&self, config: &Config) -> Result<OptionValue, ConfigError> {
        let raw = config.get(self.section, self.name);
        match self.kind {
            OptionKind::Text => Ok(raw
                .or(self.default)
                .map_or(OptionValue::Unset, |s| OptionValue::Text(s.to_string()))),
            OptionKind::Integer => {
                let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()).or(self.default) else {
                    return Ok(OptionValue::Unset);
                };
                raw.parse::<i64>()
                    .map(OptionValue::Integer)
                    .map_err(|_| self.invalid(raw))
            }
            OptionKind::Path => {
                let Some(raw) = raw.filter(|s| !s.trim().is_empty()).or(self.default) else {
                    return Ok(OptionValue::Unset);
                };
                let path = PathBuf::from(raw);
                Ok(OptionValue::Path(match config.base_dir() {
                    Some(base) if path.is_relative() => base.join(path),
                    _ => path,
                }))
            }
            OptionKind::Switch => {
                let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()).or(self.default) else {
                    return Ok(OptionValue::Unset);
                };
                match raw.to_ascii_lowercase().as_str() {
                    "enabled" | "on" | "yes" | "true" | "1" => Ok(OptionValue::Switch(true)),
                    "disabled" | "off" | "no" | "false" | "0" => Ok(OptionValue::Switch(false)),
                    _ => Err(self.invalid(raw)),
                }
            }
        }
    }

    /// Resolve a switch option; unset counts as enabled.
    pub fn is_enabled(&self, config: &Config) -> Result<bool, ConfigError> {
        match self.resolve(config)? {
            OptionValue::Switch(on) => Ok(on),
            _ => Ok(true),
        }
    }

    fn invalid(&self, raw: &str) -> ConfigError {
        ConfigError::InvalidValue {
            section: self.section.to_string(),
            key: self.name.to_string(),
            expected: self.kind,
            raw: raw.to_string(),
        }
    }

    fn text(&self, config: &Config) -> Result<Option<String>, ConfigError> {
        match self.resolve(config)? {
            OptionValue::Text(s) => Ok(Some(s)),
            _ => Ok(None),
        }
    }

    fn integer(&self, config: &Config) -> Result<Option<i64>, ConfigError> {
        match self.resolve(config)? {
            OptionValue::Integer(n) => Ok(Some(n)),
            _ => Ok(None),
        }
    }

    fn path(&self, config: &Config) -> Result<Option<PathBuf>, ConfigError> {
        match self.resolve(config)? {
            OptionValue::Path(p) => Ok(Some(p)),
            _ => Ok(None),
        }
    }
}

pub const REDIS_CLIENT_SECTION: &str = "redis_client";
pub const REDISPUB_SECTION: &str = "redispub";

/// Host name of the Redis server.
pub const REDIS_HOST: OptionSpec = OptionSpec {
    section: REDIS_CLIENT_SECTION,
    name: "host",
    kind: OptionKind::Text,
    default: Some("localhost"),
};

/// TCP port of the Redis server.
pub const REDIS_PORT: OptionSpec = OptionSpec {
    section: REDIS_CLIENT_SECTION,
    name: "port",
    kind: OptionKind::Integer,
    default: Some("6379"),
};

/// Logical database index selected after connecting.
pub const REDIS_DB: OptionSpec = OptionSpec {
    section: REDIS_CLIENT_SECTION,
    name: "db",
    kind: OptionKind::Integer,
    default: Some("0"),
};

/// Password sent with AUTH. Empty or blank means no AUTH.
pub const REDIS_PASSWORD: OptionSpec = OptionSpec {
    section: REDIS_CLIENT_SECTION,
    name: "password",
    kind: OptionKind::Text,
    default: None,
};

/// Connect through this local socket instead of TCP.
pub const REDIS_UNIX_SOCKET_PATH: OptionSpec = OptionSpec {
    section: REDIS_CLIENT_SECTION,
    name: "unix_socket_path",
    kind: OptionKind::Path,
    default: None,
};

/// Prefix of every channel, e.g. `trac.<env>.ticket.created`. Empty drops
/// the segment.
pub const CHANNEL_PREFIX: OptionSpec = OptionSpec {
    section: REDISPUB_SECTION,
    name: "channel_prefix",
    kind: OptionKind::Text,
    default: Some("trac"),
};

/// Log every publish instead of sending it to the broker.
pub const DRY_RUN: OptionSpec = OptionSpec {
    section: REDISPUB_SECTION,
    name: "dry_run",
    kind: OptionKind::Switch,
    default: Some("disabled"),
};

pub const COMPONENTS_SECTION: &str = "components";

/// Owns the broker connection shared by the realm streams.
pub const CLIENT_COMPONENT: OptionSpec = OptionSpec {
    section: COMPONENTS_SECTION,
    name: "redispub.client",
    kind: OptionKind::Switch,
    default: Some("enabled"),
};

/// Publishes ticket created/changed/deleted events.
pub const TICKET_COMPONENT: OptionSpec = OptionSpec {
    section: COMPONENTS_SECTION,
    name: "redispub.ticket",
    kind: OptionKind::Switch,
    default: Some("enabled"),
};

/// Publishes wiki page created/changed/deleted events.
pub const WIKI_COMPONENT: OptionSpec = OptionSpec {
    section: COMPONENTS_SECTION,
    name: "redispub.wiki",
    kind: OptionKind::Switch,
    default: Some("enabled"),
};

/// Every option this crate reads.
pub const OPTIONS: &[OptionSpec] = &[
    REDIS_HOST,
    REDIS_PORT,
    REDIS_DB,
    REDIS_PASSWORD,
    REDIS_UNIX_SOCKET_PATH,
    CHANNEL_PREFIX,
    DRY_RUN,
    CLIENT_COMPONENT,
    TICKET_COMPONENT,
    WIKI_COMPONENT,
];

/// Validate every known option at once.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    for spec in OPTIONS {
        spec.resolve(config)?;
    }
    Ok(())
}

/// Connection parameters for the broker client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedisClientOptions {
    pub host: String,
    pub port: u16,
    pub db: i64,
    pub password: Option<String>,
    pub unix_socket_path: Option<PathBuf>,
}

impl Default for RedisClientOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
            password: None,
            unix_socket_path: None,
        }
    }
}

impl RedisClientOptions {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match REDIS_PORT.integer(config)? {
            Some(n) => u16::try_from(n).map_err(|_| REDIS_PORT.invalid(&n.to_string()))?,
            None => defaults.port,
        };
        let db = match REDIS_DB.integer(config)? {
            Some(n) if n < 0 => return Err(REDIS_DB.invalid(&n.to_string())),
            Some(n) => n,
            None => defaults.db,
        };

        Ok(Self {
            host: REDIS_HOST.text(config)?.unwrap_or(defaults.host),
            port,
            db,
            password: REDIS_PASSWORD
                .text(config)?
                .filter(|password| !password.trim().is_empty()),
            unix_socket_path: REDIS_UNIX_SOCKET_PATH.path(config)?,
        })
    }
}

/// Options of the channel publisher itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublisherOptions {
    pub channel_prefix: String,
    pub dry_run: bool,
}

impl PublisherOptions {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            channel_prefix: CHANNEL_PREFIX.text(config)?.unwrap_or_default(),
            dry_run: matches!(DRY_RUN.resolve(config)?, OptionValue::Switch(true)),
        })
    }
}
