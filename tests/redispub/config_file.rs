//! Loading configuration from disk.

use std::fs;
use std::path::PathBuf;

use redispub::{Config, ConfigError, Environment, Error, Plugin, RedisClientOptions};

#[test]
fn options_resolve_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("redispub.toml");
    fs::write(
        &path,
        r#"
[redis_client]
host = "cache.internal"
port = 6380
db = 3
unix_socket_path = "run/redis.sock"

[redispub]
channel_prefix = "tracker"
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    let options = RedisClientOptions::from_config(&config).unwrap();
    assert_eq!(options.host, "cache.internal");
    assert_eq!(options.port, 6380);
    assert_eq!(options.db, 3);
    assert_eq!(options.password, None);
    assert_eq!(
        options.unix_socket_path,
        Some(dir.path().join(PathBuf::from("run/redis.sock")))
    );

    let env = Environment::new("myproj", config);
    assert_eq!(env.channel_namer().unwrap().prefix(), "tracker");
}

#[test]
fn non_numeric_port_fails_at_startup() {
    let config = Config::from_toml_str("[redis_client]\nport = \"sixty\"\n").unwrap();
    let mut env = Environment::new("myproj", config);

    let err = Plugin::load(&mut env).err().unwrap();
    assert!(matches!(
        err,
        Error::Configuration(ConfigError::InvalidValue { ref key, .. }) if key == "port"
    ));
    assert!(!env.has_gateway());
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
