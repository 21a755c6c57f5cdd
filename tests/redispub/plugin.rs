//! Component wiring through `[components]`.

use redispub::gateway::InMemoryGateway;
use redispub::{Config, Environment, Error, LifecycleEvent, Plugin, TicketStream};

use crate::support::ticket;

#[test]
fn disabled_client_blocks_every_stream() {
    let config = Config::from_toml_str(
        r#"
[components]
"redispub.client" = "disabled"
"#,
    )
    .unwrap();
    let mut env = Environment::new("myproj", config);

    let err = Plugin::load(&mut env).err().unwrap();
    assert!(matches!(err, Error::DependencyNotEnabled { .. }));
    assert!(matches!(
        TicketStream::new(&env).err().unwrap(),
        Error::DependencyNotEnabled { .. }
    ));
}

#[test]
fn disabled_realm_is_not_dispatched() {
    let config = Config::from_toml_str(
        r#"
[components]
"redispub.ticket" = "off"
"#,
    )
    .unwrap();
    let gateway = InMemoryGateway::new();
    let mut env = Environment::new("myproj", config);
    env.install_gateway(gateway.clone());

    let dispatcher = Plugin::load(&mut env).unwrap();
    let messages = dispatcher
        .dispatch(&LifecycleEvent::created("ticket", ticket(1, "new")))
        .unwrap();

    assert!(messages.is_empty());
    assert!(gateway.is_empty());
    assert_eq!(dispatcher.realms(), vec!["wiki"]);
}

#[cfg(all(unix, feature = "redis"))]
#[test]
fn unreachable_broker_surfaces_publish_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::new();
    config.set(
        "redis_client",
        "unix_socket_path",
        dir.path().join("nobody-listens.sock").to_string_lossy(),
    );
    let mut env = Environment::new("myproj", config);

    let dispatcher = Plugin::load(&mut env).unwrap();
    let err = dispatcher
        .dispatch(&LifecycleEvent::created("ticket", ticket(1, "new")))
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Publish(redispub::PublishError::ConnectionFailed(_))
    ));
}

#[cfg(unix)]
#[test]
fn dry_run_never_touches_the_broker() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::from_toml_str(
        r#"
[redispub]
dry_run = "enabled"
"#,
    )
    .unwrap();
    config.set(
        "redis_client",
        "unix_socket_path",
        dir.path().join("nobody-listens.sock").to_string_lossy(),
    );
    let mut env = Environment::new("myproj", config);

    let dispatcher = Plugin::load(&mut env).unwrap();
    let messages = dispatcher
        .dispatch(&LifecycleEvent::created("ticket", ticket(1, "new")))
        .unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].channel.as_str(), "trac.myproj.ticket.created");
}
