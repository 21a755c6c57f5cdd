//! Shared fixtures: an environment wired to an in-memory gateway.

use chrono::{NaiveDate, NaiveDateTime};
use redispub::gateway::InMemoryGateway;
use redispub::{Config, Dispatcher, Environment, Plugin, Record, Snapshot};

pub struct Harness {
    pub gateway: InMemoryGateway,
    pub dispatcher: Dispatcher,
}

/// Load the plug-in for environment `myproj` with the given prefix.
pub fn harness(prefix: Option<&str>) -> Harness {
    let mut config = Config::new();
    if let Some(prefix) = prefix {
        config.set("redispub", "channel_prefix", prefix);
    }
    let gateway = InMemoryGateway::new();
    let mut env = Environment::new("myproj", config);
    env.install_gateway(gateway.clone());

    let dispatcher = Plugin::load(&mut env).expect("plug-in loads");
    Harness {
        gateway,
        dispatcher,
    }
}

pub fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, 3, 2)
        .unwrap()
        .and_hms_micro_opt(12, 31, 28, 184_283)
        .unwrap()
}

pub fn ticket(id: i64, status: &str) -> Snapshot {
    Snapshot::new(
        id,
        Record::new()
            .with("summary", "Fix bug")
            .with("status", status),
    )
}

pub fn page(name: &str, version: i64, text: &str) -> Snapshot {
    Snapshot::new(
        name,
        Record::new()
            .with("version", version)
            .with("time", timestamp())
            .with("author", "somebody")
            .with("text", text)
            .with("comment", "edit comment")
            .with("readonly", 0),
    )
}

/// Parse a payload back into JSON for structural assertions.
pub fn json(payload: &str) -> serde_json::Value {
    serde_json::from_str(payload).expect("payload is valid JSON")
}
