//! redispub integration tests.

mod support;
mod config_file;
mod plugin;
mod ticket;
mod wiki;
