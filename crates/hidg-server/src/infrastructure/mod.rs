//! Infrastructure layer for hidg-server.
//!
//! Everything that touches the outside world except the device itself:
//!
//! - Reading the TOML configuration file
//! - Binding the HTTP listener and serving the ingress routes
//! - Moving blocking keyboard calls off the async runtime
//!
//! Keymap and report logic stay in `hidg-core`; request classification stays
//! in the domain layer.

pub mod config_file;
pub mod http;

pub use config_file::{load_config, AppConfig, ConfigError};
pub use http::{app, run_server, AppState};
