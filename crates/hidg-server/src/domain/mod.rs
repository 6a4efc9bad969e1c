//! Domain layer for hidg-server.
//!
//! Pure types with no dependency on I/O, `tokio`, or `axum`:
//!
//! - Runtime settings resolved from the config file and CLI
//! - The closed set of ways a request can carry its payload
//! - Whether a payload is typed paced or unpaced

pub mod config;
pub mod payload;

pub use config::ServerSettings;
pub use payload::{Pacing, PayloadSource};
