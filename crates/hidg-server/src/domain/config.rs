//! Resolved runtime settings.
//!
//! [`ServerSettings`] is what the rest of the server consumes.  It is built
//! once at startup from the TOML file plus CLI overrides (see
//! `infrastructure::config_file`) and never read from the environment here.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use hidg_core::DEFAULT_DEVICE_PATH;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8282;

/// Default read size when streaming a raw request body to the keyboard.
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 500;

/// All runtime configuration for the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,

    /// Path of the HID gadget keyboard device.
    pub device_path: PathBuf,

    /// Pause after every report in paced mode.  Zero disables pacing.
    pub stroke_delay: Duration,

    /// Raw bodies are typed in pieces of at most this many bytes, so typing
    /// starts before the whole body has arrived.
    pub input_buffer_size: usize,
}

impl Default for ServerSettings {
    /// | Field             | Default        |
    /// |-------------------|----------------|
    /// | bind_addr         | `0.0.0.0:8282` |
    /// | device_path       | `/dev/hidg0`   |
    /// | stroke_delay      | zero           |
    /// | input_buffer_size | 500            |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            device_path: PathBuf::from(DEFAULT_DEVICE_PATH),
            stroke_delay: Duration::ZERO,
            input_buffer_size: DEFAULT_INPUT_BUFFER_SIZE,
        }
    }
}
