//! TOML configuration file.
//!
//! Every field has a default, so an absent file, an empty file, or a file that
//! only sets a few keys all work:
//!
//! ```toml
//! log_level = "info"
//!
//! [keyboard]
//! file = "/dev/hidg0"
//! stroke_delay_ms = 0
//!
//! [server]
//! address = "0.0.0.0"
//! port = 8282
//! input_buffer_size = 500
//! ```
//!
//! The file is turned into [`ServerSettings`] with
//! [`AppConfig::into_settings`] after CLI overrides have been applied.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::config::{DEFAULT_INPUT_BUFFER_SIZE, DEFAULT_PORT};
use crate::domain::ServerSettings;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `server.address` is not an IP address.
    #[error("invalid server address '{0}'")]
    InvalidAddress(String),

    /// `server.input_buffer_size` must be at least one byte.
    #[error("server.input_buffer_size must be greater than zero")]
    ZeroInputBuffer,
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// `tracing` filter used when `RUST_LOG` is not set:
    /// `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// The gadget keyboard device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyboardConfig {
    /// Device node written by the keyboard writer.
    #[serde(default = "default_keyboard_file")]
    pub file: PathBuf,
    /// Pause after each report in paced mode, in milliseconds.
    #[serde(default)]
    pub stroke_delay_ms: u64,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// IP address to bind.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Read size for streamed raw bodies.
    #[serde(default = "default_input_buffer_size")]
    pub input_buffer_size: usize,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_keyboard_file() -> PathBuf {
    PathBuf::from(hidg_core::DEFAULT_DEVICE_PATH)
}
fn default_address() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_input_buffer_size() -> usize {
    DEFAULT_INPUT_BUFFER_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            keyboard: KeyboardConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            file: default_keyboard_file(),
            stroke_delay_ms: 0,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            input_buffer_size: default_input_buffer_size(),
        }
    }
}

impl AppConfig {
    /// Validates the file values and resolves them into [`ServerSettings`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] if `server.address` is not an IP
    /// address and [`ConfigError::ZeroInputBuffer`] if the buffer size is 0.
    pub fn into_settings(self) -> Result<ServerSettings, ConfigError> {
        let ip: IpAddr = self
            .server
            .address
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(self.server.address.clone()))?;

        if self.server.input_buffer_size == 0 {
            return Err(ConfigError::ZeroInputBuffer);
        }

        Ok(ServerSettings {
            bind_addr: SocketAddr::new(ip, self.server.port),
            device_path: self.keyboard.file,
            stroke_delay: Duration::from_millis(self.keyboard.stroke_delay_ms),
            input_buffer_size: self.server.input_buffer_size,
        })
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses configuration from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Loads the configuration file at `path`.
///
/// `None`, or a path that does not exist, yields `AppConfig::default()`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };

    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_default_config_matches_default_settings() {
        // Arrange / Act
        let settings = AppConfig::default().into_settings().unwrap();

        // Assert
        assert_eq!(settings, ServerSettings::default());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_partial_toml_overrides_only_given_fields() {
        // Arrange
        let toml_str = r#"
log_level = "debug"
[keyboard]
stroke_delay_ms = 15
[server]
port = 9000
"#;

        // Act
        let cfg = parse_config(toml_str).unwrap();

        // Assert
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.keyboard.stroke_delay_ms, 15);
        assert_eq!(cfg.keyboard.file, PathBuf::from("/dev/hidg0"));
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.address, "0.0.0.0");
        assert_eq!(cfg.server.input_buffer_size, 500);
    }

    #[test]
    fn test_into_settings_resolves_all_fields() {
        let cfg = parse_config(
            r#"
[keyboard]
file = "/dev/hidg1"
stroke_delay_ms = 20
[server]
address = "127.0.0.1"
port = 8080
input_buffer_size = 64
"#,
        )
        .unwrap();

        let settings = cfg.into_settings().unwrap();

        assert_eq!(settings.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(settings.device_path, PathBuf::from("/dev/hidg1"));
        assert_eq!(settings.stroke_delay, Duration::from_millis(20));
        assert_eq!(settings.input_buffer_size, 64);
    }

    #[test]
    fn test_invalid_address_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.server.address = "not.an.ip".to_string();

        let err = cfg.into_settings().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidAddress(a) if a == "not.an.ip"));
    }

    #[test]
    fn test_zero_input_buffer_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.server.input_buffer_size = 0;

        assert!(matches!(cfg.into_settings(), Err(ConfigError::ZeroInputBuffer)));
    }

    #[test]
    fn test_malformed_toml_returns_parse_error() {
        let result = parse_config("[[[ not valid toml");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_without_path_returns_default() {
        assert_eq!(load_config(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/hidg.toml");
        assert_eq!(load_config(Some(&path)).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_config_reads_file_from_temp_dir() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("hidg_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("hidg.toml");
        let mut cfg = AppConfig::default();
        cfg.server.port = 12345;
        cfg.log_level = "warn".to_string();
        std::fs::write(&path, toml::to_string_pretty(&cfg).unwrap()).unwrap();

        // Act
        let loaded = load_config(Some(&path)).unwrap();

        // Assert
        assert_eq!(loaded, cfg);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_on_directory_returns_io_error() {
        let dir = std::env::temp_dir();
        let result = load_config(Some(&dir));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
