//! hidg-server library crate.
//!
//! HTTP ingress for the HID gadget keyboard: clients POST text and the server
//! types it on the host the gadget is plugged into.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! HTTP client (text/plain or form POST)
//!         ↕
//! [hidg-server]
//!   ├── domain/           Pure types: ServerSettings, PayloadSource, Pacing
//!   ├── application/      Typist seam + mutex-serialized keyboard
//!   └── infrastructure/
//!         ├── config_file/ TOML configuration file
//!         └── http/        axum router and request handlers
//!         ↕
//! [hidg-core] KeyboardWriter → /dev/hidg0
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O.
//! - `application` depends on `domain` and `hidg-core` only.
//! - `infrastructure` depends on all other layers plus `tokio` and `axum`.

/// Domain layer: settings and request classification types (no I/O).
pub mod domain;

/// Application layer: serialized access to the keyboard writer.
pub mod application;

/// Infrastructure layer: configuration file and HTTP server.
pub mod infrastructure;
