//! Application layer for hidg-server.
//!
//! Owns the single [`KeyboardWriter`](hidg_core::KeyboardWriter) and makes
//! sure only one request types on it at a time.  Handlers depend on the
//! [`Typist`] trait so they can be tested without a device.

pub mod typist;

pub use typist::{SerializedKeyboard, Typist};
