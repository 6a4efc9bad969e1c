//! Typist: the seam between HTTP handlers and the keyboard writer.

use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use hidg_core::{KeyboardWriter, TypeError};
use tracing::debug;

use crate::domain::Pacing;

/// Types text on the emulated keyboard.
///
/// Calls block the current thread for the duration of the typing (device
/// writes plus any stroke delay).
#[cfg_attr(test, mockall::automock)]
pub trait Typist: Send + Sync {
    /// Types `payload` with the requested pacing and returns the number of
    /// report bytes the device accepted.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError`] when a device write fails or typing is cancelled.
    fn type_text(&self, payload: &[u8], pacing: Pacing) -> Result<usize, TypeError>;
}

/// The process-wide keyboard: one writer behind one mutex.
///
/// Holding the lock for a whole call keeps press/release pairs of different
/// requests from interleaving on the device.  Paced calls also watch the
/// shared `shutdown` flag so a long payload stops between characters when
/// the process is asked to exit.
pub struct SerializedKeyboard<W: Write + Send> {
    writer: Mutex<KeyboardWriter<W>>,
    shutdown: Arc<AtomicBool>,
}

impl<W: Write + Send> SerializedKeyboard<W> {
    pub fn new(writer: KeyboardWriter<W>, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            writer: Mutex::new(writer),
            shutdown,
        }
    }
}

impl<W: Write + Send> Typist for SerializedKeyboard<W> {
    fn type_text(&self, payload: &[u8], pacing: Pacing) -> Result<usize, TypeError> {
        // A panic while typing leaves the writer itself consistent; keep using it.
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        debug!(len = payload.len(), ?pacing, "typing payload");
        match pacing {
            Pacing::Unpaced => writer.type_text(payload),
            Pacing::Paced => writer.type_text_delayed_until(payload, &self.shutdown),
        }
    }
}
