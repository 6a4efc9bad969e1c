//! KeyboardWriter: types a payload on the gadget device, one report at a time.
//!
//! The writer owns the device handle for as long as it lives.  Callers only
//! get the two typing operations; raw reads and writes on the handle are not
//! exposed.
//!
//! # Pacing
//!
//! Some gadget drivers and hosts drop or merge reports that arrive faster than
//! the host polls the interrupt endpoint.  [`KeyboardWriter::type_text_delayed`]
//! sleeps for the configured stroke delay after *every* 8-byte write (press and
//! release), so a character costs `2 * delay`.  [`KeyboardWriter::type_text`]
//! writes back to back.
//!
//! # Concurrency
//!
//! The writer does no locking of its own.  Two interleaved callers would mix
//! presses and releases on the wire, so whoever shares a writer must serialize
//! calls (the server wraps it in a mutex).
//!
//! # Failure accounting
//!
//! The first failed write aborts the rest of the payload.  The returned
//! [`TypeError`] carries the number of bytes the device accepted before the
//! failure and the index of the character being typed, so the caller knows
//! how much of the text reached the host.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::keymap::is_mapped;
use crate::report::{encode_keystroke, KeyboardReport};

/// Error type for typing operations.
#[derive(Debug, Error)]
pub enum TypeError {
    /// The device rejected a write.  Not retried.
    #[error(
        "keyboard device write failed at character {index} after {bytes_written} bytes: {source}"
    )]
    Io {
        bytes_written: usize,
        index: usize,
        #[source]
        source: io::Error,
    },

    /// The cancel flag was raised between two characters.
    #[error("typing cancelled before character {index} after {bytes_written} bytes")]
    Cancelled { bytes_written: usize, index: usize },
}

impl TypeError {
    /// Bytes accepted by the device before the call stopped.
    pub fn bytes_written(&self) -> usize {
        match self {
            TypeError::Io { bytes_written, .. } | TypeError::Cancelled { bytes_written, .. } => {
                *bytes_written
            }
        }
    }

    /// Zero-based index of the character that was not (fully) typed.
    pub fn index(&self) -> usize {
        match self {
            TypeError::Io { index, .. } | TypeError::Cancelled { index, .. } => *index,
        }
    }
}

/// Progress of the most recent typing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriterState {
    /// No call has run yet.
    #[default]
    Idle,
    /// The whole payload was accepted.
    Done { bytes_written: usize },
    /// Stopped on character `index`, by an I/O error or cancellation.
    Failed { index: usize },
}

/// Paced writer of keyboard reports to a HID gadget device.
pub struct KeyboardWriter<W: Write> {
    device: W,
    stroke_delay: Duration,
    state: WriterState,
}

impl<W: Write> KeyboardWriter<W> {
    /// Takes ownership of an already opened device handle.
    ///
    /// `stroke_delay` is only used by the `*_delayed` operations.
    pub fn new(device: W, stroke_delay: Duration) -> Self {
        Self {
            device,
            stroke_delay,
            state: WriterState::Idle,
        }
    }

    pub fn stroke_delay(&self) -> Duration {
        self.stroke_delay
    }

    /// Where the most recent call ended.
    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Types `payload` with no pause between reports.
    ///
    /// Returns the number of bytes written, `16 * payload.len()` on success.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::Io`] on the first failed device write.
    pub fn type_text(&mut self, payload: &[u8]) -> Result<usize, TypeError> {
        self.run(payload, Duration::ZERO, None)
    }

    /// Types `payload`, sleeping for the stroke delay after every report.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::Io`] on the first failed device write.
    pub fn type_text_delayed(&mut self, payload: &[u8]) -> Result<usize, TypeError> {
        self.run(payload, self.stroke_delay, None)
    }

    /// Like [`type_text_delayed`](Self::type_text_delayed), but stops before
    /// the next character once `cancel` is set.  A report is never split.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::Io`] on the first failed device write and
    /// [`TypeError::Cancelled`] when `cancel` was observed.
    pub fn type_text_delayed_until(
        &mut self,
        payload: &[u8],
        cancel: &AtomicBool,
    ) -> Result<usize, TypeError> {
        self.run(payload, self.stroke_delay, Some(cancel))
    }

    fn run(
        &mut self,
        payload: &[u8],
        delay: Duration,
        cancel: Option<&AtomicBool>,
    ) -> Result<usize, TypeError> {
        let mut bytes_written = 0;

        let unmapped = payload.iter().filter(|&&c| !is_mapped(c)).count();
        if unmapped > 0 {
            debug!(
                unmapped,
                "payload contains characters with no key; typing them as empty keystrokes"
            );
        }

        for (index, &character) in payload.iter().enumerate() {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                self.state = WriterState::Failed { index };
                debug!(index, bytes_written, "typing cancelled");
                return Err(TypeError::Cancelled {
                    bytes_written,
                    index,
                });
            }

            for report in encode_keystroke(character).reports() {
                if let Err(source) = write_report(&mut self.device, &report, &mut bytes_written)
                {
                    self.state = WriterState::Failed { index };
                    warn!(index, bytes_written, "keyboard device write failed: {source}");
                    return Err(TypeError::Io {
                        bytes_written,
                        index,
                        source,
                    });
                }
                pause(delay);
            }
        }

        self.state = WriterState::Done { bytes_written };
        Ok(bytes_written)
    }
}

/// Pushes one report to the device, accumulating every accepted byte.
///
/// Short writes are continued until the 8 bytes are in; `Interrupted` is
/// re-issued and a zero-length write becomes a `WriteZero` error.
fn write_report<W: Write>(
    device: &mut W,
    report: &KeyboardReport,
    bytes_written: &mut usize,
) -> io::Result<()> {
    let mut remaining: &[u8] = report.as_bytes();
    while !remaining.is_empty() {
        match device.write(remaining) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "keyboard device accepted zero bytes",
                ))
            }
            Ok(n) => {
                *bytes_written += n;
                remaining = &remaining[n..];
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    device.flush()
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}
