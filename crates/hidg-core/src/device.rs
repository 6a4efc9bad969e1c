//! Opening the HID gadget character device.
//!
//! The gadget driver exposes one device node per HID function, conventionally
//! `/dev/hidg0` for the first keyboard.  The node is opened once at startup in
//! append + create + write-only mode and handed to a [`KeyboardWriter`]; the
//! writer never reopens it.  Creating the file when it is missing lets the
//! service run against a plain file during development.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::writer::KeyboardWriter;

/// Device node of the first HID gadget function.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/hidg0";

/// Error type for opening the keyboard device.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to open keyboard device {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Opens `path` for appending, creating it with mode 0644 if absent.
///
/// # Errors
///
/// Returns [`DeviceError::Open`] if the node cannot be opened (missing gadget
/// configuration, permissions, ...).
pub fn open_device(path: &Path) -> Result<File, DeviceError> {
    let mut options = OpenOptions::new();
    options.append(true).create(true).write(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    options.open(path).map_err(|source| DeviceError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Opens the device at `path` and wraps it in a writer with `stroke_delay`.
///
/// # Errors
///
/// Returns [`DeviceError::Open`] if the node cannot be opened.
pub fn open_keyboard(
    path: &Path,
    stroke_delay: Duration,
) -> Result<KeyboardWriter<File>, DeviceError> {
    let file = open_device(path)?;
    info!(
        "keyboard device {} opened (stroke delay {:?})",
        path.display(),
        stroke_delay
    );
    Ok(KeyboardWriter::new(file, stroke_delay))
}
