//! # hidg-core
//!
//! Turns text into USB HID keyboard input reports and writes them, one
//! keystroke at a time, to the character device exposed by a Linux USB HID
//! gadget driver (conventionally `/dev/hidg0`).
//!
//! This crate has no knowledge of HTTP, configuration files, or process
//! setup.  It is used by the `hidg-server` binary, which owns the transport.
//!
//! # Architecture overview (for beginners)
//!
//! When a Linux board (for example a Raspberry Pi Zero) is configured as a USB
//! *gadget*, the host computer it is plugged into sees it as an ordinary USB
//! keyboard.  Anything written to `/dev/hidg0` is forwarded to the host as a
//! keyboard *input report*: an 8-byte frame describing which keys are held.
//!
//! - **`keymap`** – The US-layout table that maps an ASCII byte to the HID
//!   usage ID of the physical key and the modifier bits (shift) needed to
//!   produce it.
//!
//! - **`report`** – Builds the two reports for one character: a *press*
//!   report holding the key, then an all-zero *release* report.
//!
//! - **`writer`** – Owns the open device handle and writes the press/release
//!   pairs for every character of a payload, optionally pausing between
//!   reports so slow hosts do not drop keystrokes.
//!
//! - **`device`** – Opens the gadget device file the way the writer expects.

pub mod device;
pub mod keymap;
pub mod report;
pub mod writer;

pub use device::{open_keyboard, DeviceError, DEFAULT_DEVICE_PATH};
pub use keymap::hid::{KeyCode, Modifiers};
pub use keymap::lookup;
pub use report::{encode_keystroke, encode_text, KeyboardReport, Keystroke, REPORT_SIZE};
pub use writer::{KeyboardWriter, TypeError, WriterState};
