//! Character to key translation for the emulated keyboard.
//!
//! The output representation is USB HID Usage IDs (page 0x07, Keyboard/Keypad)
//! plus the modifier bitmask that occupies byte 0 of a keyboard report.
//! Only the US layout is supported.

pub mod ascii;
pub mod hid;

pub use ascii::{is_mapped, lookup};
pub use hid::{KeyCode, Modifiers};
