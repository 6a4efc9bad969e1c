//! Boot-protocol keyboard input reports.
//!
//! # Wire format
//!
//! ```text
//! Byte  0    Modifier bitmask (see [`Modifiers`])
//! Byte  1    Reserved, always 0
//! Bytes 2-7  Up to six pressed keys (HID usage IDs), 0 = empty slot
//! ```
//!
//! Only slot 2 is ever filled here: the gadget emulates one key at a time.
//! After every press an all-zero report is sent so that the host sees a clean
//! key-up edge, even when the same character is typed twice in a row.

use crate::keymap::hid::{KeyCode, Modifiers};
use crate::keymap::lookup;

/// Size in bytes of every report written to the device.
pub const REPORT_SIZE: usize = 8;

const MODIFIER_BYTE: usize = 0;
const FIRST_KEY_BYTE: usize = 2;

/// One 8-byte keyboard input report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyboardReport([u8; REPORT_SIZE]);

impl KeyboardReport {
    /// The "no keys held" report.
    pub const RELEASE: KeyboardReport = KeyboardReport([0; REPORT_SIZE]);

    /// Builds a report holding `key` with `modifiers`.
    pub const fn new(modifiers: Modifiers, key: KeyCode) -> Self {
        let mut bytes = [0; REPORT_SIZE];
        bytes[MODIFIER_BYTE] = modifiers.bits();
        bytes[FIRST_KEY_BYTE] = key.as_u8();
        KeyboardReport(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; REPORT_SIZE] {
        &self.0
    }

    pub fn modifiers(&self) -> Modifiers {
        Modifiers(self.0[MODIFIER_BYTE])
    }

    /// The key in the first slot, [`KeyCode::NIL`] when empty.
    pub fn key(&self) -> KeyCode {
        KeyCode::new(self.0[FIRST_KEY_BYTE]).unwrap_or(KeyCode::NIL)
    }

    /// Returns `true` for the all-zero report.
    pub fn is_release(&self) -> bool {
        *self == Self::RELEASE
    }
}

impl AsRef<[u8]> for KeyboardReport {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The press/release pair that types one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    pub press: KeyboardReport,
    pub release: KeyboardReport,
}

impl Keystroke {
    /// Both reports in the order they are written.
    pub fn reports(&self) -> [KeyboardReport; 2] {
        [self.press, self.release]
    }
}

/// Encodes one input byte as a press report followed by the release report.
///
/// Bytes with no key on a US keyboard still produce a pair: a press with no
/// modifier and [`KeyCode::NIL`], then the release.
pub fn encode_keystroke(character: u8) -> Keystroke {
    let (modifiers, key) = lookup(character);
    Keystroke {
        press: KeyboardReport::new(modifiers, key),
        release: KeyboardReport::RELEASE,
    }
}

/// Encodes a whole payload into its report sequence (two per byte).
pub fn encode_text(payload: &[u8]) -> impl Iterator<Item = KeyboardReport> + '_ {
    payload
        .iter()
        .flat_map(|&character| encode_keystroke(character).reports())
}
