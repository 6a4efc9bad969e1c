//! USB HID Usage IDs (page 0x07, Keyboard/Keypad page) and the keyboard
//! report modifier bitmask.
//!
//! Reference: USB HID Usage Tables 1.3, Section 10 (Keyboard/Keypad page 0x07)
//! and Device Class Definition for HID 1.11, Appendix B.1 (boot keyboard report).
//!
//! # What is a HID Usage ID? (for beginners)
//!
//! The **USB Human Interface Device (HID)** standard assigns a number to every
//! physical key on a keyboard.  Letters start at 0x04, not at ASCII `'A'`
//! (0x41), because the codes describe key *positions* rather than characters.
//! The character a key produces depends on the layout and on which modifier
//! keys (Shift, Ctrl, ...) are held, which is why a keyboard report carries a
//! separate modifier byte.
//!
//! # The `NIL` key
//!
//! Usage ID 0x00 means "no key".  A report whose key slots are all 0x00
//! presses nothing; this crate uses it both for releases and for characters
//! that have no key on a US keyboard.

/// USB HID Usage ID for a keyboard key (page 0x07).
///
/// Valid usages for a keyboard lie in `0x00..=0xE7`; [`KeyCode::new`] rejects
/// anything above that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyCode(u8);

impl KeyCode {
    /// Highest usage ID defined for keyboards (Right GUI).
    pub const MAX: u8 = 0xE7;

    /// No key pressed.
    pub const NIL: KeyCode = KeyCode(0x00);

    // Letters (HID 0x04–0x1D)
    pub const A: KeyCode = KeyCode(0x04);
    pub const B: KeyCode = KeyCode(0x05);
    pub const C: KeyCode = KeyCode(0x06);
    pub const D: KeyCode = KeyCode(0x07);
    pub const E: KeyCode = KeyCode(0x08);
    pub const F: KeyCode = KeyCode(0x09);
    pub const G: KeyCode = KeyCode(0x0A);
    pub const H: KeyCode = KeyCode(0x0B);
    pub const I: KeyCode = KeyCode(0x0C);
    pub const J: KeyCode = KeyCode(0x0D);
    pub const K: KeyCode = KeyCode(0x0E);
    pub const L: KeyCode = KeyCode(0x0F);
    pub const M: KeyCode = KeyCode(0x10);
    pub const N: KeyCode = KeyCode(0x11);
    pub const O: KeyCode = KeyCode(0x12);
    pub const P: KeyCode = KeyCode(0x13);
    pub const Q: KeyCode = KeyCode(0x14);
    pub const R: KeyCode = KeyCode(0x15);
    pub const S: KeyCode = KeyCode(0x16);
    pub const T: KeyCode = KeyCode(0x17);
    pub const U: KeyCode = KeyCode(0x18);
    pub const V: KeyCode = KeyCode(0x19);
    pub const W: KeyCode = KeyCode(0x1A);
    pub const X: KeyCode = KeyCode(0x1B);
    pub const Y: KeyCode = KeyCode(0x1C);
    pub const Z: KeyCode = KeyCode(0x1D);

    // Digit row (HID 0x1E–0x27); '0' sits after '9'
    pub const DIGIT_1: KeyCode = KeyCode(0x1E);
    pub const DIGIT_2: KeyCode = KeyCode(0x1F);
    pub const DIGIT_3: KeyCode = KeyCode(0x20);
    pub const DIGIT_4: KeyCode = KeyCode(0x21);
    pub const DIGIT_5: KeyCode = KeyCode(0x22);
    pub const DIGIT_6: KeyCode = KeyCode(0x23);
    pub const DIGIT_7: KeyCode = KeyCode(0x24);
    pub const DIGIT_8: KeyCode = KeyCode(0x25);
    pub const DIGIT_9: KeyCode = KeyCode(0x26);
    pub const DIGIT_0: KeyCode = KeyCode(0x27);

    // Control and punctuation keys (HID 0x28–0x38)
    pub const ENTER: KeyCode = KeyCode(0x28);
    pub const TAB: KeyCode = KeyCode(0x2B);
    pub const SPACE: KeyCode = KeyCode(0x2C);
    pub const MINUS: KeyCode = KeyCode(0x2D);
    pub const EQUAL: KeyCode = KeyCode(0x2E);
    pub const BRACKET_LEFT: KeyCode = KeyCode(0x2F);
    pub const BRACKET_RIGHT: KeyCode = KeyCode(0x30);
    pub const BACKSLASH: KeyCode = KeyCode(0x31);
    pub const SEMICOLON: KeyCode = KeyCode(0x33);
    pub const QUOTE: KeyCode = KeyCode(0x34);
    pub const BACKQUOTE: KeyCode = KeyCode(0x35);
    pub const COMMA: KeyCode = KeyCode(0x36);
    pub const PERIOD: KeyCode = KeyCode(0x37);
    pub const SLASH: KeyCode = KeyCode(0x38);

    /// Wraps a raw usage ID, returning `None` above [`KeyCode::MAX`].
    pub const fn new(value: u8) -> Option<Self> {
        if value > Self::MAX {
            None
        } else {
            Some(KeyCode(value))
        }
    }

    /// Returns the raw USB HID Usage ID value for this key code.
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Returns `true` for the "no key" usage.
    pub const fn is_nil(self) -> bool {
        self.0 == Self::NIL.0
    }
}

/// Byte 0 of a keyboard input report: one bit per modifier key.
///
/// ```text
///   Bit 7     Bit 6   Bit 5    Bit 4    Bit 3    Bit 2    Bit 1    Bit 0
/// ┌────────┬────────┬────────┬────────┬────────┬────────┬────────┬────────┐
/// │ Right  │ Right  │ Right  │ Right  │ Left   │ Left   │ Left   │ Left   │
/// │ GUI    │ ALT    │ SHIFT  │ CTRL   │ GUI    │ ALT    │ SHIFT  │ CTRL   │
/// └────────┴────────┴────────┴────────┴────────┴────────┴────────┴────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NOT_SET: Modifiers = Modifiers(0);
    pub const LEFT_CTRL: Modifiers = Modifiers(1 << 0);
    pub const LEFT_SHIFT: Modifiers = Modifiers(1 << 1);
    pub const LEFT_ALT: Modifiers = Modifiers(1 << 2);
    pub const LEFT_GUI: Modifiers = Modifiers(1 << 3);
    pub const RIGHT_CTRL: Modifiers = Modifiers(1 << 4);
    pub const RIGHT_SHIFT: Modifiers = Modifiers(1 << 5);
    pub const RIGHT_ALT: Modifiers = Modifiers(1 << 6);
    pub const RIGHT_GUI: Modifiers = Modifiers(1 << 7);

    /// Raw bitmask as written to the report.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Modifiers) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_full_keyboard_usage_range() {
        for raw in 0x00..=KeyCode::MAX {
            assert_eq!(KeyCode::new(raw).map(KeyCode::as_u8), Some(raw));
        }
    }

    #[test]
    fn test_new_rejects_values_above_right_gui() {
        for raw in [0xE8u8, 0xF0, 0xFF] {
            assert_eq!(KeyCode::new(raw), None, "0x{raw:02X} must be rejected");
        }
    }

    #[test]
    fn test_nil_is_zero_and_default() {
        assert_eq!(KeyCode::NIL.as_u8(), 0x00);
        assert!(KeyCode::NIL.is_nil());
        assert_eq!(KeyCode::default(), KeyCode::NIL);
    }

    #[test]
    fn test_letter_constants_are_contiguous() {
        let letters = [
            KeyCode::A, KeyCode::B, KeyCode::C, KeyCode::D, KeyCode::E, KeyCode::F,
            KeyCode::G, KeyCode::H, KeyCode::I, KeyCode::J, KeyCode::K, KeyCode::L,
            KeyCode::M, KeyCode::N, KeyCode::O, KeyCode::P, KeyCode::Q, KeyCode::R,
            KeyCode::S, KeyCode::T, KeyCode::U, KeyCode::V, KeyCode::W, KeyCode::X,
            KeyCode::Y, KeyCode::Z,
        ];
        for (i, letter) in letters.iter().enumerate() {
            assert_eq!(letter.as_u8(), 0x04 + i as u8, "{letter:?}");
        }
    }

    #[test]
    fn test_all_eight_modifier_bits_combine() {
        let mut all = Modifiers::NOT_SET;
        for bit in [
            Modifiers::LEFT_CTRL,
            Modifiers::LEFT_SHIFT,
            Modifiers::LEFT_ALT,
            Modifiers::LEFT_GUI,
            Modifiers::RIGHT_CTRL,
            Modifiers::RIGHT_SHIFT,
            Modifiers::RIGHT_ALT,
            Modifiers::RIGHT_GUI,
        ] {
            all |= bit;
        }
        assert_eq!(all.bits(), 0xFF);
        assert!(all.contains(Modifiers::LEFT_SHIFT | Modifiers::RIGHT_GUI));
    }
}
