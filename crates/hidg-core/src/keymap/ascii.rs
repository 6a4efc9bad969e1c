//! ASCII byte → (modifier, HID usage) table for a US keyboard layout.
//!
//! The table is total: every byte has an answer.  Bytes with no key on a US
//! keyboard (control characters other than tab/newline, DEL, and everything
//! above 0x7F) map to `(Modifiers::NOT_SET, KeyCode::NIL)` so that they are
//! typed as a keystroke that presses nothing instead of aborting the payload.

use super::hid::{KeyCode, Modifiers};

const UNMAPPED: (Modifiers, KeyCode) = (Modifiers::NOT_SET, KeyCode::NIL);

/// Translates an input byte to the modifier bits and key needed to type it.
///
/// Upper-case letters and the shifted symbols hold left shift; everything
/// else that is mapped is typed without a modifier.
pub fn lookup(character: u8) -> (Modifiers, KeyCode) {
    match character {
        b'A'..=b'Z' => (Modifiers::LEFT_SHIFT, letter(character - b'A')),
        b'a'..=b'z' => (Modifiers::NOT_SET, letter(character - b'a')),
        b'0' => (Modifiers::NOT_SET, KeyCode::DIGIT_0),
        b'1'..=b'9' => (Modifiers::NOT_SET, digit(character - b'1')),
        _ => symbol(character),
    }
}

/// Returns `true` if `character` produces a real key press.
pub fn is_mapped(character: u8) -> bool {
    !lookup(character).1.is_nil()
}

fn letter(offset: u8) -> KeyCode {
    KeyCode::new(KeyCode::A.as_u8() + offset).unwrap_or(KeyCode::NIL)
}

fn digit(offset: u8) -> KeyCode {
    KeyCode::new(KeyCode::DIGIT_1.as_u8() + offset).unwrap_or(KeyCode::NIL)
}

fn symbol(character: u8) -> (Modifiers, KeyCode) {
    let shifted = |key| (Modifiers::LEFT_SHIFT, key);
    let plain = |key| (Modifiers::NOT_SET, key);

    match character {
        // Shifted digit row
        b'!' => shifted(KeyCode::DIGIT_1),
        b'@' => shifted(KeyCode::DIGIT_2),
        b'#' => shifted(KeyCode::DIGIT_3),
        b'$' => shifted(KeyCode::DIGIT_4),
        b'%' => shifted(KeyCode::DIGIT_5),
        b'^' => shifted(KeyCode::DIGIT_6),
        b'&' => shifted(KeyCode::DIGIT_7),
        b'*' => shifted(KeyCode::DIGIT_8),
        b'(' => shifted(KeyCode::DIGIT_9),
        b')' => shifted(KeyCode::DIGIT_0),

        b'`' => plain(KeyCode::BACKQUOTE),
        b'~' => shifted(KeyCode::BACKQUOTE),
        b'-' => plain(KeyCode::MINUS),
        b'_' => shifted(KeyCode::MINUS),
        b'=' => plain(KeyCode::EQUAL),
        b'+' => shifted(KeyCode::EQUAL),
        b'[' => plain(KeyCode::BRACKET_LEFT),
        b'{' => shifted(KeyCode::BRACKET_LEFT),
        b']' => plain(KeyCode::BRACKET_RIGHT),
        b'}' => shifted(KeyCode::BRACKET_RIGHT),
        b'\\' => plain(KeyCode::BACKSLASH),
        b'|' => shifted(KeyCode::BACKSLASH),
        b';' => plain(KeyCode::SEMICOLON),
        b':' => shifted(KeyCode::SEMICOLON),
        b'\'' => plain(KeyCode::QUOTE),
        b'"' => shifted(KeyCode::QUOTE),
        b',' => plain(KeyCode::COMMA),
        b'<' => shifted(KeyCode::COMMA),
        b'.' => plain(KeyCode::PERIOD),
        b'>' => shifted(KeyCode::PERIOD),
        b'/' => plain(KeyCode::SLASH),
        b'?' => shifted(KeyCode::SLASH),

        // Whitespace
        b' ' => plain(KeyCode::SPACE),
        b'\t' => plain(KeyCode::TAB),
        b'\n' => plain(KeyCode::ENTER),

        _ => UNMAPPED,
    }
}
