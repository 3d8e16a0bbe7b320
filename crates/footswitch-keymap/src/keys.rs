//! Named keys, printable characters and their stored codes

use crate::{KeymapError, KeymapResult};
use std::fmt;

/// Bit 7 of a stored code: the firmware presses shift along with the key.
pub const SHIFT_BIT: u8 = 0x80;

/// Keys selected by name with `--key`.
pub const NAMED_KEYS: [(&str, u8); 31] = [
    ("enter", 0x28),
    ("esc", 0x29),
    ("backspace", 0x2a),
    ("tab", 0x2b),
    ("space", 0x2c),
    ("capslock", 0x39),
    ("f1", 0x3a),
    ("f2", 0x3b),
    ("f3", 0x3c),
    ("f4", 0x3d),
    ("f5", 0x3e),
    ("f6", 0x3f),
    ("f7", 0x40),
    ("f8", 0x41),
    ("f9", 0x42),
    ("f10", 0x43),
    ("f11", 0x44),
    ("f12", 0x45),
    ("printscreen", 0x46),
    ("scrollock", 0x47),
    ("pause", 0x48),
    ("insert", 0x49),
    ("home", 0x4a),
    ("pageup", 0x4b),
    ("delete", 0x4c),
    ("pagedown", 0x4e),
    ("right", 0x4f),
    ("down", 0x50),
    ("left", 0x51),
    ("up", 0x52),
    ("numlock", 0x53),
];

/// Characters outside `a-z`, `A-Z` and `1-9`.
pub const SYMBOL_CHARS: [(char, u8); 34] = [
    (' ', 0x2c),
    ('0', 0x27),
    ('!', 0x9e),
    ('@', 0x9f),
    ('#', 0xa0),
    ('$', 0xa1),
    ('%', 0xa2),
    ('^', 0xa3),
    ('&', 0xa4),
    ('*', 0xa5),
    ('(', 0xa6),
    (')', 0xa7),
    ('-', 0x2d),
    ('_', 0xad),
    ('=', 0x2e),
    ('+', 0xae),
    ('[', 0x2f),
    ('{', 0xaf),
    (']', 0x30),
    ('}', 0xb0),
    ('\\', 0x31),
    ('|', 0xb1),
    (';', 0x33),
    (':', 0xb3),
    ('\'', 0x34),
    ('"', 0xb4),
    ('`', 0x35),
    ('~', 0xb5),
    (',', 0x36),
    ('<', 0xb6),
    ('.', 0x37),
    ('>', 0xb7),
    ('/', 0x38),
    ('?', 0xb8),
];

const LOWER_A: u8 = 0x04;
const UPPER_A: u8 = LOWER_A | SHIFT_BIT;
const DIGIT_1: u8 = 0x1e;

pub fn encode_char(ch: char) -> Option<u8> {
    if !ch.is_ascii() {
        return None;
    }
    let byte = ch as u8;
    match ch {
        'a'..='z' => Some(LOWER_A + (byte - b'a')),
        'A'..='Z' => Some(UPPER_A + (byte - b'A')),
        '1'..='9' => Some(DIGIT_1 + (byte - b'1')),
        _ => SYMBOL_CHARS
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, code)| *code),
    }
}

/// Encodes a `--key` argument.
///
/// A single character is lower-cased first, so `-k A` programs the `a` key;
/// use a modifier to get shift. Longer names are looked up in
/// [`NAMED_KEYS`] ignoring case.
pub fn encode_key(key: &str) -> KeymapResult<u8> {
    let mut chars = key.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return encode_char(ch.to_ascii_lowercase())
            .ok_or_else(|| KeymapError::UnknownKey(key.to_string()));
    }
    NAMED_KEYS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, code)| *code)
        .ok_or_else(|| KeymapError::UnknownKey(key.to_string()))
}

pub fn encode_string(text: &str) -> KeymapResult<Vec<u8>> {
    text.chars()
        .enumerate()
        .map(|(index, ch)| encode_char(ch).ok_or(KeymapError::UnencodableChar { ch, index }))
        .collect()
}

/// A stored code turned back into something printable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedKey {
    Char(char),
    Named(&'static str),
    Unknown(u8),
}

impl DecodedKey {
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for DecodedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(ch) => write!(f, "{ch}"),
            Self::Named(name) => write!(f, "<{name}>"),
            Self::Unknown(code) => write!(f, "<0x{code:X}>"),
        }
    }
}

pub fn decode_byte(code: u8) -> DecodedKey {
    match code {
        0x04..=0x1d => DecodedKey::Char(char::from(b'a' + (code - LOWER_A))),
        0x84..=0x9d => DecodedKey::Char(char::from(b'A' + (code - UPPER_A))),
        0x1e..=0x26 => DecodedKey::Char(char::from(b'1' + (code - DIGIT_1))),
        _ => {
            if let Some((name, _)) = NAMED_KEYS.iter().find(|(_, c)| *c == code) {
                return DecodedKey::Named(name);
            }
            SYMBOL_CHARS
                .iter()
                .find(|(_, c)| *c == code)
                .map_or(DecodedKey::Unknown(code), |(ch, _)| DecodedKey::Char(*ch))
        }
    }
}

/// Decodes a sequence of stored codes into one string.
pub fn decode_sequence(codes: &[u8]) -> String {
    codes.iter().map(|c| decode_byte(*c).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_letters_and_digits() {
        assert_eq!(encode_char('a'), Some(0x04));
        assert_eq!(encode_char('z'), Some(0x1d));
        assert_eq!(encode_char('A'), Some(0x84));
        assert_eq!(encode_char('Z'), Some(0x9d));
        assert_eq!(encode_char('1'), Some(0x1e));
        assert_eq!(encode_char('9'), Some(0x26));
        assert_eq!(encode_char('0'), Some(0x27));
    }

    #[test]
    fn test_encode_symbols_carry_shift() {
        assert_eq!(encode_char('-'), Some(0x2d));
        assert_eq!(encode_char('_'), Some(0x2d | SHIFT_BIT));
        assert_eq!(encode_char('?'), Some(0x38 | SHIFT_BIT));
        assert_eq!(encode_char('\t'), None);
        assert_eq!(encode_char('é'), None);
    }

    #[test]
    fn test_encode_key_single_char_is_lowercased() -> KeymapResult<()> {
        assert_eq!(encode_key("A")?, 0x04);
        assert_eq!(encode_key("x")?, 0x1b);
        assert_eq!(encode_key("!")?, 0x9e);
        Ok(())
    }

    #[test]
    fn test_encode_key_names_ignore_case() -> KeymapResult<()> {
        assert_eq!(encode_key("enter")?, 0x28);
        assert_eq!(encode_key("PageDown")?, 0x4e);
        assert_eq!(encode_key("F12")?, 0x45);
        assert_eq!(
            encode_key("f13"),
            Err(KeymapError::UnknownKey("f13".to_string()))
        );
        assert!(encode_key("").is_err());
        Ok(())
    }

    #[test]
    fn test_encode_string_reports_first_bad_char() {
        assert_eq!(encode_string("Hi!"), Ok(vec![0x8b, 0x0c, 0x9e]));
        assert_eq!(
            encode_string("ab\ncd"),
            Err(KeymapError::UnencodableChar { ch: '\n', index: 2 })
        );
    }

    #[test]
    fn test_decode_byte() {
        assert_eq!(decode_byte(0x04).to_string(), "a");
        assert_eq!(decode_byte(0x84).to_string(), "A");
        assert_eq!(decode_byte(0x26).to_string(), "9");
        assert_eq!(decode_byte(0x27).to_string(), "0");
        assert_eq!(decode_byte(0x28).to_string(), "<enter>");
        assert_eq!(decode_byte(0x2c).to_string(), "<space>");
        assert_eq!(decode_byte(0xb8).to_string(), "?");
        assert_eq!(decode_byte(0x05).to_string(), "b");
        assert_eq!(decode_byte(0x00).to_string(), "<0x0>");
        assert_eq!(decode_byte(0xE0).to_string(), "<0xE0>");
        assert!(!decode_byte(0xE0).is_known());
    }

    #[test]
    fn test_decode_sequence() {
        assert_eq!(decode_sequence(&[0x8b, 0x0c, 0x2c, 0x28]), "Hi<space><enter>");
    }
}
