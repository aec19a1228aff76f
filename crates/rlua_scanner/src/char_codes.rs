//! Byte constants and character classes used by the scanner.
//!
//! The scanner works on bytes; everything it classifies is ASCII.

pub const LINE_FEED: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const SPACE: u8 = b' ';
pub const TAB: u8 = b'\t';

pub const DOUBLE_QUOTE: u8 = b'"';
pub const SINGLE_QUOTE: u8 = b'\'';
pub const BACKSLASH: u8 = b'\\';

pub const MINUS: u8 = b'-';
pub const DOT: u8 = b'.';
pub const EQUALS: u8 = b'=';
pub const OPEN_BRACKET: u8 = b'[';
pub const CLOSE_BRACKET: u8 = b']';

pub const _0: u8 = b'0';
pub const E_LOWER: u8 = b'e';
pub const E_UPPER: u8 = b'E';
pub const X_LOWER: u8 = b'x';
pub const X_UPPER: u8 = b'X';

/// Whitespace skipped between tokens. Newlines included.
#[inline]
pub fn is_white_space(ch: u8) -> bool {
    matches!(ch, SPACE | TAB | LINE_FEED | CARRIAGE_RETURN)
}

/// Check if a byte can start an identifier.
#[inline]
pub fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

/// Check if a byte is a decimal digit.
#[inline]
pub fn is_digit(ch: u8) -> bool {
    ch.is_ascii_digit()
}

/// Check if a byte is a hex digit.
#[inline]
pub fn is_hex_digit(ch: u8) -> bool {
    ch.is_ascii_hexdigit()
}

/// Check if a byte can continue an identifier.
#[inline]
pub fn is_identifier_part(ch: u8) -> bool {
    is_letter(ch) || is_digit(ch)
}

/// Decode the byte following a backslash in a quoted string.
/// Unknown escapes stand for the escaped byte itself.
#[inline]
pub fn unescape(ch: u8) -> u8 {
    match ch {
        b'n' => LINE_FEED,
        b't' => TAB,
        b'r' => CARRIAGE_RETURN,
        other => other,
    }
}
