//! Module: codec
//!
//! Purpose: Morse codec. Maps ASCII symbols to [`Pattern`]s and back through
//! one static, ordered table of packed sentinel patterns.
//!
//! Both directions are linear scans over 40 entries. No allocation, the table
//! is read-only for the lifetime of the program.

use crate::pattern::Pattern;

/// Number of symbols the keyer knows.
pub const NUM_SYMBOLS: usize = 40;

/// One table row: ASCII symbol and its packed pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub ch: u8,
    pub packed: u8,
}

const fn sym(ch: u8, packed: u8) -> Symbol {
    Symbol { ch, packed }
}

/// Letters first, then digits, then punctuation.
pub static MORSE_TABLE: [Symbol; NUM_SYMBOLS] = [
    sym(b'A', 6),  // .-
    sym(b'B', 17), // -...
    sym(b'C', 21), // -.-.
    sym(b'D', 9),  // -..
    sym(b'E', 2),  // .
    sym(b'F', 20), // ..-.
    sym(b'G', 11), // --.
    sym(b'H', 16), // ....
    sym(b'I', 4),  // ..
    sym(b'J', 30), // .---
    sym(b'K', 13), // -.-
    sym(b'L', 18), // .-..
    sym(b'M', 7),  // --
    sym(b'N', 5),  // -.
    sym(b'O', 15), // ---
    sym(b'P', 22), // .--.
    sym(b'Q', 27), // --.-
    sym(b'R', 10), // .-.
    sym(b'S', 8),  // ...
    sym(b'T', 3),  // -
    sym(b'U', 12), // ..-
    sym(b'V', 24), // ...-
    sym(b'W', 14), // .--
    sym(b'X', 25), // -..-
    sym(b'Y', 29), // -.--
    sym(b'Z', 19), // --..
    sym(b'0', 63), // -----
    sym(b'1', 62), // .----
    sym(b'2', 60), // ..---
    sym(b'3', 56), // ...--
    sym(b'4', 48), // ....-
    sym(b'5', 32), // .....
    sym(b'6', 33), // -....
    sym(b'7', 35), // --...
    sym(b'8', 39), // ---..
    sym(b'9', 47), // ----.
    sym(b'.', 106), // .-.-.-
    sym(b',', 115), // --..--
    sym(b'?', 76), // ..--..
    sym(b'/', 41), // -..-.
];

/// Packed pattern for `ch`, or 0 if the symbol has no mapping.
///
/// Lowercase letters are folded to uppercase first.
pub fn encode_packed(ch: u8) -> u8 {
    let ch = ch.to_ascii_uppercase();
    MORSE_TABLE
        .iter()
        .find(|s| s.ch == ch)
        .map(|s| s.packed)
        .unwrap_or(0)
}

/// Symbol whose packed pattern is exactly `packed`.
pub fn decode_packed(packed: u8) -> Option<u8> {
    MORSE_TABLE.iter().find(|s| s.packed == packed).map(|s| s.ch)
}

/// Pattern to key for `ch` (case-insensitive).
///
/// Returns `None` for space, control characters and unsupported punctuation.
#[inline]
pub fn encode(ch: u8) -> Option<Pattern> {
    Pattern::from_packed(encode_packed(ch))
}

/// Character for an accumulated pattern, `None` if nothing matches exactly.
#[inline]
pub fn decode(pattern: Pattern) -> Option<u8> {
    decode_packed(pattern.to_packed())
}
