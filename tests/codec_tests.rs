//! Morse codec tests over the full symbol table

use serial_cw_keyer::codec::{decode, decode_packed, encode, encode_packed, MORSE_TABLE};
use serial_cw_keyer::pattern::{Element, Pattern};

#[test]
fn test_every_symbol_round_trips() {
    for sym in MORSE_TABLE.iter() {
        let pattern = encode(sym.ch).unwrap();
        assert_eq!(decode(pattern), Some(sym.ch), "symbol {}", sym.ch as char);
        assert_eq!(pattern.to_packed(), sym.packed);
    }
}

#[test]
fn test_lowercase_encodes_like_uppercase() {
    for c in b'a'..=b'z' {
        assert_eq!(encode(c), encode(c.to_ascii_uppercase()));
        assert_eq!(encode_packed(c), encode_packed(c.to_ascii_uppercase()));
    }
}

#[test]
fn test_unlisted_packed_values_decode_to_none() {
    for packed in 0..=u8::MAX {
        let listed = MORSE_TABLE.iter().any(|s| s.packed == packed);
        assert_eq!(decode_packed(packed).is_some(), listed, "packed {}", packed);
    }
}

#[test]
fn test_unmapped_characters() {
    for c in [b' ', b'*', b'!', b'\n', b'@', 0u8, 0xFF] {
        assert_eq!(encode(c), None);
        assert_eq!(encode_packed(c), 0);
    }
}

#[test]
fn test_element_order_is_sending_order() {
    // Q = dah dah dit dah
    let q: Vec<Element> = encode(b'Q').unwrap().elements().collect();
    assert_eq!(q, [Element::Dah, Element::Dah, Element::Dit, Element::Dah]);

    // 6 = dah then four dits
    let six: Vec<Element> = encode(b'6').unwrap().elements().collect();
    assert_eq!(six, [Element::Dah, Element::Dit, Element::Dit, Element::Dit, Element::Dit]);
}

#[test]
fn test_decode_built_pattern() {
    let mut p = Pattern::new();
    for e in [Element::Dit, Element::Dah, Element::Dit, Element::Dah, Element::Dit, Element::Dah] {
        p.push(e);
    }
    assert_eq!(decode(p), Some(b'.'));

    // Seven elements never match the table
    p.push(Element::Dit);
    assert_eq!(p.len(), 7);
    assert_eq!(decode(p), None);
}
