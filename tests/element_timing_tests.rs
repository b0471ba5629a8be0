//! Element timer tests on the simulated clock

mod common;

use common::{element_keyer, world};
use serial_cw_keyer::codec::encode;
use serial_cw_keyer::pattern::Element;
use serial_cw_keyer::timing::{KeyerTiming, WPM_MAX, WPM_MIN};

#[test]
fn test_durations_at_12_wpm() {
    let t = KeyerTiming::with_wpm(12);
    assert_eq!(t.dit_ms(), 100);
    assert_eq!(t.dah_ms(), 300);
    assert_eq!(t.element_gap_ms(), 100);
    // Gaps as seen on air: element gap plus the extra silence
    assert_eq!(t.element_gap_ms() + t.char_gap_ms(), 300);
    assert_eq!(t.element_gap_ms() + t.char_gap_ms() + t.word_gap_ms(), 700);
    assert_eq!(t.space_ms(), 700);
}

#[test]
fn test_ratios_hold_for_every_speed() {
    for wpm in WPM_MIN..=WPM_MAX {
        let t = KeyerTiming::with_wpm(wpm);
        let dit = t.dit_ms();
        assert_eq!(dit, 1200 / wpm);
        assert_eq!(t.dah_ms(), 3 * dit);
        assert_eq!(t.element_gap_ms(), dit);
        assert_eq!(t.char_gap_ms(), 2 * dit);
        assert_eq!(t.word_gap_ms(), 4 * dit);
        assert_eq!(t.space_ms(), 7 * dit);
    }
}

#[test]
fn test_dit_element() {
    let w = world();
    let mut ek = element_keyer(&w, 12);

    ek.key_element(Element::Dit).unwrap();

    let w = w.borrow();
    assert_eq!(w.key_events, [(0, true), (100, false)]);
    assert_eq!(w.tone_events, [(0, true), (100, false)]);
    assert_eq!(w.now_ms(), 200);
    assert!(!ek.is_key_down());
}

#[test]
fn test_dah_element_at_20_wpm() {
    let w = world();
    let mut ek = element_keyer(&w, 20);

    ek.key_element(Element::Dah).unwrap();

    let w = w.borrow();
    assert_eq!(w.key_downs(), [(0, 180)]);
    assert_eq!(w.now_ms(), 240);
}

#[test]
fn test_key_pattern_k() {
    let w = world();
    let mut ek = element_keyer(&w, 12);

    ek.key_pattern(encode(b'K').unwrap()).unwrap();

    let w = w.borrow();
    assert_eq!(w.key_downs(), [(0, 300), (400, 100), (600, 300)]);
    // 3 elements with their gaps, then the 2 dit character gap
    assert_eq!(w.now_ms(), 1200);
    assert_eq!(ek.elapsed_us(), 1_200_000);
}

#[test]
fn test_pause_is_silent() {
    let w = world();
    let mut ek = element_keyer(&w, 12);

    ek.pause(700);

    let w = w.borrow();
    assert!(w.key_events.is_empty());
    assert!(w.tone_events.is_empty());
    assert_eq!(w.now_ms(), 700);
}

#[test]
fn test_key_line_failure_is_reported() {
    let w = world();
    let mut ek = element_keyer(&w, 12);
    w.borrow_mut().key_fail = true;

    let err = ek.key_element(Element::Dit).unwrap_err();
    assert_eq!(err.code(), "K02");
    assert!(!ek.is_key_down());
    // Sidetone was still driven
    assert_eq!(w.borrow().tone_events, [(0, true)]);
}

#[test]
fn test_speed_change_applies_to_next_element() {
    let w = world();
    let mut ek = element_keyer(&w, 12);

    ek.key_element(Element::Dit).unwrap();
    ek.set_timing(KeyerTiming::with_wpm(24));
    ek.key_element(Element::Dit).unwrap();

    assert_eq!(w.borrow().key_downs(), [(0, 100), (200, 50)]);
}
