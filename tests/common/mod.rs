//! Mock keyer hardware on a simulated clock.
//!
//! Every mock shares one [`World`]. Time only advances through
//! [`MockDelay`], so a scenario is fully deterministic: paddle presses are
//! scripted as millisecond intervals and every output is recorded with the
//! time it happened.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error, ErrorKind, ErrorType, OutputPin};

use serial_cw_keyer::config::KeyerConfig;
use serial_cw_keyer::hal::{SerialSink, Sidetone};
use serial_cw_keyer::logging::LogStream;
use serial_cw_keyer::paddle::{PaddleInput, PaddleState};
use serial_cw_keyer::stats::KeyerStats;
use serial_cw_keyer::{ElementKeyer, Keyer, KeyerError, KeyerShared, KeyerTiming, RxQueue};

/// Simulated hardware state.
#[derive(Default)]
pub struct World {
    pub now_ns: u64,
    /// Dit paddle closed during these `[start, end)` ms intervals.
    pub dit_presses: Vec<(u64, u64)>,
    pub dah_presses: Vec<(u64, u64)>,
    /// `(ms, keyed)` on every key line write.
    pub key_events: Vec<(u64, bool)>,
    pub tone_events: Vec<(u64, bool)>,
    pub serial: Vec<u8>,
    pub key_fail: bool,
    pub serial_fail: bool,
}

impl World {
    pub fn now_ms(&self) -> u64 {
        self.now_ns / 1_000_000
    }

    /// Key-down intervals as `(start_ms, length_ms)`.
    pub fn key_downs(&self) -> Vec<(u64, u64)> {
        let mut out = Vec::new();
        let mut down_at = None;
        for &(t, on) in &self.key_events {
            match (on, down_at) {
                (true, None) => down_at = Some(t),
                (false, Some(start)) => {
                    out.push((start, t - start));
                    down_at = None;
                }
                _ => {}
            }
        }
        out
    }

    pub fn serial_str(&self) -> String {
        String::from_utf8_lossy(&self.serial).into_owned()
    }
}

pub type SharedWorld = Rc<RefCell<World>>;

pub fn world() -> SharedWorld {
    Rc::new(RefCell::new(World::default()))
}

fn closed(presses: &[(u64, u64)], t: u64) -> bool {
    presses.iter().any(|&(start, end)| t >= start && t < end)
}

/// Simulated pin failure.
#[derive(Debug)]
pub struct MockError;

impl Error for MockError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct MockPaddles(pub SharedWorld);

impl PaddleInput for MockPaddles {
    fn read(&mut self) -> Result<PaddleState, KeyerError> {
        let w = self.0.borrow();
        let t = w.now_ms();
        Ok(PaddleState::from_contacts(closed(&w.dit_presses, t), closed(&w.dah_presses, t)))
    }
}

pub struct MockKey(pub SharedWorld);

impl ErrorType for MockKey {
    type Error = MockError;
}

impl MockKey {
    fn write(&mut self, on: bool) -> Result<(), MockError> {
        let mut w = self.0.borrow_mut();
        if w.key_fail {
            return Err(MockError);
        }
        let t = w.now_ms();
        w.key_events.push((t, on));
        Ok(())
    }
}

impl OutputPin for MockKey {
    fn set_low(&mut self) -> Result<(), MockError> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), MockError> {
        self.write(true)
    }
}

pub struct MockTone(pub SharedWorld);

impl Sidetone for MockTone {
    type Error = ();

    fn start(&mut self) -> Result<(), ()> {
        let mut w = self.0.borrow_mut();
        let t = w.now_ms();
        w.tone_events.push((t, true));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ()> {
        let mut w = self.0.borrow_mut();
        let t = w.now_ms();
        w.tone_events.push((t, false));
        Ok(())
    }
}

pub struct MockDelay(pub SharedWorld);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().now_ns += ns as u64;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().now_ns += ms as u64 * 1_000_000;
    }
}

pub struct MockSerial(pub SharedWorld);

impl SerialSink for MockSerial {
    type Error = ();

    fn write_byte(&mut self, byte: u8) -> Result<(), ()> {
        let mut w = self.0.borrow_mut();
        if w.serial_fail {
            return Err(());
        }
        w.serial.push(byte);
        Ok(())
    }
}

/// Shared keyer state owned by a test.
#[derive(Default)]
pub struct Fixture {
    pub rx: RxQueue,
    pub config: KeyerConfig,
    pub stats: KeyerStats,
    pub log: LogStream,
}

impl Fixture {
    pub fn shared(&self) -> KeyerShared<'_> {
        KeyerShared {
            rx: &self.rx,
            config: &self.config,
            stats: &self.stats,
            log: &self.log,
        }
    }

    /// Queue text as if it arrived on the serial line.
    pub fn receive(&self, text: &str) {
        for b in text.bytes() {
            self.rx.push(b).unwrap();
        }
    }
}

pub type TestElementKeyer = ElementKeyer<MockKey, MockTone, MockDelay>;
pub type TestKeyer<'a> = Keyer<'a, MockPaddles, MockKey, MockTone, MockDelay, MockSerial>;

pub fn element_keyer(world: &SharedWorld, wpm: u32) -> TestElementKeyer {
    ElementKeyer::new(
        MockKey(world.clone()),
        MockTone(world.clone()),
        MockDelay(world.clone()),
        KeyerTiming::with_wpm(wpm),
    )
}

pub fn keyer<'a>(world: &SharedWorld, fx: &'a Fixture) -> TestKeyer<'a> {
    Keyer::new(
        MockPaddles(world.clone()),
        element_keyer(world, fx.config.wpm()),
        MockSerial(world.clone()),
        fx.shared(),
    )
}

/// Step until the simulated clock reaches `t_ms`.
pub fn run_until(keyer: &mut TestKeyer<'_>, world: &SharedWorld, t_ms: u64) {
    while world.borrow().now_ms() < t_ms {
        let _ = keyer.step();
    }
}
