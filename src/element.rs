//! Element timer: the keying primitive every dit and dah goes through.
//!
//! Owns the key line, the sidetone and the delay provider. Every delay is
//! blocking: while an element is being sent the keyer does nothing else.
//!
//! ```text
//! key_element(Dit):  ‾‾‾‾|____         (1 dit on, 1 dit off)
//! key_element(Dah):  ‾‾‾‾‾‾‾‾‾‾‾‾|____ (3 dits on, 1 dit off)
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};

use crate::error::KeyerError;
use crate::hal::Sidetone;
use crate::pattern::{Element, Pattern};
use crate::timing::KeyerTiming;

/// Key line + sidetone driver with element timing.
pub struct ElementKeyer<K, S, D> {
    key: K,
    tone: S,
    delay: D,
    timing: KeyerTiming,
    key_down: bool,
    /// Time spent inside this timer's delays, in microseconds.
    elapsed_us: i64,
}

impl<K, S, D> ElementKeyer<K, S, D>
where
    K: OutputPin,
    S: Sidetone,
    D: DelayNs,
{
    /// Create a new element timer. The key starts released.
    pub fn new(key: K, tone: S, delay: D, timing: KeyerTiming) -> Self {
        Self {
            key,
            tone,
            delay,
            timing,
            key_down: false,
            elapsed_us: 0,
        }
    }

    /// Current timing.
    #[inline]
    pub fn timing(&self) -> &KeyerTiming {
        &self.timing
    }

    /// Change speed. Takes effect with the next element.
    #[inline]
    pub fn set_timing(&mut self, timing: KeyerTiming) {
        self.timing = timing;
    }

    /// Check if key output is currently asserted.
    #[inline]
    pub fn is_key_down(&self) -> bool {
        self.key_down
    }

    /// Keyer time: total microseconds spent in delays since creation.
    ///
    /// Used as the log timestamp for the keyer loop.
    #[inline]
    pub fn elapsed_us(&self) -> i64 {
        self.elapsed_us
    }

    /// Assert or release the key line and start or stop the sidetone.
    ///
    /// Both outputs are always driven; the first error is reported.
    pub fn key_line(&mut self, on: bool) -> Result<(), KeyerError> {
        let line = (if on { self.key.set_high() } else { self.key.set_low() })
            .map_err(|e| KeyerError::KeyLine(e.kind()));
        let tone = (if on { self.tone.start() } else { self.tone.stop() })
            .map_err(|_| KeyerError::Sidetone);

        self.key_down = on && line.is_ok();
        line.and(tone)
    }

    /// Send one element: key down for its length, then one dit of silence.
    pub fn key_element(&mut self, element: Element) -> Result<(), KeyerError> {
        let on_ms = match element {
            Element::Dit => self.timing.dit_ms(),
            Element::Dah => self.timing.dah_ms(),
        };

        self.key_line(true)?;
        self.pause(on_ms);
        self.key_line(false)?;
        self.pause(self.timing.element_gap_ms());
        Ok(())
    }

    /// Send a whole character: every element, then the character gap.
    pub fn key_pattern(&mut self, pattern: Pattern) -> Result<(), KeyerError> {
        for element in pattern.elements() {
            self.key_element(element)?;
        }
        self.pause(self.timing.char_gap_ms());
        Ok(())
    }

    /// Blocking wait with the key left as is.
    #[inline]
    pub fn pause(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
        self.elapsed_us += ms as i64 * 1000;
    }

    /// Best-effort key release after an error. Never fails.
    pub fn release(&mut self) {
        let _ = self.key.set_low();
        let _ = self.tone.stop();
        self.key_down = false;
    }
}
