//! Iambic keyer state machine.
//!
//! One [`Keyer::step`] evaluates one state. A step may block for one keyed
//! element (or one relayed character) inside the element timer; paddles are
//! only sampled between elements.
//!
//! ```text
//!            queue ──────────────▶ AsciiRelay ──(queue empty)──┐
//!              ▲                                               │
//!   ┌──────▶ Start ◀───────────────────────────────────────────┘
//!   │          │ dit / dah
//!   │          ▼
//!   │     Dit ◀──squeeze──▶ Dah
//!   │          │ released / 7 elements
//!   │          ▼
//!   │       EndChar ──(paddle)──▶ Dit / Dah
//!   │          │
//!   │          ▼
//!   └──────  EndWord
//! ```
//!
//! Hardware errors never stop the machine: the failing step releases the
//! key, drops the character in progress and the next step starts over.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::codec;
use crate::config::{KeyerConfig, UnknownPolicy, UNKNOWN_MARKER};
use crate::element::ElementKeyer;
use crate::error::KeyerError;
use crate::hal::{SerialSink, Sidetone};
use crate::logging::LogStream;
use crate::paddle::PaddleInput;
use crate::pattern::{Element, Pattern};
use crate::rx_queue::{RxQueue, RX_QUEUE_SIZE};
use crate::stats::KeyerStats;
use crate::{rt_debug, rt_error, rt_info, rt_trace, rt_warn};

/// Startup identification written once on the keyer serial line.
pub const IDENT: &[u8] = b"1K\n";

/// Idle poll interval while nothing is pending, in ms.
pub const IDLE_POLL_MS: u32 = 1;

/// Keyer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyerMode {
    /// Idle: waiting for the queue or a paddle.
    Start,
    /// Sending a dit.
    Dit,
    /// Sending a dah.
    Dah,
    /// Character gap, then decode and emit.
    EndChar,
    /// Word gap.
    EndWord,
    /// Keying out one queued byte.
    AsciiRelay,
}

impl KeyerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Dit => "dit",
            Self::Dah => "dah",
            Self::EndChar => "end-char",
            Self::EndWord => "end-word",
            Self::AsciiRelay => "relay",
        }
    }

    fn sending(element: Element) -> Self {
        match element {
            Element::Dit => Self::Dit,
            Element::Dah => Self::Dah,
        }
    }
}

/// State the keyer shares with other tasks.
pub struct KeyerShared<'a, const N: usize = RX_QUEUE_SIZE> {
    /// Inbound text to relay. The keyer is the only consumer.
    pub rx: &'a RxQueue<N>,
    pub config: &'a KeyerConfig,
    pub stats: &'a KeyerStats,
    /// Ring the keyer logs into.
    pub log: &'a LogStream,
}

impl KeyerShared<'static> {
    /// The firmware's global instances.
    pub fn global() -> Self {
        Self {
            rx: &crate::globals::RX_QUEUE,
            config: &crate::config::CONFIG,
            stats: &crate::globals::STATS,
            log: &crate::globals::KEYER_LOG,
        }
    }
}

/// The keyer control loop.
///
/// Owns the paddles, the element timer and the outbound serial line.
pub struct Keyer<'a, P, K, S, D, W, const N: usize = RX_QUEUE_SIZE> {
    paddles: P,
    output: ElementKeyer<K, S, D>,
    serial: W,
    shared: KeyerShared<'a, N>,
    mode: KeyerMode,
    /// Character being keyed by hand.
    acc: Pattern,
    /// Config generation last applied.
    config_gen: u16,
    unknown: UnknownPolicy,
}

impl<'a, P, K, S, D, W, const N: usize> Keyer<'a, P, K, S, D, W, N>
where
    P: PaddleInput,
    K: OutputPin,
    S: Sidetone,
    D: DelayNs,
    W: SerialSink,
{
    /// Create a keyer in `Start`, with the current configuration applied.
    pub fn new(paddles: P, mut output: ElementKeyer<K, S, D>, serial: W, shared: KeyerShared<'a, N>) -> Self {
        output.set_timing(shared.config.timing());
        Self {
            paddles,
            output,
            serial,
            mode: KeyerMode::Start,
            acc: Pattern::EMPTY,
            config_gen: shared.config.generation(),
            unknown: shared.config.unknown_policy(),
            shared,
        }
    }

    /// Current state.
    #[inline]
    pub fn mode(&self) -> KeyerMode {
        self.mode
    }

    /// Elements keyed so far for the character in progress.
    #[inline]
    pub fn pattern(&self) -> Pattern {
        self.acc
    }

    pub fn output(&self) -> &ElementKeyer<K, S, D> {
        &self.output
    }

    /// Write the startup identification. Call once, after all hardware is up.
    pub fn announce(&mut self) -> Result<(), KeyerError> {
        self.serial.write_all(IDENT).map_err(|_| KeyerError::Serial)?;
        rt_info!(
            self.shared.log,
            self.now_us(),
            "keyer ready, {} wpm",
            self.output.timing().wpm()
        );
        Ok(())
    }

    /// Evaluate one state and move to the next.
    ///
    /// On error the keyer is already back in `Start` with the key released.
    pub fn step(&mut self) -> Result<KeyerMode, KeyerError> {
        self.sync_config();

        let from = self.mode;
        let result = match from {
            KeyerMode::Start => self.start(),
            KeyerMode::Dit => self.element(Element::Dit),
            KeyerMode::Dah => self.element(Element::Dah),
            KeyerMode::EndChar => self.end_char(),
            KeyerMode::EndWord => self.end_word(),
            KeyerMode::AsciiRelay => self.relay(),
        };

        match result {
            Ok(next) => {
                if next != from {
                    rt_trace!(self.shared.log, self.now_us(), "{} -> {}", from.as_str(), next.as_str());
                }
                self.mode = next;
                Ok(next)
            }
            Err(e) => {
                self.output.release();
                self.acc.clear();
                self.mode = KeyerMode::Start;
                self.shared.stats.record_hw_error();
                rt_error!(self.shared.log, self.now_us(), "{} in {}", e, from.as_str());
                Err(e)
            }
        }
    }

    /// Step forever. Errors are already logged and counted by `step`.
    pub fn run(&mut self) -> ! {
        loop {
            let _ = self.step();
        }
    }

    fn now_us(&self) -> i64 {
        self.output.elapsed_us()
    }

    fn sync_config(&mut self) {
        let gen = self.shared.config.generation();
        if gen == self.config_gen {
            return;
        }
        self.config_gen = gen;

        let timing = self.shared.config.timing();
        self.output.set_timing(timing);
        self.unknown = self.shared.config.unknown_policy();
        rt_info!(
            self.shared.log,
            self.now_us(),
            "config: {} wpm (dit {} ms), unknown {}",
            timing.wpm(),
            timing.dit_ms(),
            self.unknown.as_str()
        );
    }

    fn start(&mut self) -> Result<KeyerMode, KeyerError> {
        self.acc.clear();

        if !self.shared.rx.is_empty() {
            return Ok(KeyerMode::AsciiRelay);
        }

        let paddles = self.paddles.read()?;
        if paddles.dit() {
            Ok(KeyerMode::Dit)
        } else if paddles.dah() {
            Ok(KeyerMode::Dah)
        } else {
            self.output.pause(IDLE_POLL_MS);
            Ok(KeyerMode::Start)
        }
    }

    fn element(&mut self, element: Element) -> Result<KeyerMode, KeyerError> {
        self.acc.push(element);
        self.output.key_element(element)?;

        if self.acc.is_full() {
            return Ok(KeyerMode::EndChar);
        }

        let paddles = self.paddles.read()?;
        let (held, other) = match element {
            Element::Dit => (paddles.dit(), paddles.dah()),
            Element::Dah => (paddles.dah(), paddles.dit()),
        };

        Ok(if other {
            KeyerMode::sending(element.opposite())
        } else if !held {
            KeyerMode::EndChar
        } else {
            KeyerMode::sending(element)
        })
    }

    fn end_char(&mut self) -> Result<KeyerMode, KeyerError> {
        self.output.pause(self.output.timing().char_gap_ms());

        let pattern = self.acc;
        self.acc.clear();
        if !pattern.is_empty() {
            self.emit(pattern)?;
        }

        let paddles = self.paddles.read()?;
        Ok(if paddles.dit() {
            KeyerMode::Dit
        } else if paddles.dah() {
            KeyerMode::Dah
        } else {
            KeyerMode::EndWord
        })
    }

    fn end_word(&mut self) -> Result<KeyerMode, KeyerError> {
        self.output.pause(self.output.timing().word_gap_ms());
        Ok(KeyerMode::Start)
    }

    fn relay(&mut self) -> Result<KeyerMode, KeyerError> {
        let Some(byte) = self.shared.rx.pop() else {
            return Ok(KeyerMode::Start);
        };

        match codec::encode(byte) {
            Some(pattern) => {
                self.output.key_pattern(pattern)?;
                self.shared.stats.record_relayed();
            }
            None => {
                self.output.pause(self.output.timing().space_ms());
                self.shared.stats.record_relayed_silent();
            }
        }
        self.write(byte)?;
        rt_debug!(self.shared.log, self.now_us(), "relayed {:?}", byte as char);

        Ok(if self.shared.rx.is_empty() {
            KeyerMode::Start
        } else {
            KeyerMode::AsciiRelay
        })
    }

    /// Decode a hand-keyed character and send the result.
    fn emit(&mut self, pattern: Pattern) -> Result<(), KeyerError> {
        match codec::decode(pattern) {
            Some(ch) => {
                self.shared.stats.record_decoded();
                self.write(ch)
            }
            None => {
                let packed = pattern.to_packed();
                self.shared.stats.record_unknown(packed);
                rt_warn!(
                    self.shared.log,
                    self.now_us(),
                    "unmapped pattern {} (0x{:02X})",
                    pattern,
                    packed
                );
                match self.unknown {
                    UnknownPolicy::Marker => self.write(UNKNOWN_MARKER),
                    UnknownPolicy::Suppress => Ok(()),
                }
            }
        }
    }

    fn write(&mut self, byte: u8) -> Result<(), KeyerError> {
        self.serial.write_byte(byte).map_err(|_| KeyerError::Serial)
    }
}
