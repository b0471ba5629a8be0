//! Keyer statistics.
//!
//! Nothing the keyer hits is fatal, so every abnormal condition ends up here
//! as a counter instead of a fault state. Written by the keyer loop, read by
//! the service console.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Thread-safe keyer counters.
///
/// # Usage
///
/// ```
/// use serial_cw_keyer::stats::KeyerStats;
///
/// static STATS: KeyerStats = KeyerStats::new();
///
/// STATS.record_unknown(0x80);
/// let snap = STATS.snapshot();
/// assert_eq!(snap.unknown, 1);
/// assert_eq!(snap.last_unknown, 0x80);
/// ```
pub struct KeyerStats {
    /// Paddle characters decoded to a table symbol.
    decoded: AtomicU32,

    /// Paddle characters matching no symbol.
    unknown: AtomicU32,

    /// Packed form of the most recent unmapped pattern.
    last_unknown: AtomicU8,

    /// Queued bytes keyed out as Morse.
    relayed: AtomicU32,

    /// Queued bytes with no mapping (sent as silence).
    relayed_silent: AtomicU32,

    /// Hardware I/O errors in the keyer loop.
    hw_errors: AtomicU32,

    /// Times the keyer UART driver ring filled while the RX queue was full.
    rx_uart_full: AtomicU32,
}

impl KeyerStats {
    /// Create zeroed counters.
    pub const fn new() -> Self {
        Self {
            decoded: AtomicU32::new(0),
            unknown: AtomicU32::new(0),
            last_unknown: AtomicU8::new(0),
            relayed: AtomicU32::new(0),
            relayed_silent: AtomicU32::new(0),
            hw_errors: AtomicU32::new(0),
            rx_uart_full: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn record_decoded(&self) {
        self.decoded.fetch_add(1, Ordering::Relaxed);
    }

    /// Count an unmapped paddle pattern and remember it.
    #[inline]
    pub fn record_unknown(&self, packed: u8) {
        self.last_unknown.store(packed, Ordering::Relaxed);
        self.unknown.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_relayed(&self) {
        self.relayed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_relayed_silent(&self) {
        self.relayed_silent.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_hw_error(&self) {
        self.hw_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one episode of inbound serial text backing up to the limit of
    /// the UART driver. Bytes arriving past that point can be dropped by
    /// the driver.
    #[inline]
    pub fn record_rx_uart_full(&self) {
        self.rx_uart_full.fetch_add(1, Ordering::Relaxed);
    }

    /// Zero every counter.
    pub fn reset(&self) {
        self.decoded.store(0, Ordering::Relaxed);
        self.unknown.store(0, Ordering::Relaxed);
        self.last_unknown.store(0, Ordering::Relaxed);
        self.relayed.store(0, Ordering::Relaxed);
        self.relayed_silent.store(0, Ordering::Relaxed);
        self.hw_errors.store(0, Ordering::Relaxed);
        self.rx_uart_full.store(0, Ordering::Relaxed);
    }

    /// Get a snapshot of the counters at this point in time.
    #[inline]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            decoded: self.decoded.load(Ordering::Relaxed),
            unknown: self.unknown.load(Ordering::Relaxed),
            last_unknown: self.last_unknown.load(Ordering::Relaxed),
            relayed: self.relayed.load(Ordering::Relaxed),
            relayed_silent: self.relayed_silent.load(Ordering::Relaxed),
            hw_errors: self.hw_errors.load(Ordering::Relaxed),
            rx_uart_full: self.rx_uart_full.load(Ordering::Relaxed),
        }
    }
}

impl Default for KeyerStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of keyer statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub decoded: u32,
    pub unknown: u32,
    pub last_unknown: u8,
    pub relayed: u32,
    pub relayed_silent: u32,
    pub hw_errors: u32,
    pub rx_uart_full: u32,
}
