//! Global keyer instances shared between tasks.
//!
//! One log stream per producer side, following the single-producer-per-core
//! rule of the log ring.

use crate::logging::LogStream;
use crate::rx_queue::RxQueue;
use crate::stats::KeyerStats;

/// Keyer loop log stream.
///
/// Single producer (keyer loop), single consumer (console/log task).
pub static KEYER_LOG: LogStream = LogStream::new();

/// Background log stream (RX pump, console).
///
/// Multiple producers (coordinated via fetch_add), single consumer.
pub static BG_LOG: LogStream = LogStream::new();

/// Inbound serial text waiting to be relayed.
///
/// Producer: RX pump task. Consumer: keyer loop.
pub static RX_QUEUE: RxQueue = RxQueue::new();

/// Keyer counters, shown by the console `stats` command.
pub static STATS: KeyerStats = KeyerStats::new();
