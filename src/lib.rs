//! # SerialCWKeyer
//!
//! Iambic CW keyer with a serial text side.
//!
//! ## Architecture
//!
//! ```text
//! paddles ──▶ Keyer (state machine) ──▶ ElementKeyer ──▶ key line + sidetone
//!                 ▲        │
//!   serial RX ──▶ RxQueue  └──▶ decoded / relayed characters ──▶ serial TX
//! ```
//!
//! - Hand-keyed characters are decoded through [`codec`] and sent out on
//!   the serial line
//! - Text arriving on the serial line is queued, keyed out as Morse and
//!   echoed back
//! - Everything is polled from one control loop; the only shared state is
//!   the RX queue, the configuration, the statistics and the log rings
//!
//! Hardware is reached through `embedded-hal` traits plus [`hal::Sidetone`]
//! and [`hal::SerialSink`], so the whole crate runs on the host under test.

#![cfg_attr(not(test), no_std)]

pub mod codec;
pub mod config;
pub mod console;
pub mod element;
pub mod error;
pub mod globals;
pub mod hal;
pub mod keyer;
pub mod logging;
pub mod paddle;
pub mod pattern;
pub mod rx_queue;
pub mod stats;
pub mod timing;
pub mod uart_logger;

pub use config::CONFIG;
pub use element::ElementKeyer;
pub use error::KeyerError;
pub use keyer::{Keyer, KeyerMode, KeyerShared};
pub use paddle::{PaddleInput, PaddleState, Paddles};
pub use pattern::{Element, Pattern};
pub use rx_queue::{RxFull, RxQueue};
pub use stats::{KeyerStats, StatsSnapshot};
pub use timing::KeyerTiming;
