//! Service console on UART1.
//!
//! Polled from the console/log task, never from the keyer loop.
//! Zero heap allocation: fixed line buffer, static command table.

pub mod commands;
pub mod console;
pub mod error;
pub mod line_buffer;
pub mod parser;

pub use commands::{execute, COMMANDS};
pub use console::Console;
pub use error::ConsoleError;
pub use line_buffer::LineBuffer;
pub use parser::{parse_line, ParsedCommand};
