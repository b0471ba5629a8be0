//! Log output on the service UART.
//!
//! ```text
//! ESP32-S3 GPIO6 (TX) ──────▶ USB-UART RX
//!                              └─▶ PC serial monitor
//! ```
//!
//! The formatting and draining here is target independent; the console task
//! calls [`drain_logs`] with a [`CrlfWriter`] over its UART between command
//! polls. Everything written here ends lines with a bare `\n`; the writer
//! owns the CRLF translation.

use core::fmt::Write;

use crate::hal::SerialSink;
use crate::logging::{LogEntry, LogStream};

/// Service UART settings.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self { baud_rate: 115_200 }
    }
}

/// `fmt::Write` over a serial sink, LF expanded to CRLF.
pub struct CrlfWriter<'a, S>(pub &'a mut S);

impl<S: SerialSink> Write for CrlfWriter<'_, S> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for (i, part) in s.split('\n').enumerate() {
            if i > 0 {
                self.0.write_all(b"\r\n").map_err(|_| core::fmt::Error)?;
            }
            self.0.write_all(part.as_bytes()).map_err(|_| core::fmt::Error)?;
        }
        Ok(())
    }
}

/// Write one entry as `[timestamp_us] LEVEL: message`.
pub fn write_log_entry<W: Write>(out: &mut W, entry: &LogEntry) -> core::fmt::Result {
    writeln!(
        out,
        "[{:10}] {}: {}",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.message()
    )
}

/// Format one entry into `buf`. Returns the number of bytes used.
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = crate::logging::BufWriter::new(buf);
    let _ = write_log_entry(&mut writer, entry);
    writer.len()
}

/// Drain every pending entry of `streams`, in order, into `out`.
///
/// Streams that dropped messages since the last call get a one-line
/// report after their entries. Returns the number of entries written.
pub fn drain_logs<W: Write, const N: usize>(out: &mut W, streams: &[(&str, &LogStream<N>)]) -> usize {
    let mut written = 0;

    for (name, stream) in streams {
        while let Some(entry) = stream.drain() {
            let _ = write_log_entry(out, &entry);
            written += 1;
        }

        let dropped = stream.dropped();
        if dropped > 0 {
            let _ = writeln!(out, "[WARN] {} log dropped {} messages", name, dropped);
            stream.reset_dropped();
        }
    }

    written
}
