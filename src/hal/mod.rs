//! Hardware Abstraction Layer for the keyer.
//!
//! Pins and delays use the `embedded-hal` traits directly. The two outputs
//! that are not plain pins get a trait here:
//! - [`Sidetone`]: audible tone while the key is down
//! - [`SerialSink`]: outbound keyer serial bytes
//!
//! ESP-IDF implementations live in [`esp`]. Business logic stays in core
//! modules, HAL is just I/O.

#[cfg(target_os = "espidf")]
pub mod esp;

/// Sidetone oscillator on/off control.
///
/// Only the element timer drives this, together with the key line.
pub trait Sidetone {
    type Error: core::fmt::Debug;

    /// Start the tone.
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Stop the tone and leave the output idle.
    fn stop(&mut self) -> Result<(), Self::Error>;
}

/// Outbound serial byte sink.
pub trait SerialSink {
    type Error: core::fmt::Debug;

    /// Write one byte, blocking until the transmitter accepts it.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write every byte of `bytes` in order.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &b in bytes {
            self.write_byte(b)?;
        }
        Ok(())
    }
}
