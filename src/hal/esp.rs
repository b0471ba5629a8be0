//! ESP-IDF adapters for the keyer HAL traits.
//!
//! Paddles, key line and delay use the esp-idf-hal drivers as they are
//! (`PinDriver` and `Delay` implement the `embedded-hal` 1.0 traits).

use esp_idf_svc::hal::ledc::config::TimerConfig;
use esp_idf_svc::hal::ledc::LedcDriver;
use esp_idf_svc::hal::uart::UartTxDriver;
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::EspError;

use super::{SerialSink, Sidetone};

/// Sidetone frequency.
pub const SIDETONE_HZ: u32 = 700;

/// LEDC timer configuration for the sidetone.
pub fn sidetone_timer_config() -> TimerConfig {
    TimerConfig::new().frequency(Hertz(SIDETONE_HZ))
}

/// Square-wave sidetone on an LEDC channel.
///
/// The waveform runs in hardware; start/stop only change the duty.
pub struct LedcSidetone<'d> {
    channel: LedcDriver<'d>,
    on_duty: u32,
}

impl<'d> LedcSidetone<'d> {
    /// Wrap a channel whose timer runs at [`SIDETONE_HZ`]. The output
    /// starts silent.
    pub fn new(mut channel: LedcDriver<'d>) -> Result<Self, EspError> {
        let on_duty = channel.get_max_duty() / 2;
        channel.set_duty(0)?;
        Ok(Self { channel, on_duty })
    }
}

impl Sidetone for LedcSidetone<'_> {
    type Error = EspError;

    fn start(&mut self) -> Result<(), EspError> {
        self.channel.set_duty(self.on_duty)
    }

    fn stop(&mut self) -> Result<(), EspError> {
        self.channel.set_duty(0)
    }
}

impl SerialSink for UartTxDriver<'_> {
    type Error = EspError;

    fn write_byte(&mut self, byte: u8) -> Result<(), EspError> {
        SerialSink::write_all(self, &[byte])
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), EspError> {
        let mut rest = bytes;
        while !rest.is_empty() {
            let n = self.write(rest)?;
            rest = &rest[n..];
        }
        Ok(())
    }
}
