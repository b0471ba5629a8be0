//! Keyer error types

use embedded_hal::digital::ErrorKind;

/// Hardware I/O failure seen by the keyer loop.
///
/// Never fatal: the step that hit it releases the key, drops the character
/// in progress and returns to `Start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyerError {
    /// K01: Paddle input read failed
    Paddle(ErrorKind),
    /// K02: Key output write failed
    KeyLine(ErrorKind),
    /// K03: Sidetone enable/disable failed
    Sidetone,
    /// K04: Serial output write failed
    Serial,
}

impl KeyerError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Paddle(_) => "K01",
            Self::KeyLine(_) => "K02",
            Self::Sidetone => "K03",
            Self::Serial => "K04",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Paddle(_) => "paddle read failed",
            Self::KeyLine(_) => "key line write failed",
            Self::Sidetone => "sidetone control failed",
            Self::Serial => "serial write failed",
        }
    }
}

impl core::fmt::Display for KeyerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Paddle(kind) | Self::KeyLine(kind) => {
                write!(f, "{}: {} ({})", self.code(), self.message(), kind)
            }
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}
