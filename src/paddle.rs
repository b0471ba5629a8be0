//! Module: paddle
//!
//! Purpose: Paddle contact state and the polled paddle reader.
//!
//! Architecture:
//! - [`PaddleState`] is one snapshot of both contacts (1 byte, bit flags)
//! - [`PaddleInput`] is the seam the keyer polls at its defined poll points
//! - [`Paddles`] reads two `embedded-hal` input pins, active low
//!
//! Safety: Safe. No unsafe blocks.

use embedded_hal::digital::{Error as _, InputPin};

use crate::error::KeyerError;

/// Paddle contact state.
///
/// Bit layout:
/// - Bit 0: DIT paddle (1 = closed)
/// - Bit 1: DAH paddle (1 = closed)
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaddleState(u8);

impl PaddleState {
    /// DIT paddle bit mask (bit 0)
    pub const DIT: u8 = 0x01;

    /// DAH paddle bit mask (bit 1)
    pub const DAH: u8 = 0x02;

    /// No paddles closed
    pub const IDLE: Self = Self(0);

    /// Create from the two contact states
    pub const fn from_contacts(dit: bool, dah: bool) -> Self {
        let mut bits = 0;
        if dit {
            bits |= Self::DIT;
        }
        if dah {
            bits |= Self::DAH;
        }
        Self(bits)
    }

    /// Check if DIT paddle is closed
    pub const fn dit(&self) -> bool {
        (self.0 & Self::DIT) != 0
    }

    /// Check if DAH paddle is closed
    pub const fn dah(&self) -> bool {
        (self.0 & Self::DAH) != 0
    }

    /// Check if no paddles are closed
    pub const fn is_idle(&self) -> bool {
        self.0 == 0
    }

    /// Check if both paddles are closed (squeeze)
    pub const fn both(&self) -> bool {
        self.0 == Self::DIT | Self::DAH
    }
}

/// Polled paddle source.
pub trait PaddleInput {
    /// Sample both contacts now.
    fn read(&mut self) -> Result<PaddleState, KeyerError>;
}

/// Two paddle contacts wired to ground with pull-ups (closed = low).
pub struct Paddles<DIT, DAH> {
    dit: DIT,
    dah: DAH,
}

impl<DIT, DAH> Paddles<DIT, DAH>
where
    DIT: InputPin,
    DAH: InputPin,
{
    pub fn new(dit: DIT, dah: DAH) -> Self {
        Self { dit, dah }
    }
}

impl<DIT, DAH> PaddleInput for Paddles<DIT, DAH>
where
    DIT: InputPin,
    DAH: InputPin,
{
    fn read(&mut self) -> Result<PaddleState, KeyerError> {
        let dit = self.dit.is_low().map_err(|e| KeyerError::Paddle(e.kind()))?;
        let dah = self.dah.is_low().map_err(|e| KeyerError::Paddle(e.kind()))?;
        Ok(PaddleState::from_contacts(dit, dah))
    }
}
