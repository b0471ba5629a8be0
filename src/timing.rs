//! Element timing derived from keying speed.
//!
//! PARIS timing: dit = 1.2 / WPM seconds. Every other duration is an exact
//! multiple of the dit.

/// Slowest supported speed.
pub const WPM_MIN: u32 = 5;

/// Fastest supported speed.
pub const WPM_MAX: u32 = 40;

/// Power-on speed.
pub const WPM_DEFAULT: u32 = 12;

/// Keying durations for one speed setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyerTiming {
    wpm: u32,
    dit_ms: u32,
}

impl Default for KeyerTiming {
    fn default() -> Self {
        Self::with_wpm(WPM_DEFAULT)
    }
}

impl KeyerTiming {
    /// Timing for `wpm`, clamped to [`WPM_MIN`]..=[`WPM_MAX`].
    pub const fn with_wpm(wpm: u32) -> Self {
        let wpm = if wpm < WPM_MIN {
            WPM_MIN
        } else if wpm > WPM_MAX {
            WPM_MAX
        } else {
            wpm
        };
        Self {
            wpm,
            dit_ms: 1200 / wpm,
        }
    }

    /// Effective speed after clamping.
    #[inline]
    pub const fn wpm(&self) -> u32 {
        self.wpm
    }

    /// Dit duration in milliseconds.
    #[inline]
    pub const fn dit_ms(&self) -> u32 {
        self.dit_ms
    }

    /// Dah duration in milliseconds (3x dit).
    #[inline]
    pub const fn dah_ms(&self) -> u32 {
        self.dit_ms * 3
    }

    /// Key-up gap after every element (1x dit).
    #[inline]
    pub const fn element_gap_ms(&self) -> u32 {
        self.dit_ms
    }

    /// Extra silence closing a character (2x dit, 3x counting the element gap).
    #[inline]
    pub const fn char_gap_ms(&self) -> u32 {
        self.dit_ms * 2
    }

    /// Extra silence closing a word after the character gap (4x dit).
    #[inline]
    pub const fn word_gap_ms(&self) -> u32 {
        self.dit_ms * 4
    }

    /// Silence keyed in place of an unmapped relay character (7x dit).
    #[inline]
    pub const fn space_ms(&self) -> u32 {
        self.dit_ms * 7
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_speed() {
        let t = KeyerTiming::default();
        assert_eq!(t.wpm(), 12);
        assert_eq!(t.dit_ms(), 100);
        assert_eq!(t.dah_ms(), 300);
        assert_eq!(t.element_gap_ms(), 100);
        assert_eq!(t.char_gap_ms(), 200);
        assert_eq!(t.word_gap_ms(), 400);
        assert_eq!(t.space_ms(), 700);
    }

    #[test]
    fn test_dit_timing_accuracy() {
        // 1.2s / 25 = 48ms
        assert_eq!(KeyerTiming::with_wpm(25).dit_ms(), 48);
        assert_eq!(KeyerTiming::with_wpm(20).dit_ms(), 60);
    }

    #[test]
    fn test_ratios_hold_for_every_speed() {
        for wpm in WPM_MIN..=WPM_MAX {
            let t = KeyerTiming::with_wpm(wpm);
            let dit = t.dit_ms();
            assert_eq!(t.dah_ms(), dit * 3, "wpm {}", wpm);
            assert_eq!(t.element_gap_ms(), dit, "wpm {}", wpm);
            assert_eq!(t.char_gap_ms(), dit * 2, "wpm {}", wpm);
            assert_eq!(t.space_ms(), dit * 7, "wpm {}", wpm);
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(KeyerTiming::with_wpm(0).wpm(), WPM_MIN);
        assert_eq!(KeyerTiming::with_wpm(1000).wpm(), WPM_MAX);
    }
}
