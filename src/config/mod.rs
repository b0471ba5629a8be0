//! Module: config
//!
//! Purpose: Runtime configuration for the keyer.
//!
//! Architecture:
//! - [`KeyerConfig`]: all parameters as atomics, global instance [`CONFIG`]
//! - Every accepted change bumps a generation counter
//! - The keyer loop compares generations at the top of each step and only
//!   then reloads, so a change never lands in the middle of an element
//! - [`PARAMS`]: static descriptor table used by the service console
//!
//! Safety: RT-safe. All access via atomics, no locks.

use core::sync::atomic::{AtomicU16, AtomicU32, AtomicU8, Ordering};

use crate::timing::{KeyerTiming, WPM_DEFAULT, WPM_MAX, WPM_MIN};

/// What to emit when a keyed pattern matches no symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum UnknownPolicy {
    /// Emit nothing (the condition is still counted and logged).
    Suppress = 0,
    /// Emit [`UNKNOWN_MARKER`].
    Marker = 1,
}

impl UnknownPolicy {
    /// Highest valid raw value.
    pub const MAX: u8 = 1;

    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Suppress),
            1 => Some(Self::Marker),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Suppress => "suppress",
            Self::Marker => "marker",
        }
    }
}

/// Byte emitted for an unmapped pattern under [`UnknownPolicy::Marker`].
///
/// Not a symbol in the Morse table, so it cannot be confused with a decode.
pub const UNKNOWN_MARKER: u8 = b'*';

/// Rejected parameter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSetError {
    /// Value outside the parameter's range
    OutOfRange,
    /// Value has the wrong type for the parameter
    InvalidValue,
}

/// Keyer configuration, lock-free.
pub struct KeyerConfig {
    wpm: AtomicU32,
    unknown: AtomicU8,
    generation: AtomicU16,
}

impl KeyerConfig {
    /// Power-on defaults.
    pub const fn new() -> Self {
        Self {
            wpm: AtomicU32::new(WPM_DEFAULT),
            unknown: AtomicU8::new(UnknownPolicy::Marker as u8),
            generation: AtomicU16::new(0),
        }
    }

    /// Keying speed in words per minute.
    #[inline]
    pub fn wpm(&self) -> u32 {
        self.wpm.load(Ordering::Acquire)
    }

    /// Set keying speed. Must be within [`WPM_MIN`]..=[`WPM_MAX`].
    pub fn set_wpm(&self, wpm: u32) -> Result<(), ParamSetError> {
        if !(WPM_MIN..=WPM_MAX).contains(&wpm) {
            return Err(ParamSetError::OutOfRange);
        }
        self.wpm.store(wpm, Ordering::Release);
        self.bump();
        Ok(())
    }

    /// Policy for unmapped patterns.
    #[inline]
    pub fn unknown_policy(&self) -> UnknownPolicy {
        UnknownPolicy::from_u8(self.unknown.load(Ordering::Acquire)).unwrap_or(UnknownPolicy::Marker)
    }

    pub fn set_unknown_policy(&self, policy: UnknownPolicy) {
        self.unknown.store(policy as u8, Ordering::Release);
        self.bump();
    }

    /// Timing for the current speed.
    #[inline]
    pub fn timing(&self) -> KeyerTiming {
        KeyerTiming::with_wpm(self.wpm())
    }

    /// Incremented on every accepted change.
    #[inline]
    pub fn generation(&self) -> u16 {
        self.generation.load(Ordering::Acquire)
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

impl Default for KeyerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Global configuration used by the firmware and the console.
pub static CONFIG: KeyerConfig = KeyerConfig::new();

// ============================================================================
// Parameter descriptors (console access)
// ============================================================================

/// Typed parameter value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamValue {
    U8(u8),
    U32(u32),
}

impl core::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::U8(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
        }
    }
}

/// Parameter type with valid range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamType {
    U32 { min: u32, max: u32 },
    /// Enumeration stored as 0..=max
    Enum { max: u8 },
}

/// One console-visible parameter.
pub struct ParamDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub param_type: ParamType,
    pub get_fn: fn() -> ParamValue,
    pub set_fn: fn(ParamValue) -> Result<(), ParamSetError>,
}

fn get_wpm() -> ParamValue {
    ParamValue::U32(CONFIG.wpm())
}

fn set_wpm(value: ParamValue) -> Result<(), ParamSetError> {
    match value {
        ParamValue::U32(wpm) => CONFIG.set_wpm(wpm),
        _ => Err(ParamSetError::InvalidValue),
    }
}

fn get_unknown() -> ParamValue {
    ParamValue::U8(CONFIG.unknown_policy() as u8)
}

fn set_unknown(value: ParamValue) -> Result<(), ParamSetError> {
    match value {
        ParamValue::U8(raw) => {
            let policy = UnknownPolicy::from_u8(raw).ok_or(ParamSetError::OutOfRange)?;
            CONFIG.set_unknown_policy(policy);
            Ok(())
        }
        _ => Err(ParamSetError::InvalidValue),
    }
}

/// All console-visible parameters.
pub static PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor {
        name: "wpm",
        description: "Keying speed (words per minute)",
        param_type: ParamType::U32 { min: WPM_MIN, max: WPM_MAX },
        get_fn: get_wpm,
        set_fn: set_wpm,
    },
    ParamDescriptor {
        name: "unknown",
        description: "Unmapped pattern output (0=suppress, 1=marker)",
        param_type: ParamType::Enum { max: UnknownPolicy::MAX },
        get_fn: get_unknown,
        set_fn: set_unknown,
    },
];

/// Find a parameter by exact name.
pub fn find_param(name: &str) -> Option<&'static ParamDescriptor> {
    PARAMS.iter().find(|p| p.name == name)
}

/// Parameters whose name starts with `pattern` minus a trailing `*`.
pub fn find_params_matching(pattern: &str) -> impl Iterator<Item = &'static ParamDescriptor> + '_ {
    let prefix = pattern.strip_suffix('*').unwrap_or(pattern);
    PARAMS.iter().filter(move |p| p.name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = KeyerConfig::new();
        assert_eq!(cfg.wpm(), 12);
        assert_eq!(cfg.unknown_policy(), UnknownPolicy::Marker);
        assert_eq!(cfg.generation(), 0);
        assert_eq!(cfg.timing().dit_ms(), 100);
    }

    #[test]
    fn test_set_wpm_range() {
        let cfg = KeyerConfig::new();
        assert_eq!(cfg.set_wpm(4), Err(ParamSetError::OutOfRange));
        assert_eq!(cfg.set_wpm(41), Err(ParamSetError::OutOfRange));
        assert_eq!(cfg.generation(), 0);

        assert!(cfg.set_wpm(5).is_ok());
        assert!(cfg.set_wpm(40).is_ok());
        assert_eq!(cfg.wpm(), 40);
        assert_eq!(cfg.generation(), 2);
    }

    #[test]
    fn test_unknown_policy_roundtrip() {
        let cfg = KeyerConfig::new();
        cfg.set_unknown_policy(UnknownPolicy::Suppress);
        assert_eq!(cfg.unknown_policy(), UnknownPolicy::Suppress);
        assert_eq!(UnknownPolicy::from_u8(2), None);
    }

    #[test]
    fn test_find_param() {
        assert!(find_param("wpm").is_some());
        assert!(find_param("speed").is_none());
        assert_eq!(find_params_matching("w*").count(), 1);
        assert_eq!(find_params_matching("*").count(), PARAMS.len());
    }

    #[test]
    fn test_marker_is_not_a_symbol() {
        assert_eq!(crate::codec::encode_packed(UNKNOWN_MARKER), 0);
    }
}
