//! Module: pattern
//!
//! Purpose: Morse element sequences. A [`Pattern`] is an explicit
//! (element bits, length) pair; the sentinel-packed byte form only exists at
//! the codec boundary ([`Pattern::from_packed`] / [`Pattern::to_packed`]).
//!
//! Packed form: element `i` lives in bit `i` (0 = dit, 1 = dah), read
//! LSB-first, terminated by a single sentinel 1 bit:
//!
//! ```text
//! K = dah dit dah = 0b101 | (1 << 3) = 0b1101 = 13
//! ```
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

/// Keying element type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Element {
    Dit,
    Dah,
}

impl Element {
    /// Get the opposite element.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Element::Dit => Element::Dah,
            Element::Dah => Element::Dit,
        }
    }
}

/// Sequence of up to [`Pattern::MAX_ELEMENTS`] Morse elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Pattern {
    /// Element `i` at bit `i`, 1 = dah.
    bits: u8,
    /// Number of elements.
    len: u8,
}

impl Pattern {
    /// Longest sequence whose packed form (elements + sentinel) fits a `u8`.
    pub const MAX_ELEMENTS: u8 = 7;

    /// No elements.
    pub const EMPTY: Self = Self { bits: 0, len: 0 };

    /// Create an empty pattern.
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Build from a packed sentinel byte.
    ///
    /// Returns `None` for 0, which carries no sentinel ("no mapping").
    pub const fn from_packed(packed: u8) -> Option<Self> {
        if packed == 0 {
            return None;
        }
        // Sentinel is the highest set bit
        let len = 7 - packed.leading_zeros() as u8;
        let bits = packed & !(1u8 << len);
        Some(Self { bits, len })
    }

    /// Packed sentinel byte for this pattern.
    pub const fn to_packed(&self) -> u8 {
        self.bits | (1u8 << self.len)
    }

    /// Append an element. No-op once the pattern is full.
    #[inline]
    pub fn push(&mut self, element: Element) {
        if self.is_full() {
            return;
        }
        if element == Element::Dah {
            self.bits |= 1 << self.len;
        }
        self.len += 1;
    }

    /// Element at position `idx`, first sent = 0.
    #[inline]
    pub fn get(&self, idx: u8) -> Option<Element> {
        if idx >= self.len {
            return None;
        }
        if self.bits & (1 << idx) != 0 {
            Some(Element::Dah)
        } else {
            Some(Element::Dit)
        }
    }

    /// Number of elements.
    #[inline]
    pub const fn len(&self) -> u8 {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once no more elements can be appended.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.len >= Self::MAX_ELEMENTS
    }

    /// Clear back to [`Pattern::EMPTY`].
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::EMPTY;
    }

    /// Iterate elements in sending order.
    pub fn elements(&self) -> Elements {
        Elements {
            pattern: *self,
            idx: 0,
        }
    }}

/// Iterator over the elements of a [`Pattern`].
pub struct Elements {
    pattern: Pattern,
    idx: u8,
}

impl Iterator for Elements {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        let element = self.pattern.get(self.idx)?;
        self.idx += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.pattern.len - self.idx) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Elements {}

impl core::fmt::Display for Pattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for element in self.elements() {
            let c = match element {
                Element::Dit => '.',
                Element::Dah => '-',
            };
            core::fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}
