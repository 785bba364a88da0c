//! Ring states: one boolean per ring position.
//!
//! A [`State`] is a transparent wrapper around `u8`. Ring position 0 (G0)
//! is stored in the most significant bit, so numeric order, binary
//! counting order and lexicographic order over the bit sequence coincide.

use super::{Bit, RING_SIZE, STATE_COUNT};
use core::fmt;
use serde::{Deserialize, Serialize};

/// An 8-bit circlette state.
///
/// # Example
///
/// ```
/// use circlette::ring::{Bit, State};
///
/// let s = State::from_bits([0, 0, 1, 0, 1, 0, 0, 0]);
/// assert!(s.bit(Bit::C0));
/// assert!(s.bit(Bit::Lq));
/// assert!(!s.bit(Bit::I3));
/// assert_eq!(s.to_string(), "00101000");
/// assert_eq!(s.flip(Bit::I3).to_string(), "00101100");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct State(u8);

impl State {
    /// The all-zero state (generation 1 left-handed electron neutrino).
    pub const ZERO: Self = Self(0);

    /// Builds a state from its packed value.
    #[inline]
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Builds a state from eight bits in ring order. Any non-zero entry
    /// counts as set.
    #[must_use]
    pub const fn from_bits(bits: [u8; RING_SIZE]) -> Self {
        let mut value = 0u8;
        let mut i = 0;
        while i < RING_SIZE {
            if bits[i] != 0 {
                value |= Self::mask(i);
            }
            i += 1;
        }
        Self(value)
    }

    /// Packed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[inline]
    const fn mask(index: usize) -> u8 {
        1 << (RING_SIZE - 1 - index)
    }

    /// Value of a ring position.
    #[inline]
    #[must_use]
    pub const fn bit(self, bit: Bit) -> bool {
        self.get(bit.index())
    }

    /// Value of a ring index. Indices outside 0..8 read as unset.
    #[inline]
    #[must_use]
    pub const fn get(self, index: usize) -> bool {
        index < RING_SIZE && self.0 & Self::mask(index) != 0
    }

    /// The bit as 0 or 1.
    #[inline]
    #[must_use]
    pub const fn bit_u8(self, bit: Bit) -> u8 {
        self.bit(bit) as u8
    }

    /// Copy with one position set to `on`.
    #[inline]
    #[must_use]
    pub const fn with(self, bit: Bit, on: bool) -> Self {
        let m = Self::mask(bit.index());
        if on {
            Self(self.0 | m)
        } else {
            Self(self.0 & !m)
        }
    }

    /// Copy with one position flipped.
    #[inline]
    #[must_use]
    pub const fn flip(self, bit: Bit) -> Self {
        Self(self.0 ^ Self::mask(bit.index()))
    }

    /// Number of positions at which two states differ.
    #[inline]
    #[must_use]
    pub const fn hamming(self, other: Self) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// The bits in ring order.
    #[must_use]
    pub const fn bits(self) -> [u8; RING_SIZE] {
        let mut out = [0u8; RING_SIZE];
        let mut i = 0;
        while i < RING_SIZE {
            out[i] = self.get(i) as u8;
            i += 1;
        }
        out
    }

    /// The ring read in the opposite direction (W first, G0 last).
    #[inline]
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self(self.0.reverse_bits())
    }

    /// Generation bits `(G0, G1)`.
    #[inline]
    #[must_use]
    pub const fn generation_bits(self) -> (u8, u8) {
        (self.bit_u8(Bit::G0), self.bit_u8(Bit::G1))
    }

    /// Colour bits `(C0, C1)`.
    #[inline]
    #[must_use]
    pub const fn colour_bits(self) -> (u8, u8) {
        (self.bit_u8(Bit::C0), self.bit_u8(Bit::C1))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({:08b})", self.0)
    }
}

impl From<u8> for State {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<State> for u8 {
    fn from(state: State) -> Self {
        state.0
    }
}

/// Restartable iterator over all 256 states in binary counting order.
#[derive(Debug, Clone, Default)]
pub struct StateSpace {
    next: u16,
}

impl StateSpace {
    /// A fresh enumeration starting at `00000000`.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }
}

impl Iterator for StateSpace {
    type Item = State;

    fn next(&mut self) -> Option<State> {
        if (self.next as usize) < STATE_COUNT {
            let s = State(self.next as u8);
            self.next += 1;
            Some(s)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = STATE_COUNT - self.next as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StateSpace {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_zero_is_most_significant() {
        assert_eq!(State::ZERO.with(Bit::G0, true).value(), 0b1000_0000);
        assert_eq!(State::ZERO.with(Bit::W, true).value(), 0b0000_0001);
    }

    #[test]
    fn bits_roundtrip() {
        for s in StateSpace::new() {
            assert_eq!(State::from_bits(s.bits()), s);
        }
    }

    #[test]
    fn counting_order_is_lexicographic() {
        let states: Vec<State> = StateSpace::new().collect();
        assert_eq!(states.len(), STATE_COUNT);
        for pair in states.windows(2) {
            assert!(pair[0].bits() < pair[1].bits());
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn space_is_restartable() {
        let mut space = StateSpace::new();
        assert_eq!(space.len(), 256);
        let first: Vec<State> = space.by_ref().take(3).collect();
        assert_eq!(space.len(), 253);
        assert_eq!(first, StateSpace::new().take(3).collect::<Vec<_>>());
    }

    #[test]
    fn hamming_and_flip() {
        let s = State::from_bits([1, 0, 1, 1, 1, 0, 1, 1]);
        for bit in Bit::ALL {
            assert_eq!(s.hamming(s.flip(bit)), 1);
            assert_eq!(s.flip(bit).flip(bit), s);
        }
        assert_eq!(s.hamming(s), 0);
        assert_eq!(State::ZERO.hamming(State::new(0xFF)), 8);
    }

    #[test]
    fn reversal_mirrors_positions() {
        let s = State::from_bits([1, 1, 0, 0, 1, 0, 0, 0]);
        assert_eq!(s.reversed().bits(), [0, 0, 0, 1, 0, 0, 1, 1]);
        assert_eq!(s.reversed().reversed(), s);
    }
}
