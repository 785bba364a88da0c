//! The 8-position circlette ring.
//!
//! ```text
//! Index:   0   1   2   3   4   5   6   7
//! Bit:    G0  G1  C0  C1  LQ  I3  χ   W
//! Sector: [generation] [colour] [bridge] [electroweak]
//! ```
//!
//! Position 7 (W) is adjacent to position 0 (G0), closing the ring. Every
//! validity rule spans a window of at most three positions.

pub mod set;
pub mod state;

pub use set::{StateSet, StateSetIter};
pub use state::{State, StateSpace};

use core::fmt;
use serde::{Deserialize, Serialize};

/// Number of positions on the ring.
pub const RING_SIZE: usize = 8;

/// Number of distinct ring states (2^8).
pub const STATE_COUNT: usize = 1 << RING_SIZE;

/// A named position on the ring.
///
/// # Example
///
/// ```
/// use circlette::ring::{Bit, Sector};
///
/// assert_eq!(Bit::Lq.index(), 4);
/// assert_eq!(Bit::from_index(5), Some(Bit::I3));
/// assert_eq!(Bit::I3.sector(), Sector::Electroweak);
/// assert_eq!(Bit::W.distance(Bit::G0), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Bit {
    /// Low generation bit.
    G0 = 0,
    /// High generation bit.
    G1 = 1,
    /// Low colour bit.
    C0 = 2,
    /// High colour bit.
    C1 = 3,
    /// Bridge bit: 0 for leptons, 1 for quarks.
    Lq = 4,
    /// Weak isospin bit.
    I3 = 5,
    /// Chirality bit: 0 left-handed, 1 right-handed.
    Chi = 6,
    /// Boundary bit, tied to chirality by R2.
    W = 7,
}

impl Bit {
    /// All positions in ring order.
    pub const ALL: [Self; RING_SIZE] = [
        Self::G0,
        Self::G1,
        Self::C0,
        Self::C1,
        Self::Lq,
        Self::I3,
        Self::Chi,
        Self::W,
    ];

    /// Ring index (0..8).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Position at a ring index, or `None` outside 0..8.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < RING_SIZE {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Short label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::G0 => "G0",
            Self::G1 => "G1",
            Self::C0 => "C0",
            Self::C1 => "C1",
            Self::Lq => "LQ",
            Self::I3 => "I3",
            Self::Chi => "χ",
            Self::W => "W",
        }
    }

    /// The sector this position belongs to.
    #[must_use]
    pub const fn sector(self) -> Sector {
        match self {
            Self::G0 | Self::G1 => Sector::Generation,
            Self::C0 | Self::C1 => Sector::Colour,
            Self::Lq => Sector::Bridge,
            Self::I3 | Self::Chi | Self::W => Sector::Electroweak,
        }
    }

    /// Shortest hop count between two positions around the ring.
    #[must_use]
    pub const fn distance(self, other: Self) -> usize {
        let forward = (other.index() + RING_SIZE - self.index()) % RING_SIZE;
        let backward = RING_SIZE - forward;
        if forward <= backward {
            forward
        } else {
            backward
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four sectors of the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    /// G0, G1.
    Generation,
    /// C0, C1.
    Colour,
    /// LQ.
    Bridge,
    /// I3, χ, W.
    Electroweak,
}

impl Sector {
    /// All sectors in ring order.
    pub const ALL: [Self; 4] = [
        Self::Generation,
        Self::Colour,
        Self::Bridge,
        Self::Electroweak,
    ];

    /// Positions belonging to this sector.
    #[must_use]
    pub const fn bits(self) -> &'static [Bit] {
        match self {
            Self::Generation => &[Bit::G0, Bit::G1],
            Self::Colour => &[Bit::C0, Bit::C1],
            Self::Bridge => &[Bit::Lq],
            Self::Electroweak => &[Bit::I3, Bit::Chi, Bit::W],
        }
    }

    /// Lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Generation => "generation",
            Self::Colour => "colour",
            Self::Bridge => "bridge",
            Self::Electroweak => "electroweak",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        for (i, bit) in Bit::ALL.iter().enumerate() {
            assert_eq!(bit.index(), i);
            assert_eq!(Bit::from_index(i), Some(*bit));
        }
        assert_eq!(Bit::from_index(8), None);
    }

    #[test]
    fn sectors_cover_ring_once() {
        let mut seen = [0u8; RING_SIZE];
        for sector in Sector::ALL {
            for bit in sector.bits() {
                assert_eq!(bit.sector(), sector);
                seen[bit.index()] += 1;
            }
        }
        assert_eq!(seen, [1; RING_SIZE]);
    }

    #[test]
    fn ring_distance() {
        assert_eq!(Bit::G0.distance(Bit::G0), 0);
        assert_eq!(Bit::G0.distance(Bit::W), 1);
        // G0 reaches I3 via W, χ (3 hops); G1 is 4 hops either way.
        assert_eq!(Bit::G0.distance(Bit::I3), 3);
        assert_eq!(Bit::G1.distance(Bit::I3), 4);
        for a in Bit::ALL {
            for b in Bit::ALL {
                assert_eq!(a.distance(b), b.distance(a));
                assert!(a.distance(b) <= RING_SIZE / 2);
            }
        }
    }
}
