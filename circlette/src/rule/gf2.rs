//! 8×8 matrices over GF(2).
//!
//! Each row is a `u8` whose bits select the input positions XORed into
//! that output position. Column `j` lives at bit `7 − j`, matching the
//! [`State`] layout, so applying a matrix is one AND and one parity per
//! row.
//!
//! # Encoding
//!
//! ```text
//! row 5 = 0b0000_1100  → out[I3] = in[LQ] ⊕ in[I3]
//! ```
//!
//! # Example
//!
//! ```
//! use circlette::rule::gf2::Gf2Matrix;
//! use circlette::ring::State;
//!
//! let m = Gf2Matrix::coupling(4, 5);
//! assert!(m.is_invertible());
//! assert_eq!(m.order(300), Some(2));
//!
//! let quark_nu = State::from_bits([0, 0, 1, 0, 1, 0, 0, 0]);
//! assert_eq!(m.apply(quark_nu).to_string(), "00101100");
//! ```

use crate::ring::{State, RING_SIZE};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Square GF(2) matrix acting on ring states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gf2Matrix {
    rows: [u8; RING_SIZE],
}

#[inline]
const fn column(j: usize) -> u8 {
    1 << (RING_SIZE - 1 - j)
}

impl Gf2Matrix {
    /// The identity.
    pub const IDENTITY: Self = Self::identity();

    /// The zero matrix.
    pub const ZERO: Self = Self {
        rows: [0; RING_SIZE],
    };

    /// The identity matrix.
    #[must_use]
    pub const fn identity() -> Self {
        let mut rows = [0u8; RING_SIZE];
        let mut i = 0;
        while i < RING_SIZE {
            rows[i] = column(i);
            i += 1;
        }
        Self { rows }
    }

    /// Builds a matrix from raw rows.
    #[must_use]
    pub const fn from_rows(rows: [u8; RING_SIZE]) -> Self {
        Self { rows }
    }

    /// Raw rows.
    #[must_use]
    pub const fn rows(&self) -> [u8; RING_SIZE] {
        self.rows
    }

    /// Identity with entry `(target, source)` toggled: `target ⊕= source`.
    ///
    /// When `source == target` the toggle clears the diagonal entry and the
    /// result is singular. Indices must be below 8.
    #[must_use]
    pub const fn coupling(source: usize, target: usize) -> Self {
        let mut m = Self::identity();
        m.rows[target] ^= column(source);
        m
    }

    /// Entry at `(row, col)`.
    #[inline]
    #[must_use]
    pub const fn get(&self, row: usize, col: usize) -> bool {
        self.rows[row] & column(col) != 0
    }

    /// Matrix–vector product over GF(2).
    #[inline]
    #[must_use]
    pub const fn apply(&self, state: State) -> State {
        let s = state.value();
        let mut out = 0u8;
        let mut i = 0;
        while i < RING_SIZE {
            if (self.rows[i] & s).count_ones() & 1 == 1 {
                out |= column(i);
            }
            i += 1;
        }
        State::new(out)
    }

    /// Matrix product `self · rhs`.
    #[must_use]
    pub const fn mul(&self, rhs: &Self) -> Self {
        // Row i of the product is the XOR of rhs rows selected by row i.
        let mut rows = [0u8; RING_SIZE];
        let mut i = 0;
        while i < RING_SIZE {
            let mut acc = 0u8;
            let mut k = 0;
            while k < RING_SIZE {
                if self.rows[i] & column(k) != 0 {
                    acc ^= rhs.rows[k];
                }
                k += 1;
            }
            rows[i] = acc;
            i += 1;
        }
        Self { rows }
    }

    /// `self^exp` by repeated squaring.
    #[must_use]
    pub const fn pow(&self, mut exp: u32) -> Self {
        let mut base = *self;
        let mut acc = Self::identity();
        while exp > 0 {
            if exp & 1 == 1 {
                acc = acc.mul(&base);
            }
            base = base.mul(&base);
            exp >>= 1;
        }
        acc
    }

    /// True for the identity matrix.
    #[inline]
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        let id = Self::identity();
        let mut i = 0;
        while i < RING_SIZE {
            if self.rows[i] != id.rows[i] {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Rank by Gaussian elimination with row-swap pivoting.
    #[must_use]
    pub const fn rank(&self) -> usize {
        let mut rows = self.rows;
        let mut rank = 0;
        let mut col = 0;
        while col < RING_SIZE && rank < RING_SIZE {
            let mask = column(col);
            let mut pivot = rank;
            while pivot < RING_SIZE && rows[pivot] & mask == 0 {
                pivot += 1;
            }
            if pivot < RING_SIZE {
                let tmp = rows[rank];
                rows[rank] = rows[pivot];
                rows[pivot] = tmp;
                let mut r = 0;
                while r < RING_SIZE {
                    if r != rank && rows[r] & mask != 0 {
                        rows[r] ^= rows[rank];
                    }
                    r += 1;
                }
                rank += 1;
            }
            col += 1;
        }
        rank
    }

    /// Full rank over GF(2).
    #[inline]
    #[must_use]
    pub const fn is_invertible(&self) -> bool {
        self.rank() == RING_SIZE
    }

    /// Smallest `k` in `1..=cap` with `self^k = I`.
    ///
    /// Singular matrices never reach the identity and return `None`.
    #[must_use]
    pub const fn order(&self, cap: u32) -> Option<u32> {
        let mut power = *self;
        let mut k = 1;
        while k <= cap {
            if power.is_identity() {
                return Some(k);
            }
            power = power.mul(self);
            k += 1;
        }
        None
    }

    /// Number of entries set.
    #[must_use]
    pub const fn weight(&self) -> u32 {
        let mut w = 0;
        let mut i = 0;
        while i < RING_SIZE {
            w += self.rows[i].count_ones();
            i += 1;
        }
        w
    }
}

impl Default for Gf2Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Gf2Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{row:08b}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::StateSpace;

    #[test]
    fn identity_fixes_everything() {
        let id = Gf2Matrix::identity();
        for s in StateSpace::new() {
            assert_eq!(id.apply(s), s);
        }
        assert_eq!(id.order(300), Some(1));
        assert_eq!(id.rank(), 8);
    }

    #[test]
    fn coupling_has_one_off_diagonal_entry() {
        for source in 0..8 {
            for target in 0..8 {
                let m = Gf2Matrix::coupling(source, target);
                if source == target {
                    assert_eq!(m.weight(), 7);
                    assert!(!m.is_invertible());
                    assert_eq!(m.order(300), None);
                } else {
                    assert_eq!(m.weight(), 9);
                    assert!(m.get(target, source));
                    assert!(m.is_invertible());
                    assert_eq!(m.order(300), Some(2));
                }
            }
        }
    }

    #[test]
    fn apply_matches_xor() {
        let m = Gf2Matrix::coupling(4, 5);
        for s in StateSpace::new() {
            let lq = s.get(4);
            let expected = if lq { s.value() ^ 0b0000_0100 } else { s.value() };
            assert_eq!(m.apply(s).value(), expected);
        }
    }

    #[test]
    fn product_is_composition() {
        let a = Gf2Matrix::coupling(0, 3);
        let b = Gf2Matrix::coupling(3, 6);
        let ab = a.mul(&b);
        for s in StateSpace::new() {
            assert_eq!(ab.apply(s), a.apply(b.apply(s)));
        }
    }

    #[test]
    fn pow_agrees_with_repeated_mul() {
        let m = Gf2Matrix::coupling(1, 2).mul(&Gf2Matrix::coupling(2, 3));
        let mut acc = Gf2Matrix::identity();
        for k in 0..6 {
            assert_eq!(m.pow(k), acc);
            acc = acc.mul(&m);
        }
    }

    #[test]
    fn rank_of_singular_rows() {
        assert_eq!(Gf2Matrix::ZERO.rank(), 0);
        let mut rows = Gf2Matrix::identity().rows();
        rows[7] = rows[0] ^ rows[1];
        assert_eq!(Gf2Matrix::from_rows(rows).rank(), 7);
    }

    #[test]
    fn order_cap_is_inclusive() {
        // A cyclic shift has order 8.
        let mut rows = [0u8; RING_SIZE];
        for (i, row) in rows.iter_mut().enumerate() {
            *row = column((i + 1) % RING_SIZE);
        }
        let shift = Gf2Matrix::from_rows(rows);
        assert_eq!(shift.order(8), Some(8));
        assert_eq!(shift.order(7), None);
    }
}
