//! 256-bit membership sets over ring states.

use super::State;
use serde::{Deserialize, Serialize};

/// A set of ring states stored as four 64-bit words.
///
/// Iteration yields members in ascending (binary counting) order.
///
/// # Example
///
/// ```
/// use circlette::ring::{State, StateSet};
///
/// let set = StateSet::EMPTY
///     .insert(State::new(3))
///     .insert(State::new(200));
/// assert_eq!(set.len(), 2);
/// assert!(set.contains(State::new(200)));
/// assert_eq!(set.iter().map(State::value).collect::<Vec<_>>(), vec![3, 200]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StateSet([u64; 4]);

impl StateSet {
    /// Empty set.
    pub const EMPTY: Self = Self([0; 4]);

    /// All 256 states.
    pub const FULL: Self = Self([u64::MAX; 4]);

    #[inline]
    const fn slot(state: State) -> (usize, u32) {
        let v = state.value();
        ((v >> 6) as usize, (v & 63) as u32)
    }

    /// Copy with `state` added.
    #[inline]
    #[must_use]
    pub const fn insert(mut self, state: State) -> Self {
        let (word, bit) = Self::slot(state);
        self.0[word] |= 1u64 << bit;
        self
    }

    /// Copy with `state` removed.
    #[inline]
    #[must_use]
    pub const fn remove(mut self, state: State) -> Self {
        let (word, bit) = Self::slot(state);
        self.0[word] &= !(1u64 << bit);
        self
    }

    /// Membership test.
    #[inline]
    #[must_use]
    pub const fn contains(&self, state: State) -> bool {
        let (word, bit) = Self::slot(state);
        (self.0[word] >> bit) & 1 == 1
    }

    /// Number of members.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        (self.0[0].count_ones()
            + self.0[1].count_ones()
            + self.0[2].count_ones()
            + self.0[3].count_ones()) as usize
    }

    /// True when no state is a member.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0[0] == 0 && self.0[1] == 0 && self.0[2] == 0 && self.0[3] == 0
    }

    /// Members of both sets.
    #[inline]
    #[must_use]
    pub const fn intersection(&self, other: &Self) -> Self {
        Self([
            self.0[0] & other.0[0],
            self.0[1] & other.0[1],
            self.0[2] & other.0[2],
            self.0[3] & other.0[3],
        ])
    }

    /// Members of either set.
    #[inline]
    #[must_use]
    pub const fn union(&self, other: &Self) -> Self {
        Self([
            self.0[0] | other.0[0],
            self.0[1] | other.0[1],
            self.0[2] | other.0[2],
            self.0[3] | other.0[3],
        ])
    }

    /// Members of `self` not in `other`.
    #[inline]
    #[must_use]
    pub const fn difference(&self, other: &Self) -> Self {
        Self([
            self.0[0] & !other.0[0],
            self.0[1] & !other.0[1],
            self.0[2] & !other.0[2],
            self.0[3] & !other.0[3],
        ])
    }

    /// True if every member of `self` is in `other`.
    #[inline]
    #[must_use]
    pub const fn is_subset(&self, other: &Self) -> bool {
        self.difference(other).is_empty()
    }

    /// Ascending iterator over members.
    #[must_use]
    pub const fn iter(&self) -> StateSetIter {
        StateSetIter {
            words: self.0,
            word_idx: 0,
        }
    }
}

impl FromIterator<State> for StateSet {
    fn from_iter<I: IntoIterator<Item = State>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::insert)
    }
}

impl IntoIterator for StateSet {
    type Item = State;
    type IntoIter = StateSetIter;

    fn into_iter(self) -> StateSetIter {
        self.iter()
    }
}

impl IntoIterator for &StateSet {
    type Item = State;
    type IntoIter = StateSetIter;

    fn into_iter(self) -> StateSetIter {
        self.iter()
    }
}

/// Iterator over the members of a [`StateSet`].
#[derive(Debug, Clone)]
pub struct StateSetIter {
    words: [u64; 4],
    word_idx: usize,
}

impl Iterator for StateSetIter {
    type Item = State;

    fn next(&mut self) -> Option<State> {
        while self.word_idx < 4 {
            let w = self.words[self.word_idx];
            if w != 0 {
                let bit = w.trailing_zeros();
                self.words[self.word_idx] &= !(1u64 << bit);
                return Some(State::new((self.word_idx as u32 * 64 + bit) as u8));
            }
            self.word_idx += 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining: u32 = self.words[self.word_idx.min(4)..]
            .iter()
            .map(|w| w.count_ones())
            .sum();
        (remaining as usize, Some(remaining as usize))
    }
}

impl ExactSizeIterator for StateSetIter {}
