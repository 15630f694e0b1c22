//! `CumulativeIndex` — a fixed-capacity Binary Indexed Tree (Fenwick Tree)
//! over non-negative `u64` weights.
//!
//! Besides point increments and prefix sums, the index answers the inverse
//! question: which position does a cumulative weight fall on. That lookup is
//! what weighted random selection and order-statistics queries are built on.
//!
//! Time Complexity:
//! - Build: O(n)
//! - Increment: O(log n)
//! - Prefix Sum: O(log n)
//! - Inversion: O(log n)
//!
//! Space Complexity: O(n)
//!
//! Cells are stored 0-based. The tree arithmetic (`+ lowbit`, `- lowbit`)
//! is done on the 1-based position `i + 1` and translated at the boundary.

use crate::bits::{is_power_of_two, is_valid_len, lowbit};
use crate::error::{FenwickError, Result};
use core::ops::Range;
use serde::{Deserialize, Serialize};

macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        tracing::$level!($($arg)+);
    };
}

/// Result of [`CumulativeIndex::find_by_cumulative`].
///
/// Ordered so that `BeforeFirst` sorts before every `At(_)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// The target is smaller than the first weight.
    BeforeFirst,
    /// The last position whose inclusive cumulative weight is `<= target`.
    At(usize),
}

impl Slot {
    /// The 0-based position, or `None` for [`Slot::BeforeFirst`].
    #[inline]
    pub const fn position(self) -> Option<usize> {
        match self {
            Self::BeforeFirst => None,
            Self::At(position) => Some(position),
        }
    }

    /// Number of positions up to and including this slot.
    ///
    /// `prefix_sum(slot.end())` is the inclusive cumulative weight of the slot.
    #[inline]
    pub const fn end(self) -> usize {
        match self {
            Self::BeforeFirst => 0,
            Self::At(position) => position + 1,
        }
    }

    /// Whether this is [`Slot::BeforeFirst`].
    #[inline]
    pub const fn is_before_first(self) -> bool {
        matches!(self, Self::BeforeFirst)
    }
}

/// A Fenwick tree of `u64` accumulators with a capacity fixed at build time.
///
/// For every 1-based position `i`, `cells[i - 1]` holds the sum of the
/// weights over `(i - lowbit(i), i]`. The grand total is tracked separately
/// so that no prefix sum can ever overflow, whatever the capacity.
///
/// The index serializes as its plain weight array and re-validates on
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct CumulativeIndex {
    cells: Box<[u64]>,
    total: u64,
}

impl CumulativeIndex {
    /// Builds an index over `weights` in O(n).
    ///
    /// # Panics
    /// Panics if `weights.len()` lies outside `MIN_LEN..=MAX_LEN` or if the
    /// weights do not sum within `u64`.
    #[track_caller]
    pub fn build(weights: &[u64]) -> Self {
        Self::try_build(weights).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Builds an index over `weights` in O(n).
    ///
    /// # Errors
    /// [`FenwickError::CapacityOutOfRange`] for a bad length and
    /// [`FenwickError::TotalOverflow`] if the weights do not sum within `u64`.
    pub fn try_build(weights: &[u64]) -> Result<Self> {
        if !is_valid_len(weights.len()) {
            return reject(FenwickError::CapacityOutOfRange { len: weights.len() });
        }
        Self::from_cells(weights.into())
    }

    /// Folds raw weights into accumulators in place.
    fn from_cells(mut cells: Box<[u64]>) -> Result<Self> {
        let n = cells.len();
        if !is_valid_len(n) {
            return reject(FenwickError::CapacityOutOfRange { len: n });
        }
        let Some(total) = cells.iter().try_fold(0u64, |acc, &w| acc.checked_add(w)) else {
            return reject(FenwickError::TotalOverflow);
        };

        // Children precede their parent, so cells[i - 1] is final when folded.
        for i in 1..=n {
            if let Some(parent) = parent(i, n) {
                cells[parent - 1] += cells[i - 1];
            }
        }

        trace_event!(debug, len = n, total, "built cumulative index");
        Ok(Self { cells, total })
    }

    /// Number of positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: an index holds at least `MIN_LEN` positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sum of all weights.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The raw accumulator cells, 0-based.
    #[inline]
    pub fn cells(&self) -> &[u64] {
        &self.cells
    }

    /// Adds `delta` to the weight at `position` (0-based).
    ///
    /// # Panics
    /// Panics if `position` is out of bounds or the total would overflow.
    #[track_caller]
    pub fn increment(&mut self, position: usize, delta: u64) {
        self.try_increment(position, delta)
            .unwrap_or_else(|err| panic!("{err}"));
    }

    /// Adds `delta` to the weight at `position` (0-based).
    ///
    /// Overflow is detected before any cell is touched, so a failed call
    /// leaves the index unchanged.
    ///
    /// # Errors
    /// [`FenwickError::PositionOutOfRange`] if `position >= len()` and
    /// [`FenwickError::Overflow`] if the total would exceed `u64::MAX`.
    pub fn try_increment(&mut self, position: usize, delta: u64) -> Result<()> {
        let n = self.len();
        if position >= n {
            return reject(FenwickError::PositionOutOfRange { position, len: n });
        }
        // Every cell is bounded by the total.
        let Some(total) = self.total.checked_add(delta) else {
            return reject(FenwickError::Overflow { position, delta });
        };
        self.total = total;

        let mut i = position;
        while i < n {
            self.cells[i] += delta;
            i += lowbit(i + 1);
        }
        Ok(())
    }

    /// Sum of the weights at positions `< end`.
    ///
    /// `end == 0` is the empty range and yields 0; `end == len()` yields the
    /// total.
    ///
    /// # Panics
    /// Panics if `end > len()`.
    #[track_caller]
    pub fn prefix_sum(&self, end: usize) -> u64 {
        self.try_prefix_sum(end).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Sum of the weights at positions `< end`.
    ///
    /// # Errors
    /// [`FenwickError::PositionOutOfRange`] if `end > len()`.
    pub fn try_prefix_sum(&self, end: usize) -> Result<u64> {
        let n = self.len();
        if end > n {
            return reject(FenwickError::PositionOutOfRange { position: end, len: n });
        }
        Ok(self.walk(end))
    }

    fn walk(&self, end: usize) -> u64 {
        let n = self.len();
        let Some(mut i) = end.checked_sub(1) else {
            return 0;
        };
        let mut sum = 0;
        loop {
            // An ancestor can be inside the tree when the child is not.
            if i < n {
                sum += self.cells[i];
            }
            match i.checked_sub(lowbit(i + 1)) {
                Some(next) => i = next,
                None => return sum,
            }
        }
    }

    /// Sum of the weights over `range` (`start` inclusive, `end` exclusive).
    ///
    /// # Panics
    /// Panics if `range.start > range.end` or `range.end > len()`.
    #[track_caller]
    pub fn range_sum(&self, range: Range<usize>) -> u64 {
        self.try_range_sum(range).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Sum of the weights over `range` (`start` inclusive, `end` exclusive).
    ///
    /// # Errors
    /// [`FenwickError::InvalidRange`] if `range.start > range.end` or
    /// `range.end > len()`.
    pub fn try_range_sum(&self, range: Range<usize>) -> Result<u64> {
        let n = self.len();
        if range.start > range.end || range.end > n {
            return reject(FenwickError::InvalidRange {
                start: range.start,
                end: range.end,
                len: n,
            });
        }
        if range.is_empty() {
            return Ok(0);
        }
        Ok(self.walk(range.end) - self.walk(range.start))
    }

    /// Inclusive cumulative weight through `slot`; 0 for [`Slot::BeforeFirst`].
    ///
    /// # Panics
    /// Panics if the slot lies beyond the last position.
    #[track_caller]
    pub fn cumulative_through(&self, slot: Slot) -> u64 {
        self.prefix_sum(slot.end())
    }

    /// The current weight at `position`.
    ///
    /// # Panics
    /// Panics if `position >= len()`.
    #[track_caller]
    pub fn weight(&self, position: usize) -> u64 {
        let n = self.len();
        assert!(
            position < n,
            "{}",
            FenwickError::PositionOutOfRange { position, len: n }
        );
        self.walk(position + 1) - self.walk(position)
    }

    /// Recovers the current weights in O(n) by undoing the build fold.
    pub fn to_weights(&self) -> Vec<u64> {
        let mut weights = self.cells.to_vec();
        let n = weights.len();
        for i in (1..=n).rev() {
            if let Some(parent) = parent(i, n) {
                weights[parent - 1] -= weights[i - 1];
            }
        }
        weights
    }

    /// Finds the position a cumulative weight falls on.
    ///
    /// Returns the last position `p` with `prefix_sum(p + 1) <= target`, or
    /// [`Slot::BeforeFirst`] when `target` is smaller than the first weight.
    /// Any `target` at or beyond the total maps to the last position.
    ///
    /// # Panics
    /// Panics if `len()` is not a power of two.
    #[track_caller]
    pub fn find_by_cumulative(&self, target: u64) -> Slot {
        self.try_find_by_cumulative(target)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Finds the position a cumulative weight falls on.
    ///
    /// Binary lifting over the implicit tree: each round tries to extend the
    /// committed prefix by the next lower power of two, so the descent takes
    /// `log2(len())` steps and never recomputes a prefix sum.
    ///
    /// # Errors
    /// [`FenwickError::NotPowerOfTwo`] unless `len()` is a power of two.
    pub fn try_find_by_cumulative(&self, target: u64) -> Result<Slot> {
        let n = self.len();
        if !is_power_of_two(n) {
            return reject(FenwickError::NotPowerOfTwo { len: n });
        }
        if target >= self.cells[n - 1] {
            return Ok(Slot::At(n - 1));
        }

        let mut value = target;
        let mut i = 0;
        let mut mask = n >> 1;
        while mask != 0 {
            let t = i + mask;
            if t <= n && value >= self.cells[t - 1] {
                i = t;
                value -= self.cells[t - 1];
            }
            mask >>= 1;
        }

        Ok(match i {
            0 => Slot::BeforeFirst,
            committed => Slot::At(committed - 1),
        })
    }
}

/// 1-based parent of `i`, if it lies within `n`.
#[inline]
fn parent(i: usize, n: usize) -> Option<usize> {
    i.checked_add(lowbit(i)).filter(|&parent| parent <= n)
}

#[cold]
fn reject<T>(err: FenwickError) -> Result<T> {
    trace_event!(warn, error = %err, kind = ?err.kind(), "rejected index operation");
    Err(err)
}

impl TryFrom<&[u64]> for CumulativeIndex {
    type Error = FenwickError;

    fn try_from(weights: &[u64]) -> Result<Self> {
        Self::try_build(weights)
    }
}

impl TryFrom<Vec<u64>> for CumulativeIndex {
    type Error = FenwickError;

    fn try_from(weights: Vec<u64>) -> Result<Self> {
        Self::from_cells(weights.into_boxed_slice())
    }
}

impl From<CumulativeIndex> for Vec<u64> {
    fn from(index: CumulativeIndex) -> Self {
        index.to_weights()
    }
}
