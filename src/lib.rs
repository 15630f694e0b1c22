//! # `fenwick-index` - Cumulative Frequency Index
//!
//! A fixed-capacity Fenwick tree (binary indexed tree) over non-negative
//! `u64` weights. It answers three questions in O(log n):
//!
//! - **Increment**: add to the weight at one position.
//! - **Prefix sum**: total weight of the positions before a given one.
//! - **Inversion**: which position a cumulative weight falls on, the
//!   primitive behind weighted random selection.
//!
//! ## Layout
//!
//! The tree is a flat, 0-based array of `n` accumulators. Position `i`
//! (1-based) holds the sum of the weights over `(i - lowbit(i), i]`; the
//! parent/child relationships are implied by the bit patterns and never
//! stored. There are no nodes, no pointers and no recursion.
//!
//! ## Contracts
//!
//! - Capacities range over `2..=2^31`; inversion additionally needs a
//!   power-of-two capacity, since the descent halves a mask that starts at
//!   `n / 2`.
//! - Every operation comes in two forms: `try_*` returns a [`FenwickError`],
//!   the plain form panics with the same message. Contract checks are never
//!   compiled out.
//! - Accumulation is checked: an increment that would overflow the total is
//!   rejected before any cell changes.
//!
//! ## Concurrency
//!
//! The index holds no locks. Mutation takes `&mut self`; to share an index
//! across threads wrap it in a lock (e.g. `std::sync::RwLock`) covering the
//! whole structure, since one increment touches O(log n) cells that any
//! query may read.
//!
//! ## Example
//!
//! ```rust
//! use fenwick_index::{CumulativeIndex, Slot};
//!
//! let mut index = CumulativeIndex::build(&[1, 2, 3, 4]);
//! assert_eq!(index.prefix_sum(3), 6);
//! assert_eq!(index.find_by_cumulative(0), Slot::BeforeFirst);
//! assert_eq!(index.find_by_cumulative(4), Slot::At(1));
//!
//! index.increment(2, 5);
//! assert_eq!(index.prefix_sum(3), 11);
//! assert_eq!(index.total(), 15);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod bits;
pub mod error;
pub mod index;
pub mod verify;

pub use bits::{MAX_BITS, MAX_LEN, MIN_LEN};
pub use error::{ErrorKind, FenwickError, Result};
pub use index::{CumulativeIndex, Slot};
