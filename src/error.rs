//! Contract violations reported by [`CumulativeIndex`](crate::CumulativeIndex).

use core::fmt;

/// Broad category of a [`FenwickError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A capacity or index argument lies outside the legal domain.
    Range,
    /// A structural prerequisite of the operation is unmet.
    Precondition,
    /// An accumulation would exceed the range of `u64`.
    Overflow,
}

/// The error type for index operations.
///
/// Every variant is a programmer error: none of them is transient and
/// none is ever retried. Operations that fail leave the index unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenwickError {
    /// The requested capacity lies outside `MIN_LEN..=MAX_LEN`.
    CapacityOutOfRange {
        /// Requested capacity.
        len: usize,
    },
    /// A position is not smaller than the capacity (or, for prefix
    /// queries, larger than it).
    PositionOutOfRange {
        /// Offending position.
        position: usize,
        /// Capacity of the index.
        len: usize,
    },
    /// A range query with `start > end` or `end > len`.
    InvalidRange {
        /// Inclusive start of the range.
        start: usize,
        /// Exclusive end of the range.
        end: usize,
        /// Capacity of the index.
        len: usize,
    },
    /// Inversion requires a power-of-two capacity.
    NotPowerOfTwo {
        /// Capacity of the index.
        len: usize,
    },
    /// Adding `delta` at `position` would overflow the total weight.
    Overflow {
        /// Position being incremented.
        position: usize,
        /// Requested increment.
        delta: u64,
    },
    /// The weights passed to a build do not sum within `u64`.
    TotalOverflow,
}

impl FenwickError {
    /// Category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CapacityOutOfRange { .. }
            | Self::PositionOutOfRange { .. }
            | Self::InvalidRange { .. } => ErrorKind::Range,
            Self::NotPowerOfTwo { .. } => ErrorKind::Precondition,
            Self::Overflow { .. } | Self::TotalOverflow => ErrorKind::Overflow,
        }
    }
}

impl fmt::Display for FenwickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::CapacityOutOfRange { len } => write!(
                f,
                "capacity {len} out of range ({}..={})",
                crate::bits::MIN_LEN,
                crate::bits::MAX_LEN
            ),
            Self::PositionOutOfRange { position, len } => {
                write!(f, "position {position} out of bounds for length {len}")
            }
            Self::InvalidRange { start, end, len } => {
                write!(f, "range {start}..{end} invalid for length {len}")
            }
            Self::NotPowerOfTwo { len } => {
                write!(f, "length {len} is not a power of two")
            }
            Self::Overflow { position, delta } => {
                write!(f, "adding {delta} at position {position} overflows u64")
            }
            Self::TotalOverflow => f.write_str("total weight overflows u64"),
        }
    }
}

impl std::error::Error for FenwickError {}

/// Convenience alias for index results.
pub type Result<T> = core::result::Result<T, FenwickError>;
