//! Bit helpers shared by the index traversals.
//!
//! The implicit tree topology of a Fenwick tree is derived entirely from the
//! binary representation of 1-based positions: a node at `i` covers the
//! `lowbit(i)` weights ending at `i`, its parent is `i + lowbit(i)` and the
//! next node of a prefix walk is `i - lowbit(i)`.

/// Largest supported exponent: capacities are bounded by `2^MAX_BITS`.
pub const MAX_BITS: u32 = 31;

/// Smallest supported capacity.
pub const MIN_LEN: usize = 2;

/// Largest supported capacity.
pub const MAX_LEN: usize = 1 << MAX_BITS;

/// Lowest set bit of `i` (i.e., `i & -i`).
///
/// `i` must be non-zero; a zero step would never advance a traversal.
#[inline]
pub const fn lowbit(i: usize) -> usize {
    debug_assert!(i != 0, "lowbit(0) has no set bit");
    i & i.wrapping_neg()
}

/// Whether `len` lies within `MIN_LEN..=MAX_LEN`.
#[inline]
pub const fn is_valid_len(len: usize) -> bool {
    len >= MIN_LEN && len <= MAX_LEN
}

/// Whether `n` is an exact power of two.
#[inline]
pub const fn is_power_of_two(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowbit_isolates_least_significant_bit() {
        assert_eq!(lowbit(1), 1);
        assert_eq!(lowbit(6), 2);
        assert_eq!(lowbit(12), 4);
        assert_eq!(lowbit(64), 64);
        assert_eq!(lowbit(0b1011_0000), 0b1_0000);
        assert_eq!(lowbit(MAX_LEN), MAX_LEN);
    }

    #[test]
    fn len_bounds() {
        assert!(!is_valid_len(0));
        assert!(!is_valid_len(1));
        assert!(is_valid_len(2));
        assert!(is_valid_len(MAX_LEN));
        assert!(!is_valid_len(MAX_LEN + 1));
    }

    #[test]
    fn power_of_two() {
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(2));
        assert!(is_power_of_two(1024));
        assert!(!is_power_of_two(0));
        assert!(!is_power_of_two(3));
        assert!(!is_power_of_two(1023));
    }
}
