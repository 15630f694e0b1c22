//! Brute-force verification harness.
//!
//! The harness drives a [`CumulativeIndex`] through its public operations and
//! cross-checks every answer against an [`Oracle`] computed by plain linear
//! summation over the weights. Exhaustive inversion checks walk every target
//! in `0..=total`, so the cost grows quadratically with the tree size; sizes
//! are therefore capped at `2^MAX_TEST_BITS`.

use crate::error::FenwickError;
use crate::index::{CumulativeIndex, Slot};
use core::fmt;
use core::ops::Range;
use std::io::{self, Write};

/// Default largest exponent checked by [`Harness`].
pub const DEFAULT_MAX_BITS: u32 = 10;

/// Hard cap on [`Harness::max_bits`].
pub const MAX_TEST_BITS: u32 = 12;

/// Running sums computed independently of the tree.
#[derive(Debug, Clone)]
pub struct Oracle {
    /// `sums[i]` is the sum of weights at positions `< i`.
    sums: Vec<u64>,
}

impl Oracle {
    /// Computes the running sums of `weights`, or `None` if they do not sum
    /// within `u64`.
    pub fn new(weights: &[u64]) -> Option<Self> {
        let mut sums = Vec::with_capacity(weights.len() + 1);
        let mut acc = 0u64;
        sums.push(acc);
        for &w in weights {
            acc = acc.checked_add(w)?;
            sums.push(acc);
        }
        Some(Self { sums })
    }

    /// Sum of the weights at positions `< end`.
    pub fn prefix_sum(&self, end: usize) -> u64 {
        self.sums[end]
    }

    /// Sum of the weights over `range`.
    pub fn range_sum(&self, range: Range<usize>) -> u64 {
        self.sums[range.end] - self.sums[range.start]
    }

    /// Sum of all weights.
    pub fn total(&self) -> u64 {
        self.sums[self.sums.len() - 1]
    }
}

/// Which property a [`Mismatch`] violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// `prefix_sum(end)` disagreed with the oracle.
    PrefixSum,
    /// `range_sum(start..end)` disagreed with the oracle.
    RangeSum,
    /// The returned slot does not bracket the target.
    Bracket,
    /// `BeforeFirst` was returned (or withheld) incorrectly.
    Sentinel,
    /// A target at or beyond the total did not map to the last position.
    Saturation,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PrefixSum => "prefix sum",
            Self::RangeSum => "range sum",
            Self::Bracket => "bracketing",
            Self::Sentinel => "before-first sentinel",
            Self::Saturation => "saturation",
        })
    }
}

/// A disagreement between the index and the oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Violated property.
    pub check: Check,
    /// Size of the index under test.
    pub len: usize,
    /// Position, range or target that exposed the mismatch.
    pub argument: String,
    /// What the oracle expected versus what the index returned.
    pub detail: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mismatch for n={} at {}: {}",
            self.check, self.len, self.argument, self.detail
        )
    }
}

impl std::error::Error for Mismatch {}

/// Anything that stops a harness run.
#[derive(Debug)]
pub enum HarnessError {
    /// The index rejected an operation the harness considers valid.
    Index(FenwickError),
    /// The index disagreed with the oracle.
    Mismatch(Mismatch),
    /// Writing diagnostics failed.
    Io(io::Error),
    /// `max_bits` lies outside `1..=MAX_TEST_BITS`.
    MaxBits(u32),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(err) => write!(f, "index error: {err}"),
            Self::Mismatch(mismatch) => mismatch.fmt(f),
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::MaxBits(bits) => {
                write!(f, "max bits {bits} out of range (1..={MAX_TEST_BITS})")
            }
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Index(err) => Some(err),
            Self::Mismatch(mismatch) => Some(mismatch),
            Self::Io(err) => Some(err),
            Self::MaxBits(_) => None,
        }
    }
}

impl From<FenwickError> for HarnessError {
    fn from(err: FenwickError) -> Self {
        Self::Index(err)
    }
}

impl From<Mismatch> for HarnessError {
    fn from(mismatch: Mismatch) -> Self {
        Self::Mismatch(mismatch)
    }
}

impl From<io::Error> for HarnessError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// What a single [`check`] covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Report {
    /// Size of the index.
    pub len: usize,
    /// Total weight.
    pub total: u64,
    /// Prefix queries compared.
    pub prefix_queries: usize,
    /// Range queries compared.
    pub range_queries: usize,
    /// Inversion targets compared (0 unless the size is a power of two).
    pub lookups: u64,
}

fn ensure(
    ok: bool,
    check: Check,
    len: usize,
    argument: impl fmt::Display,
    detail: impl FnOnce() -> String,
) -> Result<(), Mismatch> {
    if ok {
        Ok(())
    } else {
        Err(Mismatch {
            check,
            len,
            argument: argument.to_string(),
            detail: detail(),
        })
    }
}

/// Builds an index over `weights` and checks it exhaustively.
///
/// Prefix and range queries are checked for every position and every
/// range. For power-of-two sizes every target in `0..=total` is inverted as
/// well, so callers should keep the total small.
///
/// # Errors
/// The first [`Mismatch`], an index error, or a failed diagnostic write.
pub fn check<W: Write>(
    weights: &[u64],
    verbose: bool,
    out: &mut W,
) -> Result<Report, HarnessError> {
    let index = CumulativeIndex::try_build(weights)?;
    let oracle = Oracle::new(weights).ok_or(FenwickError::TotalOverflow)?;
    let n = index.len();
    let total = index.total();
    let mut report = Report {
        len: n,
        total,
        ..Report::default()
    };

    ensure(total == oracle.total(), Check::PrefixSum, n, "total", || {
        format!("expected {}, got {total}", oracle.total())
    })?;

    for end in 0..=n {
        let expected = oracle.prefix_sum(end);
        let actual = index.try_prefix_sum(end)?;
        if verbose {
            writeln!(out, "sum_of[0,{end:2}): {expected:3}")?;
        }
        ensure(actual == expected, Check::PrefixSum, n, end, || {
            format!("expected {expected}, got {actual}")
        })?;
        report.prefix_queries += 1;
    }

    for start in 0..n {
        for end in start + 1..=n {
            let expected = oracle.range_sum(start..end);
            let actual = index.try_range_sum(start..end)?;
            if actual != expected {
                return Err(Mismatch {
                    check: Check::RangeSum,
                    len: n,
                    argument: format!("{start}..{end}"),
                    detail: format!("expected {expected}, got {actual}"),
                }
                .into());
            }
            report.range_queries += 1;
        }
    }

    if n.is_power_of_two() {
        for target in 0..=total {
            check_lookup(&index, &oracle, weights[0], target, verbose, out)?;
            report.lookups += 1;
        }
        for target in [total.saturating_add(1), u64::MAX] {
            let slot = index.try_find_by_cumulative(target)?;
            ensure(slot == Slot::At(n - 1), Check::Saturation, n, target, || {
                format!("expected At({}), got {slot:?}", n - 1)
            })?;
        }
    }

    if verbose {
        writeln!(out, "{n} total: {total}")?;
    }
    Ok(report)
}

fn check_lookup<W: Write>(
    index: &CumulativeIndex,
    oracle: &Oracle,
    first: u64,
    target: u64,
    verbose: bool,
    out: &mut W,
) -> Result<(), HarnessError> {
    let n = index.len();
    let slot = index.try_find_by_cumulative(target)?;
    let end = slot.end();
    let through = oracle.prefix_sum(end);
    if verbose {
        writeln!(
            out,
            "sum: {target:3}: slot {slot:?} sum_of[0,{end:2}): {through:3} cumulative: {:3}",
            index.cumulative_through(slot)
        )?;
    }

    ensure(through <= target, Check::Bracket, n, target, || {
        format!("{slot:?} starts at {through}, beyond the target")
    })?;
    if end < n {
        let next = oracle.prefix_sum(end + 1);
        ensure(target < next, Check::Bracket, n, target, || {
            format!("{slot:?} is followed by {next}, not beyond the target")
        })?;
    }
    ensure(slot.is_before_first() == (target < first), Check::Sentinel, n, target, || {
        format!("first weight {first}, got {slot:?}")
    })?;
    Ok(())
}

/// Checks the smallest tree's behaviour at both ends of the target range.
///
/// # Errors
/// A [`Mismatch`] or an index error.
pub fn check_boundaries(weights: &[u64; 2]) -> Result<(), HarnessError> {
    let index = CumulativeIndex::try_build(weights)?;
    let total = index.total();
    for target in [total.saturating_add(1), u64::MAX] {
        let slot = index.try_find_by_cumulative(target)?;
        ensure(slot == Slot::At(1), Check::Saturation, 2, target, || {
            format!("expected At(1), got {slot:?}")
        })?;
    }
    // Only a zero first weight lets target 0 land on a position.
    let expected = if weights[0] == 0 { Slot::At(0) } else { Slot::BeforeFirst };
    let slot = index.try_find_by_cumulative(0)?;
    ensure(slot == expected, Check::Sentinel, 2, 0, || {
        format!("expected {expected:?}, got {slot:?}")
    })?;
    Ok(())
}

/// Everything a [`Harness::run`] covered.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    /// One report per checked tree.
    pub reports: Vec<Report>,
}

impl Summary {
    /// Number of trees checked.
    pub fn trees(&self) -> usize {
        self.reports.len()
    }

    /// Inversion targets compared across all trees.
    pub fn lookups(&self) -> u64 {
        self.reports.iter().map(|r| r.lookups).sum()
    }

    /// Prefix and range queries compared across all trees.
    pub fn queries(&self) -> usize {
        self.reports
            .iter()
            .map(|r| r.prefix_queries + r.range_queries)
            .sum()
    }
}

/// Exhaustive sweep over power-of-two sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Harness {
    /// Largest exponent: sizes `2^1 ..= 2^max_bits` are checked.
    pub max_bits: u32,
    /// Write per-position diagnostics.
    pub verbose: bool,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            max_bits: DEFAULT_MAX_BITS,
            verbose: false,
        }
    }
}

impl Harness {
    /// Runs two passes with weights `a[i] = i + pass`; pass 0 starts with a
    /// zero weight, pass 1 does not.
    ///
    /// # Errors
    /// [`HarnessError::MaxBits`] for a bad exponent, otherwise the first
    /// failure encountered.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<Summary, HarnessError> {
        if self.max_bits == 0 || self.max_bits > MAX_TEST_BITS {
            return Err(HarnessError::MaxBits(self.max_bits));
        }
        let max_n = 1u64 << self.max_bits;
        let mut summary = Summary::default();

        for pass in 0..2 {
            let weights: Vec<u64> = (0..max_n).map(|i| i + pass).collect();
            check_boundaries(&[weights[0], weights[1]])?;
            let reports = self.sweep(&weights, out)?;
            summary.reports.extend(reports);
        }
        Ok(summary)
    }

    #[cfg(not(feature = "parallel"))]
    fn sweep<W: Write>(
        &self,
        weights: &[u64],
        out: &mut W,
    ) -> Result<Vec<Report>, HarnessError> {
        (1..=self.max_bits)
            .map(|bits| check(&weights[..1 << bits], self.verbose, out))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn sweep<W: Write>(
        &self,
        weights: &[u64],
        out: &mut W,
    ) -> Result<Vec<Report>, HarnessError> {
        use rayon::prelude::*;

        // Interleaved diagnostics would be unreadable.
        if self.verbose {
            return (1..=self.max_bits)
                .map(|bits| check(&weights[..1 << bits], true, out))
                .collect();
        }
        (1..=self.max_bits)
            .into_par_iter()
            .map(|bits| check(&weights[..1 << bits], false, &mut io::sink()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_sums() {
        let oracle = Oracle::new(&[1, 2, 3, 4]).unwrap();
        assert_eq!(oracle.prefix_sum(0), 0);
        assert_eq!(oracle.prefix_sum(3), 6);
        assert_eq!(oracle.range_sum(1..3), 5);
        assert_eq!(oracle.total(), 10);
    }

    #[test]
    fn oracle_overflow() {
        assert!(Oracle::new(&[u64::MAX, 1]).is_none());
    }

    #[test]
    fn check_reports_coverage() {
        let report = check(&[1, 2, 3, 4], false, &mut io::sink()).unwrap();
        assert_eq!(report.len, 4);
        assert_eq!(report.total, 10);
        assert_eq!(report.prefix_queries, 5);
        assert_eq!(report.range_queries, 10);
        assert_eq!(report.lookups, 11);
    }

    #[test]
    fn check_skips_inversion_for_odd_sizes() {
        let report = check(&[3, 1, 4, 1, 5], false, &mut io::sink()).unwrap();
        assert_eq!(report.lookups, 0);
        assert_eq!(report.range_queries, 15);
    }

    #[test]
    fn verbose_writes_diagnostics() {
        let mut out = Vec::new();
        check(&[1, 2, 3, 4], true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("sum_of[0, 4):  10"));
        assert!(text.contains("sum:   0: slot BeforeFirst"));
        assert!(text.ends_with("4 total: 10\n"));
    }

    #[test]
    fn boundaries() {
        check_boundaries(&[0, 1]).unwrap();
        check_boundaries(&[1, 2]).unwrap();
    }

    #[test]
    fn harness_small_sweep() {
        let harness = Harness {
            max_bits: 4,
            verbose: false,
        };
        let summary = harness.run(&mut io::sink()).unwrap();
        assert_eq!(summary.trees(), 8);
        assert!(summary.lookups() > 0);
    }

    #[test]
    fn harness_rejects_bits() {
        let harness = Harness {
            max_bits: MAX_TEST_BITS + 1,
            verbose: false,
        };
        assert!(matches!(
            harness.run(&mut io::sink()),
            Err(HarnessError::MaxBits(13))
        ));
    }

    #[test]
    fn mismatch_display() {
        let mismatch = Mismatch {
            check: Check::Bracket,
            len: 8,
            argument: "5".to_string(),
            detail: "At(2) starts at 6, beyond the target".to_string(),
        };
        assert_eq!(
            mismatch.to_string(),
            "bracketing mismatch for n=8 at 5: At(2) starts at 6, beyond the target"
        );
    }
}
