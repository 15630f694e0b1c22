use fenwick_index::verify::{self, Check, Harness, HarnessError, DEFAULT_MAX_BITS};
use std::io;

#[test]
fn test_default_sweep() {
    let summary = Harness::default().run(&mut io::sink()).unwrap();
    // Two passes over sizes 2^1 ..= 2^10.
    assert_eq!(summary.trees(), 2 * DEFAULT_MAX_BITS as usize);
    // Pass 1 on n = 1024 alone inverts 1024 * 1025 / 2 + 1 targets.
    assert!(summary.lookups() > 524_800);
}

#[test]
fn test_verbose_small_tree() {
    let mut out = Vec::new();
    let report = verify::check(&[1, 2, 3, 4], true, &mut out).unwrap();
    assert_eq!(report.total, 10);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    // 5 prefix lines, 11 lookup lines, 1 footer.
    assert_eq!(lines.len(), 17);
    assert_eq!(lines[0], "sum_of[0, 0):   0");
    assert!(lines[6].starts_with("sum:   1: slot At(0)"));
    assert_eq!(lines[16], "4 total: 10");
}

#[test]
fn test_check_non_power_of_two_sizes() {
    for n in [3usize, 5, 6, 7, 100, 255] {
        let weights: Vec<u64> = (0..n as u64).map(|i| i % 4).collect();
        let report = verify::check(&weights, false, &mut io::sink()).unwrap();
        assert_eq!(report.lookups, 0);
        assert_eq!(report.prefix_queries, n + 1);
    }
}

#[test]
fn test_check_rejects_invalid_input() {
    let err = verify::check(&[1], false, &mut io::sink()).unwrap_err();
    assert!(matches!(err, HarnessError::Index(_)));
    assert_eq!(
        err.to_string(),
        format!("index error: capacity 1 out of range (2..={})", fenwick_index::MAX_LEN)
    );
}

#[test]
fn test_check_display() {
    assert_eq!(Check::Sentinel.to_string(), "before-first sentinel");
    let err = Harness {
        max_bits: 0,
        verbose: false,
    }
    .run(&mut io::sink())
    .unwrap_err();
    assert_eq!(err.to_string(), "max bits 0 out of range (1..=12)");
}
