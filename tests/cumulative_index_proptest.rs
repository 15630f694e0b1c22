use fenwick_index::verify::{self, Oracle};
use fenwick_index::{CumulativeIndex, Slot};
use proptest::prelude::*;
use std::io;

#[derive(Debug, Clone)]
enum Operation {
    Increment(usize, u16),
    PrefixSum(usize),
    Find(u32),
}

fn weights(max_len: usize) -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::vec(0u64..50, 2..=max_len)
}

fn power_of_two_weights() -> impl Strategy<Value = Vec<u64>> {
    (1u32..=7).prop_flat_map(|bits| proptest::collection::vec(0u64..20, 1usize << bits))
}

proptest! {
    #[test]
    fn test_prefix_sums_match_brute_force(weights in weights(200)) {
        let index = CumulativeIndex::build(&weights);
        let oracle = Oracle::new(&weights).unwrap();
        for end in 0..=weights.len() {
            prop_assert_eq!(index.prefix_sum(end), oracle.prefix_sum(end));
        }
        prop_assert_eq!(index.total(), oracle.total());
        prop_assert_eq!(index.to_weights(), weights);
    }

    #[test]
    fn test_exhaustive_check_passes(weights in power_of_two_weights()) {
        let report = verify::check(&weights, false, &mut io::sink()).unwrap();
        prop_assert_eq!(report.lookups, report.total + 1);
    }

    #[test]
    fn test_index_matches_model(
        (mut model, ops) in weights(64).prop_flat_map(|w| {
            let n = w.len();
            let ops = proptest::collection::vec(
                prop_oneof![
                    (0..n, any::<u16>()).prop_map(|(i, d)| Operation::Increment(i, d)),
                    (0..=n).prop_map(Operation::PrefixSum),
                    any::<u32>().prop_map(Operation::Find),
                ],
                1..100,
            );
            (Just(w), ops)
        })
    ) {
        let mut index = CumulativeIndex::build(&model);

        for op in ops {
            match op {
                Operation::Increment(i, d) => {
                    index.increment(i, u64::from(d));
                    model[i] += u64::from(d);
                }
                Operation::PrefixSum(end) => {
                    let expected: u64 = model[..end].iter().sum();
                    prop_assert_eq!(index.prefix_sum(end), expected, "prefix_sum({})", end);
                }
                Operation::Find(target) => {
                    let target = u64::from(target) % (index.total() + 2);
                    match index.try_find_by_cumulative(target) {
                        Ok(slot) => {
                            prop_assert!(model.len().is_power_of_two());
                            let end = slot.end();
                            let through: u64 = model[..end].iter().sum();
                            prop_assert!(through <= target);
                            if end < model.len() {
                                prop_assert!(target < through + model[end]);
                            }
                            prop_assert_eq!(slot == Slot::BeforeFirst, target < model[0]);
                        }
                        Err(_) => prop_assert!(!model.len().is_power_of_two()),
                    }
                }
            }
        }

        prop_assert_eq!(index.to_weights(), model);
    }
}
