use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use fpgrow::datagen::generate_transactions;
use fpgrow::fp::{
    build_fp_tree, fp_growth, min_support_count, CombinationDispatcher, FrequencyTable, Item,
    Transaction,
};
use fpgrow::output::PatternSink;
use fpgrow::verify::PatternSet;

fn count_frequencies(transactions: &[Transaction]) -> FrequencyTable {
    let mut item_freq = FrequencyTable::new();
    for trxn in transactions {
        for &item in trxn {
            item_freq.add(item, 1);
        }
    }
    item_freq
}

fn mine(transactions: &[Transaction], min_support: f64, threads: usize) -> PatternSet {
    let min_count = min_support_count(min_support, transactions.len());
    let tree = build_fp_tree(transactions, count_frequencies(transactions), min_count);
    let sink = PatternSink::new(Vec::new());
    let dispatcher = CombinationDispatcher::new(Some(threads));
    fp_growth(&tree, min_count, transactions.len(), &dispatcher, &sink).unwrap();
    PatternSet::parse(sink.into_inner().unwrap().as_slice()).unwrap()
}

/// Count every itemset's occurrences by exhaustive subset enumeration.
/// Only usable for small universes; transactions become bitmasks.
fn brute_force(transactions: &[Transaction], min_count: usize) -> BTreeMap<Vec<Item>, usize> {
    let universe = transactions
        .iter()
        .flatten()
        .max()
        .map_or(0, |&item| item + 1);
    assert!(universe <= 16, "brute force is exponential in the universe");

    let masks: Vec<u32> = transactions
        .iter()
        .map(|trxn| trxn.iter().fold(0u32, |acc, &item| acc | 1 << item))
        .collect();

    let mut truth = BTreeMap::new();
    for candidate in 1u32..(1 << universe) {
        let count = masks.iter().filter(|&&m| m & candidate == candidate).count();
        if count >= min_count {
            let items: Vec<Item> = (0..universe).filter(|&i| candidate & (1 << i) != 0).collect();
            truth.insert(items, count);
        }
    }
    truth
}

fn assert_matches_brute_force(transactions: &[Transaction], min_support: f64, threads: usize) {
    let total = transactions.len();
    let min_count = min_support_count(min_support, total);
    let truth = brute_force(transactions, min_count);
    let mined = mine(transactions, min_support, threads);

    assert_eq!(
        mined.len(),
        truth.len(),
        "pattern count differs at support {min_support}"
    );
    for (items, &count) in &truth {
        let support = mined
            .support(items)
            .unwrap_or_else(|| panic!("missing pattern {items:?}"));
        let want = count as f64 / total as f64;
        assert_eq!(
            format!("{support:.4}"),
            format!("{want:.4}"),
            "support for {items:?}"
        );
    }
}

#[test]
fn random_data_matches_brute_force() {
    for seed in [1, 2, 3] {
        let mut rng = StdRng::seed_from_u64(seed);
        let transactions = generate_transactions(&mut rng, 80, 12, 6);
        assert_matches_brute_force(&transactions, 0.05, 4);
        assert_matches_brute_force(&transactions, 0.25, 4);
    }
}

#[test]
fn single_item_supports_equal_raw_frequencies() {
    let mut rng = StdRng::seed_from_u64(9);
    let transactions = generate_transactions(&mut rng, 120, 14, 7);
    let total = transactions.len();
    let min_count = min_support_count(0.1, total);
    let item_freq = count_frequencies(&transactions);

    let mined = mine(&transactions, 0.1, 2);
    for item in 0..14 {
        let count = item_freq.count(item);
        if count >= min_count {
            let want = count as f64 / total as f64;
            let support = mined
                .support(&[item])
                .unwrap_or_else(|| panic!("missing single-item pattern {item}"));
            assert_eq!(format!("{support:.4}"), format!("{want:.4}"));
        } else {
            assert_eq!(mined.support(&[item]), None);
        }
    }
}

#[test]
fn rerunning_yields_an_identical_pattern_set() {
    let mut rng = StdRng::seed_from_u64(21);
    let transactions = generate_transactions(&mut rng, 100, 12, 6);

    let collect = |set: &PatternSet| -> Vec<(Vec<Item>, String)> {
        set.iter()
            .map(|(items, support)| (items.clone(), format!("{support:.4}")))
            .collect()
    };

    let first = mine(&transactions, 0.1, 4);
    let second = mine(&transactions, 0.1, 4);
    assert_eq!(collect(&first), collect(&second));
}

#[test]
fn removing_a_transaction_never_raises_a_count() {
    let mut rng = StdRng::seed_from_u64(33);
    let transactions = generate_transactions(&mut rng, 60, 10, 5);
    let reduced: Vec<Transaction> = transactions[1..].to_vec();

    let full = mine(&transactions, 0.1, 2);
    let partial = mine(&reduced, 0.1, 2);

    for (items, support) in partial.iter() {
        if let Some(full_support) = full.support(items) {
            let partial_count = (support * reduced.len() as f64).round() as usize;
            let full_count = (full_support * transactions.len() as f64).round() as usize;
            assert!(
                partial_count <= full_count,
                "count for {items:?} grew from {full_count} to {partial_count}"
            );
        }
    }
}

#[test]
fn parallel_enumeration_matches_sequential() {
    // Nested prefix transactions build one 16-node chain, long enough to
    // cross the dispatcher's parallel threshold.
    let transactions: Vec<Transaction> = (0..16).map(|i| (0..=i).collect()).collect();

    let sequential = mine(&transactions, 0.01, 1);
    let parallel = mine(&transactions, 0.01, 8);

    assert_eq!(sequential.len(), (1 << 16) - 1);
    assert_eq!(parallel.len(), sequential.len());
    for (items, support) in sequential.iter() {
        assert_eq!(
            parallel.support(items),
            Some(support),
            "pattern {items:?} differs"
        );
    }

    // Spot checks: a subset's support is its deepest item's frequency.
    assert_eq!(sequential.support(&[0]), Some(1.0));
    assert_eq!(sequential.support(&[15]), Some(1.0 / 16.0));
    assert_eq!(sequential.support(&[0, 7]), Some(9.0 / 16.0));
}

#[test]
fn round_trip_through_the_verifier_matches_ground_truth() {
    let mut rng = StdRng::seed_from_u64(5);
    let transactions = generate_transactions(&mut rng, 50, 10, 5);
    let total = transactions.len();
    let min_count = min_support_count(0.2, total);

    // Render the brute-force truth the way the miner would and parse both
    // sides back through the verifier.
    let truth = brute_force(&transactions, min_count);
    let mut rendered = String::new();
    for (items, count) in &truth {
        let line: Vec<String> = items.iter().map(|item| item.to_string()).collect();
        rendered.push_str(&line.join(","));
        rendered.push_str(&format!(":{:.4}\n", *count as f64 / total as f64));
    }
    let expected = PatternSet::parse(rendered.as_bytes()).unwrap();

    let mined = mine(&transactions, 0.2, 4);
    let report = mined.diff(&expected);
    assert!(report.is_clean(), "diff not clean:\n{report}");
}
