//! Property-based tests for rule evaluation, aggregation and scoring.

use arrow::array::{ArrayRef, Int64Array, StringArray};
use dq_guard::core::{Expectation, ExpectationSuite, ValidationEngine};
use dq_guard::dataset::Dataset;
use dq_guard::scoring::{BadgeTier, ScoreClassifier};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

const CODES: [&str; 4] = ["Cash", "Credit Card", "Digital Wallet", "UNKNOWN"];

fn dataset(numbers: &[Option<i64>], codes: &[Option<usize>]) -> Dataset {
    let codes: Vec<Option<&str>> = codes.iter().map(|c| c.map(|i| CODES[i])).collect();
    Dataset::from_columns(vec![
        ("n", Arc::new(Int64Array::from(numbers.to_vec())) as ArrayRef),
        ("code", Arc::new(StringArray::from(codes)) as ArrayRef),
    ])
    .unwrap()
}

fn columns() -> impl Strategy<Value = (Vec<Option<i64>>, Vec<Option<usize>>)> {
    (0usize..60).prop_flat_map(|rows| {
        (
            prop::collection::vec(prop::option::weighted(0.85, -5i64..15), rows),
            prop::collection::vec(prop::option::weighted(0.85, 0usize..CODES.len()), rows),
        )
    })
}

fn full_suite() -> ExpectationSuite {
    ExpectationSuite::builder("props")
        .expectation(Expectation::not_null("n"))
        .expectation(Expectation::unique("n"))
        .expectation(Expectation::between("n", 1.0, Some(10.0)).unwrap())
        .expectation(Expectation::in_set("code", ["Cash", "Credit Card", "Digital Wallet"]))
        .expectation(Expectation::matches_pattern("code", r"[A-Z][a-z]+( [A-Z][a-z]+)?").unwrap())
        .expectation(Expectation::unique("code"))
        .build()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn results_are_bounded_and_consistent((numbers, codes) in columns()) {
        let data = dataset(&numbers, &codes);
        let suite = full_suite();
        let results = ValidationEngine::new().evaluate(&data, &suite).unwrap();

        prop_assert_eq!(results.len(), suite.len());
        for (result, expectation) in results.iter().zip(suite.expectations()) {
            prop_assert_eq!(result.identity(), expectation.identity());
            prop_assert!(result.unexpected_count() <= numbers.len() as u64);
            prop_assert_eq!(result.element_count(), numbers.len() as u64);
            prop_assert_eq!(result.success(), result.unexpected_count() == 0);
        }
    }

    #[test]
    fn evaluation_is_deterministic((numbers, codes) in columns()) {
        let data = dataset(&numbers, &codes);
        let suite = full_suite();
        let engine = ValidationEngine::new();
        prop_assert_eq!(
            engine.evaluate(&data, &suite).unwrap(),
            engine.evaluate(&data, &suite).unwrap()
        );
    }

    #[test]
    fn counts_match_naive_definitions((numbers, codes) in columns()) {
        let data = dataset(&numbers, &codes);
        let results = ValidationEngine::new().evaluate(&data, &full_suite()).unwrap();

        let nulls = numbers.iter().filter(|n| n.is_none()).count() as u64;
        prop_assert_eq!(results[0].unexpected_count(), nulls);

        let mut occurrences: HashMap<i64, u64> = HashMap::new();
        for n in numbers.iter().flatten() {
            *occurrences.entry(*n).or_default() += 1;
        }
        let duplicated: u64 = occurrences.values().filter(|&&c| c > 1).sum();
        prop_assert_eq!(results[1].unexpected_count(), duplicated);

        let out_of_range = numbers
            .iter()
            .filter(|n| !matches!(n, Some(v) if (1..=10).contains(v)))
            .count() as u64;
        prop_assert_eq!(results[2].unexpected_count(), out_of_range);

        // Nulls are ignored by the set rule
        let outside_set = codes.iter().filter(|c| **c == Some(3)).count() as u64;
        prop_assert_eq!(results[3].unexpected_count(), outside_set);

        // ... but flagged by the pattern rule
        let not_matching = codes.iter().filter(|c| matches!(c, None | Some(3))).count() as u64;
        prop_assert_eq!(results[4].unexpected_count(), not_matching);
    }

    #[test]
    fn duplicate_expectations_do_not_change_results((numbers, codes) in columns()) {
        let data = dataset(&numbers, &codes);
        let mut suite = full_suite();
        let before = ValidationEngine::new().evaluate(&data, &suite).unwrap();

        prop_assert!(!suite.add_expectation(Expectation::not_null("n")));
        prop_assert!(!suite.add_expectation(Expectation::between("n", 0.0, None).unwrap()));
        let after = ValidationEngine::new().evaluate(&data, &suite).unwrap();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn summary_matches_results((numbers, codes) in columns()) {
        let data = dataset(&numbers, &codes);
        let report = ValidationEngine::new().run(&data, &full_suite()).unwrap();
        let summary = report.summary();

        prop_assert_eq!(summary.total_checks, report.results.len());
        prop_assert_eq!(summary.failed_count(), report.failures().count());
        prop_assert_eq!(
            summary.total_unexpected,
            report.results.iter().map(|r| r.unexpected_count()).sum::<u64>()
        );
        prop_assert!((0.0..=1.0).contains(&summary.success_ratio));
        prop_assert_eq!(report.badge(), ScoreClassifier::classify(summary.success_count));
    }

    #[test]
    fn badge_is_monotonic(a in 0usize..20, b in 0usize..20) {
        let rank = |tier: BadgeTier| match tier {
            BadgeTier::None => 0,
            BadgeTier::Bronze => 1,
            BadgeTier::Silver => 2,
            BadgeTier::Gold => 3,
        };
        let (low, high) = (a.min(b), a.max(b));
        let low_badge = ScoreClassifier::classify(low);
        let high_badge = ScoreClassifier::classify(high);

        prop_assert!(rank(low_badge.tier) <= rank(high_badge.tier));
        prop_assert!(low_badge.progress <= high_badge.progress);
        prop_assert!((0.0..=1.0).contains(&high_badge.progress));
    }
}
