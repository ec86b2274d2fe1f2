//! Property-based tests for the comparison engine
//!
//! Covers:
//! 1. Normal CDF and Welch p-value ranges
//! 2. Classification gates (zero baseline, sample size)
//! 3. Severity combination
//! 4. Endpoint merge, ranking and determinism

use proptest::prelude::*;
use runcompare::model::EndpointAggregate;
use runcompare::regression::{
    classify, combine_severities, compare_endpoints, normal_cdf, welch_p_value, EndpointKey,
    MetricKind, MetricSeverity, RegressionConfig, COMBINATION_PRIORITY,
};
use std::collections::HashSet;

fn severity_strategy() -> impl Strategy<Value = MetricSeverity> {
    prop::sample::select(COMBINATION_PRIORITY.to_vec())
}

fn aggregate_strategy() -> impl Strategy<Value = EndpointAggregate> {
    (
        prop::sample::select(vec!["GET", "POST", "PUT", "DELETE"]),
        "/[a-c]{1,2}( [a-c])?",
        0u64..5000,
        0.0f64..100.0,
        0.0f64..2000.0,
        0.0f64..300.0,
    )
        .prop_map(|(method, endpoint, n, failure_rate, avg, sd)| EndpointAggregate {
            endpoint,
            method: method.to_string(),
            total_requests: n,
            failure_rate,
            avg_response_time: avg,
            std_dev_response_time: sd,
            ..EndpointAggregate::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_normal_cdf_in_unit_interval(z in -50.0f64..50.0) {
        let p = normal_cdf(z);
        prop_assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn prop_normal_cdf_monotonic(a in -8.0f64..8.0, b in -8.0f64..8.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(normal_cdf(lo) <= normal_cdf(hi) + 1e-12);
    }

    #[test]
    fn prop_welch_p_value_in_unit_interval(
        m1 in 0.0f64..1e5, s1 in 0.0f64..1e4, n1 in 0u64..100_000,
        m2 in 0.0f64..1e5, s2 in 0.0f64..1e4, n2 in 0u64..100_000,
    ) {
        let p = welch_p_value(m1, s1, n1, m2, s2, n2);
        prop_assert!((0.0..=1.0).contains(&p), "p = {}", p);
    }

    #[test]
    fn prop_welch_symmetric(
        m1 in 0.0f64..1e4, s1 in 0.0f64..1e3, n1 in 2u64..10_000,
        m2 in 0.0f64..1e4, s2 in 0.0f64..1e3, n2 in 2u64..10_000,
    ) {
        let forward = welch_p_value(m1, s1, n1, m2, s2, n2);
        let reverse = welch_p_value(m2, s2, n2, m1, s1, n1);
        prop_assert!((forward - reverse).abs() < 1e-12);
    }

    #[test]
    fn prop_welch_equal_means_never_significant(
        m in 0.0f64..1e4, s1 in 0.0f64..1e3, s2 in 0.0f64..1e3,
        n1 in 2u64..10_000, n2 in 2u64..10_000,
    ) {
        prop_assert!(welch_p_value(m, s1, n1, m, s2, n2) >= 0.05);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_zero_baseline_is_none(
        candidate in 0.0f64..1e4, sd in 0.0f64..100.0,
        n1 in 0u64..10_000, n2 in 0u64..10_000,
    ) {
        let config = RegressionConfig::default();
        for kind in [MetricKind::ResponseTime, MetricKind::FailureRate, MetricKind::RequestCount] {
            let s = classify(kind, 0.0, candidate, sd, sd, n1, n2, &config);
            prop_assert_eq!(s, MetricSeverity::None);
        }
    }

    #[test]
    fn prop_small_samples_insignificant(
        baseline in 1.0f64..1e4, candidate in 0.0f64..1e4,
        small in 0u64..30, large in 0u64..10_000, small_first in any::<bool>(),
    ) {
        let (n1, n2) = if small_first { (small, large) } else { (large, small) };
        let s = classify(
            MetricKind::ResponseTime,
            baseline,
            candidate,
            1.0,
            1.0,
            n1,
            n2,
            &RegressionConfig::default(),
        );
        prop_assert_eq!(s, MetricSeverity::Insignificant);
    }

    #[test]
    fn prop_combine_picks_highest_priority(
        severities in prop::collection::vec(severity_strategy(), 1..6),
    ) {
        let combined = combine_severities(&severities);
        prop_assert!(severities.contains(&combined));

        let first = COMBINATION_PRIORITY
            .iter()
            .find(|p| severities.contains(*p))
            .copied();
        prop_assert_eq!(Some(combined), first);
    }

    #[test]
    fn prop_key_round_trip(
        method in "[A-Z]{3,7}",
        endpoint in "/[a-z0-9 /?=&]{0,20}",
    ) {
        let key = EndpointKey::new(method.as_str(), endpoint.as_str());
        prop_assert_eq!(EndpointKey::parse(&key.to_key_string()), key);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_compare_union_complete_and_ranked(
        baseline in prop::collection::vec(aggregate_strategy(), 0..8),
        candidate in prop::collection::vec(aggregate_strategy(), 0..8),
    ) {
        let results = compare_endpoints(&baseline, &candidate);

        let expected: HashSet<String> = baseline
            .iter()
            .chain(&candidate)
            .map(|a| EndpointKey::from(a).to_key_string())
            .collect();
        let got: HashSet<String> = results.iter().map(|r| r.key().to_key_string()).collect();

        prop_assert_eq!(results.len(), expected.len());
        prop_assert_eq!(got, expected);

        for pair in results.windows(2) {
            prop_assert!(
                pair[0].overall_severity.display_rank() <= pair[1].overall_severity.display_rank()
            );
        }
    }

    #[test]
    fn prop_compare_deterministic(
        baseline in prop::collection::vec(aggregate_strategy(), 0..8),
        candidate in prop::collection::vec(aggregate_strategy(), 0..8),
    ) {
        let first = compare_endpoints(&baseline, &candidate);
        let second = compare_endpoints(&baseline, &candidate);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_overall_is_combination_of_metrics(
        baseline in prop::collection::vec(aggregate_strategy(), 0..8),
        candidate in prop::collection::vec(aggregate_strategy(), 0..8),
    ) {
        for r in compare_endpoints(&baseline, &candidate) {
            prop_assert_eq!(
                r.overall_severity,
                combine_severities(&r.severities.as_array())
            );
        }
    }
}
