// Per-metric regression classification
//
// Pipeline for one metric:
//   zero baseline → none
//   sample gate (n < min_sample_size on either side) → insignificant
//   Welch p-value >= significance level → insignificant
//   directional thresholds on the percent change → critical / warning / improvement / none
//
// The sample gate runs before the t-test and short-circuits it, so a tiny run never
// produces a regression verdict however extreme its numbers look.

use crate::model::EndpointAggregate;
use crate::regression::config::{RegressionConfig, Thresholds};
use crate::regression::severity::MetricSeverity;
use crate::regression::statistics::welch_p_value;
use serde::{Deserialize, Serialize};

/// The three metrics compared per endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    ResponseTime,
    FailureRate,
    RequestCount,
}

impl MetricKind {
    /// `true` when a larger candidate value is the good direction
    pub fn higher_is_better(self) -> bool {
        matches!(self, MetricKind::RequestCount)
    }

    pub fn thresholds(self, config: &RegressionConfig) -> Thresholds {
        match self {
            MetricKind::ResponseTime => config.response_time,
            MetricKind::FailureRate => config.failure_rate,
            MetricKind::RequestCount => config.request_count,
        }
    }
}

/// Classify the change of one metric between baseline and candidate
///
/// `n1`/`n2` are the baseline/candidate sample sizes (request counts).
///
/// # Example
/// ```
/// use runcompare::regression::{classify, MetricKind, MetricSeverity, RegressionConfig};
///
/// let config = RegressionConfig::default();
/// let severity = classify(MetricKind::ResponseTime, 100.0, 126.0, 1.0, 1.0, 50, 50, &config);
/// assert_eq!(severity, MetricSeverity::Critical);
///
/// // Too few samples: never a regression
/// let severity = classify(MetricKind::ResponseTime, 100.0, 10_000.0, 1.0, 1.0, 5, 50, &config);
/// assert_eq!(severity, MetricSeverity::Insignificant);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn classify(
    kind: MetricKind,
    baseline_value: f64,
    candidate_value: f64,
    baseline_std_dev: f64,
    candidate_std_dev: f64,
    n1: u64,
    n2: u64,
    config: &RegressionConfig,
) -> MetricSeverity {
    if baseline_value == 0.0 {
        return MetricSeverity::None;
    }

    if n1 < config.min_sample_size || n2 < config.min_sample_size {
        return MetricSeverity::Insignificant;
    }

    let percent_change = (candidate_value - baseline_value) / baseline_value * 100.0;

    let p_value = welch_p_value(
        baseline_value,
        baseline_std_dev,
        n1,
        candidate_value,
        candidate_std_dev,
        n2,
    );
    if p_value >= config.significance_level {
        return MetricSeverity::Insignificant;
    }

    apply_thresholds(kind, percent_change, kind.thresholds(config))
}

fn apply_thresholds(kind: MetricKind, percent_change: f64, t: Thresholds) -> MetricSeverity {
    if kind.higher_is_better() {
        if percent_change < -t.critical {
            MetricSeverity::Critical
        } else if percent_change < -t.warning {
            MetricSeverity::Warning
        } else if percent_change > t.warning {
            MetricSeverity::Improvement
        } else {
            MetricSeverity::None
        }
    } else if percent_change > t.critical {
        MetricSeverity::Critical
    } else if percent_change > t.warning {
        MetricSeverity::Warning
    } else if percent_change < -t.warning {
        MetricSeverity::Improvement
    } else {
        MetricSeverity::None
    }
}

/// Binomial standard error of a failure rate, in percentage points
///
/// `sqrt(p(1-p)/n) × 100` with `p = failure_rate / 100`. Zero requests yield 0.
pub fn failure_rate_std_dev(failure_rate: f64, total_requests: u64) -> f64 {
    if total_requests == 0 {
        return 0.0;
    }
    let p = failure_rate / 100.0;
    (p * (1.0 - p) / total_requests as f64).sqrt() * 100.0
}

/// Severities of all three metrics for one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSeverities {
    pub response_time: MetricSeverity,
    pub failure_rate: MetricSeverity,
    pub request_count: MetricSeverity,
}

impl MetricSeverities {
    pub fn as_array(&self) -> [MetricSeverity; 3] {
        [self.response_time, self.failure_rate, self.request_count]
    }
}

/// Classify response time, failure rate and request count independently
///
/// Absent sides are passed as zeroed records.
pub fn classify_endpoint(
    baseline: &EndpointAggregate,
    candidate: &EndpointAggregate,
    config: &RegressionConfig,
) -> MetricSeverities {
    let n1 = baseline.total_requests;
    let n2 = candidate.total_requests;

    let response_time = classify(
        MetricKind::ResponseTime,
        baseline.avg_response_time,
        candidate.avg_response_time,
        baseline.std_dev_response_time,
        candidate.std_dev_response_time,
        n1,
        n2,
        config,
    );

    let failure_rate = classify(
        MetricKind::FailureRate,
        baseline.failure_rate,
        candidate.failure_rate,
        failure_rate_std_dev(baseline.failure_rate, n1),
        failure_rate_std_dev(candidate.failure_rate, n2),
        n1,
        n2,
        config,
    );

    // Counts have no spread; zero std-devs make significance a pure equality check
    let request_count = classify(
        MetricKind::RequestCount,
        n1 as f64,
        n2 as f64,
        0.0,
        0.0,
        n1,
        n2,
        config,
    );

    MetricSeverities {
        response_time,
        failure_rate,
        request_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rt(candidate: f64) -> MetricSeverity {
        classify(
            MetricKind::ResponseTime,
            100.0,
            candidate,
            1.0,
            1.0,
            50,
            50,
            &RegressionConfig::default(),
        )
    }

    #[test]
    fn test_response_time_threshold_boundaries() {
        assert_eq!(rt(126.0), MetricSeverity::Critical);
        assert_eq!(rt(115.0), MetricSeverity::Warning);
        assert_eq!(rt(105.0), MetricSeverity::None);
        assert_eq!(rt(85.0), MetricSeverity::Improvement);
    }

    #[test]
    fn test_exact_threshold_is_not_exceeded() {
        // +25% is not > 25 → warning; +10% is not > 10 → none
        assert_eq!(rt(125.0), MetricSeverity::Warning);
        assert_eq!(rt(110.0), MetricSeverity::None);
        assert_eq!(rt(90.0), MetricSeverity::None);
    }

    #[test]
    fn test_zero_baseline_is_none() {
        let config = RegressionConfig::default();
        for kind in [
            MetricKind::ResponseTime,
            MetricKind::FailureRate,
            MetricKind::RequestCount,
        ] {
            assert_eq!(
                classify(kind, 0.0, 500.0, 0.0, 3.0, 1000, 1000, &config),
                MetricSeverity::None
            );
        }
    }

    #[test]
    fn test_sample_gate_precedes_significance() {
        let config = RegressionConfig::default();
        let severity = classify(
            MetricKind::ResponseTime,
            100.0,
            10_000.0,
            1.0,
            1.0,
            5,
            500,
            &config,
        );
        assert_eq!(severity, MetricSeverity::Insignificant);

        let severity = classify(
            MetricKind::ResponseTime,
            100.0,
            10_000.0,
            1.0,
            1.0,
            500,
            29,
            &config,
        );
        assert_eq!(severity, MetricSeverity::Insignificant);
    }

    #[test]
    fn test_noisy_change_is_insignificant() {
        // +30% but huge spread: se = sqrt(2·200²/40) ≈ 44.7, t ≈ 0.67
        let severity = classify(
            MetricKind::ResponseTime,
            100.0,
            130.0,
            200.0,
            200.0,
            40,
            40,
            &RegressionConfig::default(),
        );
        assert_eq!(severity, MetricSeverity::Insignificant);
    }

    #[test]
    fn test_request_count_direction() {
        let config = RegressionConfig::default();
        let count = |b: u64, c: u64| {
            classify(
                MetricKind::RequestCount,
                b as f64,
                c as f64,
                0.0,
                0.0,
                b,
                c,
                &config,
            )
        };

        assert_eq!(count(1000, 700), MetricSeverity::Critical);
        assert_eq!(count(1000, 850), MetricSeverity::Warning);
        assert_eq!(count(1000, 950), MetricSeverity::None);
        assert_eq!(count(1000, 1200), MetricSeverity::Improvement);
        // Identical counts: zero variance and equal means → not significant
        assert_eq!(count(1000, 1000), MetricSeverity::Insignificant);
    }

    #[test]
    fn test_failure_rate_std_dev_binomial() {
        // p = 0.1, n = 100 → sqrt(0.09/100) = 0.03 → 3 percentage points
        assert!((failure_rate_std_dev(10.0, 100) - 3.0).abs() < 1e-12);
        assert_eq!(failure_rate_std_dev(0.0, 100), 0.0);
        assert_eq!(failure_rate_std_dev(100.0, 100), 0.0);
        assert_eq!(failure_rate_std_dev(50.0, 0), 0.0);
    }

    #[test]
    fn test_failure_rate_regression() {
        let config = RegressionConfig::default();
        // 2% → 4% over 10k requests each: +100%, highly significant
        let severity = classify(
            MetricKind::FailureRate,
            2.0,
            4.0,
            failure_rate_std_dev(2.0, 10_000),
            failure_rate_std_dev(4.0, 10_000),
            10_000,
            10_000,
            &config,
        );
        assert_eq!(severity, MetricSeverity::Critical);
    }

    #[test]
    fn test_classify_endpoint_missing_candidate() {
        let baseline = EndpointAggregate {
            endpoint: "/a".to_string(),
            method: "GET".to_string(),
            total_requests: 500,
            failure_rate: 1.0,
            avg_response_time: 80.0,
            std_dev_response_time: 10.0,
            ..EndpointAggregate::default()
        };
        let candidate = EndpointAggregate::zeroed("GET", "/a");

        let s = classify_endpoint(&baseline, &candidate, &RegressionConfig::default());
        assert_eq!(s.response_time, MetricSeverity::Insignificant);
        assert_eq!(s.failure_rate, MetricSeverity::Insignificant);
        assert_eq!(s.request_count, MetricSeverity::Insignificant);
    }

    #[test]
    fn test_classify_endpoint_missing_baseline() {
        let baseline = EndpointAggregate::zeroed("GET", "/new");
        let candidate = EndpointAggregate {
            endpoint: "/new".to_string(),
            method: "GET".to_string(),
            total_requests: 500,
            failure_rate: 1.0,
            avg_response_time: 80.0,
            std_dev_response_time: 10.0,
            ..EndpointAggregate::default()
        };

        let s = classify_endpoint(&baseline, &candidate, &RegressionConfig::default());
        assert_eq!(s.as_array(), [MetricSeverity::None; 3]);
    }
}
