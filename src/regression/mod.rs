// Statistical regression detection between two load-test runs
//
// Given per-endpoint aggregate statistics for a baseline and a candidate run, decide per
// endpoint and per metric whether the observed change is a regression, an improvement,
// or noise, then rank endpoints worst first.
//
// Layers:
// - statistics: normal CDF approximation and Welch's t-test from summary statistics
// - config:     sample-size gate, significance level, per-metric thresholds
// - classify:   one metric → one severity
// - severity:   the severity enum, combination priority, display order, badges
// - compare:    endpoint merge across runs, combination, ranking
//
// Scientific Foundation:
// [9] Heger, C., Happe, J., & Farahbod, R. (2013). Automated root cause isolation
//     of performance regressions. ICPE. Fixed % thresholds alone yield high false
//     positives; thresholds only apply once the change is statistically significant.

mod classify;
mod compare;
mod config;
mod severity;
mod statistics;

pub use classify::{
    classify, classify_endpoint, failure_rate_std_dev, MetricKind, MetricSeverities,
};
pub use compare::{
    compare_endpoints, compare_endpoints_with, EndpointComparison, EndpointKey, SeverityCounts,
};
pub use config::{
    RegressionConfig, Thresholds, FAILURE_RATE_THRESHOLDS, MIN_SAMPLE_SIZE,
    REQUEST_COUNT_THRESHOLDS, RESPONSE_TIME_THRESHOLDS, SIGNIFICANCE_LEVEL,
};
pub use severity::{combine_severities, MetricSeverity, COMBINATION_PRIORITY, DISPLAY_ORDER};
pub use statistics::{normal_cdf, welch_p_value, NORMAL_APPROX_MIN_DF};
