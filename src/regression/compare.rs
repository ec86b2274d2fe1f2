// Endpoint merge, multi-metric combination and ranking
//
// 1. Union of "<METHOD> <endpoint>" keys across both runs, first-seen order
//    (baseline records first, then candidate-only records)
// 2. Split each key back into (method, endpoint) at the first space
// 3. Classify response time, failure rate and request count independently
// 4. Fold the three severities with COMBINATION_PRIORITY
// 5. Stable sort by DISPLAY_ORDER, worst first
//
// Pure and deterministic: identical inputs give identical output in identical order.

use crate::model::EndpointAggregate;
use crate::regression::classify::{classify_endpoint, MetricSeverities};
use crate::regression::config::RegressionConfig;
use crate::regression::severity::{combine_severities, MetricSeverity};
use fnv::{FnvHashMap, FnvHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an endpoint across runs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointKey {
    pub method: String,
    pub endpoint: String,
}

impl EndpointKey {
    pub fn new(method: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Merge key `"<METHOD> <endpoint>"`
    pub fn to_key_string(&self) -> String {
        format!("{} {}", self.method, self.endpoint)
    }

    /// Split a merge key at its first space
    ///
    /// Endpoint paths may contain spaces, so only the first one separates the method.
    /// A key without a space is taken as a bare method with an empty endpoint.
    ///
    /// # Example
    /// ```
    /// use runcompare::regression::EndpointKey;
    ///
    /// let key = EndpointKey::parse("GET /a b");
    /// assert_eq!(key.method, "GET");
    /// assert_eq!(key.endpoint, "/a b");
    /// ```
    pub fn parse(key: &str) -> Self {
        match key.split_once(' ') {
            Some((method, endpoint)) => Self::new(method, endpoint),
            None => Self::new(key, ""),
        }
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.endpoint)
    }
}

impl From<&EndpointAggregate> for EndpointKey {
    fn from(agg: &EndpointAggregate) -> Self {
        Self::new(agg.method.as_str(), agg.endpoint.as_str())
    }
}

/// Baseline-vs-candidate verdict for one endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointComparison {
    pub endpoint: String,
    pub method: String,
    /// `None` when the endpoint was not observed in the baseline run
    pub baseline: Option<EndpointAggregate>,
    /// `None` when the endpoint was not observed in the candidate run
    pub candidate: Option<EndpointAggregate>,
    pub severities: MetricSeverities,
    pub overall_severity: MetricSeverity,
}

impl EndpointComparison {
    pub fn key(&self) -> EndpointKey {
        EndpointKey::new(self.method.as_str(), self.endpoint.as_str())
    }

    /// Baseline record, zeroed when absent
    pub fn baseline_or_zeroed(&self) -> EndpointAggregate {
        self.baseline
            .clone()
            .unwrap_or_else(|| EndpointAggregate::zeroed(&self.method, &self.endpoint))
    }

    /// Candidate record, zeroed when absent
    pub fn candidate_or_zeroed(&self) -> EndpointAggregate {
        self.candidate
            .clone()
            .unwrap_or_else(|| EndpointAggregate::zeroed(&self.method, &self.endpoint))
    }
}

/// Compare two runs' endpoint statistics with the fixed default policy
///
/// # Example
/// ```
/// use runcompare::model::EndpointAggregate;
/// use runcompare::regression::{compare_endpoints, MetricSeverity};
///
/// let make = |avg: f64| EndpointAggregate {
///     endpoint: "/checkout".to_string(),
///     method: "POST".to_string(),
///     total_requests: 400,
///     failure_rate: 0.0,
///     avg_response_time: avg,
///     std_dev_response_time: 2.0,
///     ..EndpointAggregate::default()
/// };
///
/// let results = compare_endpoints(&[make(100.0)], &[make(140.0)]);
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].overall_severity, MetricSeverity::Critical);
/// ```
pub fn compare_endpoints(
    baseline: &[EndpointAggregate],
    candidate: &[EndpointAggregate],
) -> Vec<EndpointComparison> {
    compare_endpoints_with(baseline, candidate, &RegressionConfig::default())
}

/// Compare two runs' endpoint statistics with an explicit policy
pub fn compare_endpoints_with(
    baseline: &[EndpointAggregate],
    candidate: &[EndpointAggregate],
    config: &RegressionConfig,
) -> Vec<EndpointComparison> {
    let baseline_index = index_by_key(baseline, "baseline");
    let candidate_index = index_by_key(candidate, "candidate");

    let mut seen: FnvHashSet<String> = FnvHashSet::default();
    let mut keys: Vec<String> = Vec::with_capacity(baseline.len() + candidate.len());
    for agg in baseline.iter().chain(candidate) {
        let key = EndpointKey::from(agg).to_key_string();
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }

    let mut results: Vec<EndpointComparison> = keys
        .iter()
        .map(|key| {
            let EndpointKey { method, endpoint } = EndpointKey::parse(key);
            let base = baseline_index.get(key.as_str()).copied();
            let cand = candidate_index.get(key.as_str()).copied();

            let severities = classify_endpoint(
                &base
                    .cloned()
                    .unwrap_or_else(|| EndpointAggregate::zeroed(&method, &endpoint)),
                &cand
                    .cloned()
                    .unwrap_or_else(|| EndpointAggregate::zeroed(&method, &endpoint)),
                config,
            );
            let overall_severity = combine_severities(&severities.as_array());

            tracing::debug!(
                key = %key,
                response_time = %severities.response_time,
                failure_rate = %severities.failure_rate,
                request_count = %severities.request_count,
                overall = %overall_severity,
                "classified endpoint"
            );

            EndpointComparison {
                endpoint,
                method,
                baseline: base.cloned(),
                candidate: cand.cloned(),
                severities,
                overall_severity,
            }
        })
        .collect();

    // sort_by_key is stable: ties keep union order
    results.sort_by_key(|r| r.overall_severity.display_rank());
    results
}

/// Key → record; a duplicate identity within one run keeps the later record
fn index_by_key<'a>(
    records: &'a [EndpointAggregate],
    side: &str,
) -> FnvHashMap<String, &'a EndpointAggregate> {
    let mut index = FnvHashMap::default();
    for agg in records {
        let key = EndpointKey::from(agg).to_key_string();
        if index.insert(key.clone(), agg).is_some() {
            tracing::warn!("Duplicate {} record for {}, keeping the last one", side, key);
        }
    }
    index
}

/// Number of endpoints per overall severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub warning: usize,
    pub none: usize,
    pub insignificant: usize,
    pub improvement: usize,
}

impl SeverityCounts {
    pub fn from_comparisons(results: &[EndpointComparison]) -> Self {
        let mut counts = Self::default();
        for r in results {
            match r.overall_severity {
                MetricSeverity::Critical => counts.critical += 1,
                MetricSeverity::Warning => counts.warning += 1,
                MetricSeverity::None => counts.none += 1,
                MetricSeverity::Insignificant => counts.insignificant += 1,
                MetricSeverity::Improvement => counts.improvement += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.critical + self.warning + self.none + self.insignificant + self.improvement
    }

    pub fn regressions(&self) -> usize {
        self.critical + self.warning
    }
}
