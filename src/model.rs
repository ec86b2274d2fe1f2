//! Load-test result records as served by the results API
//!
//! Field names follow the API's JSON schema. Unknown fields are ignored so newer API
//! versions keep deserializing.

use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-endpoint summary statistics for one test run
///
/// Identity is (`method`, `endpoint`), case-sensitive. A run carries at most one record
/// per identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointAggregate {
    pub endpoint: String,
    pub method: String,
    pub total_requests: u64,
    #[serde(default)]
    pub failure_count: u64,
    /// Percentage in [0, 100]
    pub failure_rate: f64,
    /// Milliseconds
    pub avg_response_time: f64,
    #[serde(default)]
    pub min_response_time: f64,
    #[serde(default)]
    pub max_response_time: f64,
    pub std_dev_response_time: f64,
}

impl EndpointAggregate {
    /// All-zero record standing in for a side where the endpoint was not observed
    pub fn zeroed(method: &str, endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            ..Self::default()
        }
    }
}

/// A load-test run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRun {
    pub id: String,
    pub project: String,
    pub test_name: String,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub user_count: u64,
    #[serde(default)]
    pub spawn_rate: f64,
    #[serde(default)]
    pub host: String,
    pub status: String,
    #[serde(default)]
    pub test_metadata: Option<Value>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl TestRun {
    /// Only completed runs are offered for comparison
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

/// Whole-run statistics at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSnapshot {
    pub id: String,
    pub test_run_id: String,
    pub timestamp: String,
    pub total_requests: u64,
    pub failure_count: u64,
    pub failure_rate: f64,
    pub avg_response_time: f64,
    pub median_response_time: f64,
    pub min_response_time: f64,
    pub max_response_time: f64,
    pub percentile_95: f64,
    pub percentile_99: f64,
    pub requests_per_second: f64,
    pub current_user_count: u64,
}

/// A single recorded request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLog {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub test_run_id: String,
    /// HTTP method
    pub request_type: String,
    /// Endpoint name (path)
    pub name: String,
    #[serde(default)]
    pub url: String,
    /// Milliseconds
    pub response_time: f64,
    #[serde(default)]
    pub response_length: u64,
    pub success: bool,
    #[serde(default)]
    pub exception: Option<String>,
    #[serde(default)]
    pub start_time: String,
}

/// Aggregate raw request logs into per-endpoint records
///
/// Groups by (`request_type`, `name`) in first-seen order. The response time standard
/// deviation is the population standard deviation; a single request yields 0.
pub fn aggregate_request_logs(logs: &[RequestLog]) -> Vec<EndpointAggregate> {
    let mut index: FnvHashMap<(&str, &str), usize> = FnvHashMap::default();
    let mut groups: Vec<((&str, &str), Vec<&RequestLog>)> = Vec::new();

    for log in logs {
        let key = (log.request_type.as_str(), log.name.as_str());
        match index.get(&key) {
            Some(&i) => groups[i].1.push(log),
            None => {
                index.insert(key, groups.len());
                groups.push((key, vec![log]));
            }
        }
    }

    groups
        .into_iter()
        .map(|((method, endpoint), members)| aggregate_group(method, endpoint, &members))
        .collect()
}

/// Mean and population standard deviation of response times, kept in f64
fn response_time_moments(members: &[&RequestLog]) -> (f64, f64) {
    if members.is_empty() {
        return (0.0, 0.0);
    }
    let n = members.len() as f64;
    let mean = members.iter().map(|r| r.response_time).sum::<f64>() / n;
    if members.len() == 1 {
        return (mean, 0.0);
    }

    // Two-pass, centred on the mean
    let variance = members
        .iter()
        .map(|r| {
            let d = r.response_time - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

fn aggregate_group(method: &str, endpoint: &str, members: &[&RequestLog]) -> EndpointAggregate {
    let total = members.len() as u64;
    let failures = members.iter().filter(|r| !r.success).count() as u64;
    let (mean, std_dev) = response_time_moments(members);

    let min = members
        .iter()
        .map(|r| r.response_time)
        .fold(f64::INFINITY, f64::min);
    let max = members
        .iter()
        .map(|r| r.response_time)
        .fold(f64::NEG_INFINITY, f64::max);

    EndpointAggregate {
        endpoint: endpoint.to_string(),
        method: method.to_string(),
        total_requests: total,
        failure_count: failures,
        failure_rate: if total == 0 {
            0.0
        } else {
            failures as f64 / total as f64 * 100.0
        },
        avg_response_time: mean,
        min_response_time: if min.is_finite() { min } else { 0.0 },
        max_response_time: if max.is_finite() { max } else { 0.0 },
        std_dev_response_time: std_dev,
    }
}
