//! JSON output format for run comparisons
//!
//! Absent sides are written as zeroed records with a `*_present: false` flag so
//! consumers never have to special-case nulls.

use crate::model::EndpointAggregate;
use crate::regression::{EndpointComparison, MetricSeverity, SeverityCounts};
use crate::summary::SummaryComparison;
use serde::{Deserialize, Serialize};

/// One endpoint verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonEndpoint {
    pub method: String,
    pub endpoint: String,
    pub overall_severity: MetricSeverity,
    /// Badge text; omitted when no badge is shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub response_time_severity: MetricSeverity,
    pub failure_rate_severity: MetricSeverity,
    pub request_count_severity: MetricSeverity,
    pub baseline_present: bool,
    pub candidate_present: bool,
    pub baseline: EndpointAggregate,
    pub candidate: EndpointAggregate,
}

impl From<&EndpointComparison> for JsonEndpoint {
    fn from(c: &EndpointComparison) -> Self {
        Self {
            method: c.method.clone(),
            endpoint: c.endpoint.clone(),
            overall_severity: c.overall_severity,
            badge: c.overall_severity.badge_label().map(str::to_string),
            response_time_severity: c.severities.response_time,
            failure_rate_severity: c.severities.failure_rate,
            request_count_severity: c.severities.request_count,
            baseline_present: c.baseline.is_some(),
            candidate_present: c.candidate.is_some(),
            baseline: c.baseline_or_zeroed(),
            candidate: c.candidate_or_zeroed(),
        }
    }
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    pub version: String,
    pub baseline: String,
    pub candidate: String,
    /// Headline metrics (only when both runs have snapshots)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryComparison>,
    pub counts: SeverityCounts,
    pub endpoints: Vec<JsonEndpoint>,
}

impl JsonOutput {
    pub fn new(
        baseline: &str,
        candidate: &str,
        results: &[EndpointComparison],
        summary: Option<SummaryComparison>,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            baseline: baseline.to_string(),
            candidate: candidate.to_string(),
            summary,
            counts: SeverityCounts::from_comparisons(results),
            endpoints: results.iter().map(JsonEndpoint::from).collect(),
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
