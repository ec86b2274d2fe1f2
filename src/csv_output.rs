//! CSV output format for run comparisons
//!
//! One row per endpoint in display order, for spreadsheet analysis.

use crate::regression::EndpointComparison;

const HEADER: [&str; 13] = [
    "method",
    "endpoint",
    "overall_severity",
    "response_time_severity",
    "failure_rate_severity",
    "request_count_severity",
    "baseline_avg_response_time",
    "candidate_avg_response_time",
    "baseline_failure_rate",
    "candidate_failure_rate",
    "baseline_total_requests",
    "candidate_total_requests",
    "badge",
];

/// CSV output formatter
#[derive(Debug, Default)]
pub struct CsvOutput {
    rows: Vec<Vec<String>>,
}

impl CsvOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_comparisons(results: &[EndpointComparison]) -> Self {
        let mut output = Self::new();
        for r in results {
            output.add_comparison(r);
        }
        output
    }

    /// Add an endpoint comparison as one row
    pub fn add_comparison(&mut self, c: &EndpointComparison) {
        let base = c.baseline_or_zeroed();
        let cand = c.candidate_or_zeroed();

        self.rows.push(vec![
            c.method.clone(),
            c.endpoint.clone(),
            c.overall_severity.to_string(),
            c.severities.response_time.to_string(),
            c.severities.failure_rate.to_string(),
            c.severities.request_count.to_string(),
            format!("{:.2}", base.avg_response_time),
            format!("{:.2}", cand.avg_response_time),
            format!("{:.2}", base.failure_rate),
            format!("{:.2}", cand.failure_rate),
            base.total_requests.to_string(),
            cand.total_requests.to_string(),
            c.overall_severity.badge_label().unwrap_or("").to_string(),
        ]);
    }

    /// Escape CSV field (commas, quotes, CR or LF)
    fn escape_field(field: &str) -> String {
        if field.contains([',', '"', '\n', '\r']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&HEADER.join(","));
        output.push('\n');

        for row in &self.rows {
            let escaped: Vec<String> = row.iter().map(|f| Self::escape_field(f)).collect();
            output.push_str(&escaped.join(","));
            output.push('\n');
        }

        output
    }
}
