//! Human-readable comparison report

use crate::regression::{EndpointComparison, MetricSeverity, SeverityCounts};
use crate::summary::SummaryComparison;

/// Render the text report
///
/// Endpoints are listed in the order given (display order from the comparison).
pub fn to_report_string(
    baseline: &str,
    candidate: &str,
    results: &[EndpointComparison],
    summary: Option<&SummaryComparison>,
) -> String {
    let mut report = String::new();
    let counts = SeverityCounts::from_comparisons(results);

    if counts.regressions() > 0 {
        report.push_str(&format!(
            "❌ REGRESSION DETECTED ({} endpoints)\n\n",
            counts.regressions()
        ));
    } else {
        report.push_str("✅ NO REGRESSION DETECTED\n\n");
    }
    report.push_str(&format!("Baseline:  {}\n", baseline));
    report.push_str(&format!("Candidate: {}\n", candidate));

    if let Some(summary) = summary {
        report.push_str("\n📊 Run Summary:\n");
        for d in &summary.deltas {
            report.push_str(&format!(
                "  {:<24} {:>10.2} → {:<10.2} {}\n",
                d.metric.label(),
                d.baseline,
                d.candidate,
                d.describe()
            ));
        }
    }

    if !results.is_empty() {
        report.push_str("\n🔎 Endpoints:\n");
        for r in results {
            report.push_str(&format_endpoint(r));
        }
    }

    report.push_str(&format!(
        "\nCritical: {}  Warning: {}  Improved: {}  Not Significant: {}  Unchanged: {}\n",
        counts.critical, counts.warning, counts.improvement, counts.insignificant, counts.none
    ));

    report
}

fn format_endpoint(r: &EndpointComparison) -> String {
    let base = r.baseline_or_zeroed();
    let cand = r.candidate_or_zeroed();

    let badge = match (r.overall_severity.badge_icon(), r.overall_severity.badge_label()) {
        (Some(icon), Some(label)) => format!("{} {}", icon, label),
        _ => String::new(),
    };

    let mut line = format!("  {:<20} {} {}\n", badge, r.method, r.endpoint);
    line.push_str(&format!(
        "      response time {:.2}ms → {:.2}ms [{}]\n",
        base.avg_response_time,
        cand.avg_response_time,
        severity_tag(r.severities.response_time)
    ));
    line.push_str(&format!(
        "      failure rate  {:.2}% → {:.2}% [{}]\n",
        base.failure_rate,
        cand.failure_rate,
        severity_tag(r.severities.failure_rate)
    ));
    line.push_str(&format!(
        "      requests      {} → {} [{}]\n",
        presence(r.baseline.is_some(), base.total_requests),
        presence(r.candidate.is_some(), cand.total_requests),
        severity_tag(r.severities.request_count)
    ));
    line
}

fn severity_tag(s: MetricSeverity) -> &'static str {
    s.badge_label().unwrap_or("-")
}

fn presence(present: bool, count: u64) -> String {
    if present {
        count.to_string()
    } else {
        "absent".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EndpointAggregate;
    use crate::regression::compare_endpoints;
    use crate::summary::RunSummary;

    fn agg(endpoint: &str, n: u64, avg: f64) -> EndpointAggregate {
        EndpointAggregate {
            endpoint: endpoint.to_string(),
            method: "GET".to_string(),
            total_requests: n,
            failure_rate: 0.0,
            avg_response_time: avg,
            std_dev_response_time: 2.0,
            ..EndpointAggregate::default()
        }
    }

    #[test]
    fn test_report_regression() {
        let results = compare_endpoints(&[agg("/slow", 500, 100.0)], &[agg("/slow", 500, 200.0)]);
        let report = to_report_string("v1", "v2", &results, None);

        assert!(report.contains("REGRESSION DETECTED (1 endpoints)"));
        assert!(report.contains("❌ Critical"));
        assert!(report.contains("GET /slow"));
        assert!(report.contains("Baseline:  v1"));
        assert!(!report.contains("Run Summary"));
    }

    #[test]
    fn test_report_no_regression_and_absent_side() {
        let results = compare_endpoints(&[agg("/gone", 500, 100.0)], &[]);
        let report = to_report_string("v1", "v2", &results, None);

        assert!(report.contains("NO REGRESSION DETECTED"));
        assert!(report.contains("Not Significant"));
        assert!(report.contains("500 → absent"));
    }

    #[test]
    fn test_report_with_summary() {
        let base = RunSummary {
            avg_response_time: 100.0,
            requests_per_second: 50.0,
            failure_rate: 1.0,
            percentile_95: 250.0,
            snapshot_count: 4,
        };
        let cand = RunSummary {
            avg_response_time: 90.0,
            ..base
        };
        let summary = SummaryComparison::new(base, cand);

        let report = to_report_string("v1", "v2", &[], Some(&summary));
        assert!(report.contains("Run Summary"));
        assert!(report.contains("10.0% faster"));
        assert!(report.contains("RPS"));
    }
}
