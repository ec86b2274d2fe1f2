//! Whole-run summary metrics and baseline-vs-candidate deltas
//!
//! The headline numbers shown above the per-endpoint table: each metric is the
//! arithmetic mean across the run's time-series snapshots. Deltas are plain percent
//! differences with no significance testing.

use crate::model::StatsSnapshot;
use serde::{Deserialize, Serialize};
use trueno::Vector;

/// Substitute for a zero failure rate so the percent difference stays finite
const FAILURE_RATE_FLOOR: f64 = 0.01;

/// Mean of each headline metric across a run's snapshots
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub avg_response_time: f64,
    pub requests_per_second: f64,
    pub failure_rate: f64,
    pub percentile_95: f64,
    pub snapshot_count: usize,
}

impl RunSummary {
    /// `None` for an empty series
    pub fn from_snapshots(snapshots: &[StatsSnapshot]) -> Option<Self> {
        if snapshots.is_empty() {
            return None;
        }

        let mean_of = |f: fn(&StatsSnapshot) -> f64| -> f64 {
            let values: Vec<f32> = snapshots.iter().map(|s| f(s) as f32).collect();
            Vector::from_slice(&values).mean().unwrap_or(0.0) as f64
        };

        Some(Self {
            avg_response_time: mean_of(|s| s.avg_response_time),
            requests_per_second: mean_of(|s| s.requests_per_second),
            failure_rate: mean_of(|s| s.failure_rate),
            percentile_95: mean_of(|s| s.percentile_95),
            snapshot_count: snapshots.len(),
        })
    }

    pub fn value(&self, metric: SummaryMetric) -> f64 {
        match metric {
            SummaryMetric::AvgResponseTime => self.avg_response_time,
            SummaryMetric::RequestsPerSecond => self.requests_per_second,
            SummaryMetric::FailureRate => self.failure_rate,
            SummaryMetric::Percentile95 => self.percentile_95,
        }
    }
}

/// Headline metric shown in the run comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMetric {
    AvgResponseTime,
    RequestsPerSecond,
    FailureRate,
    Percentile95,
}

impl SummaryMetric {
    pub const ALL: [SummaryMetric; 4] = [
        SummaryMetric::AvgResponseTime,
        SummaryMetric::RequestsPerSecond,
        SummaryMetric::FailureRate,
        SummaryMetric::Percentile95,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SummaryMetric::AvgResponseTime => "Avg Response Time (ms)",
            SummaryMetric::RequestsPerSecond => "RPS",
            SummaryMetric::FailureRate => "Failure Rate (%)",
            SummaryMetric::Percentile95 => "95th Percentile (ms)",
        }
    }

    pub fn lower_is_better(self) -> bool {
        !matches!(self, SummaryMetric::RequestsPerSecond)
    }

    /// (improved, regressed) wording
    fn words(self) -> (&'static str, &'static str) {
        match self {
            SummaryMetric::AvgResponseTime | SummaryMetric::Percentile95 => ("faster", "slower"),
            SummaryMetric::RequestsPerSecond => ("more", "less"),
            SummaryMetric::FailureRate => ("better", "worse"),
        }
    }
}

/// Magnitude and direction of a percent difference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    /// |candidate - baseline| / baseline × 100; infinite when only the baseline is zero
    ///
    /// JSON has no infinity: it is written as `null` and read back as infinite.
    #[serde(with = "percent_or_null")]
    pub percent: f64,
    pub is_improvement: bool,
}

impl MetricDelta {
    pub fn between(baseline: f64, candidate: f64, lower_is_better: bool) -> Self {
        let diff = if baseline == 0.0 {
            if candidate == 0.0 {
                0.0
            } else {
                f64::INFINITY.copysign(candidate)
            }
        } else {
            (candidate - baseline) / baseline * 100.0
        };

        let is_improvement = if lower_is_better {
            diff < 0.0
        } else {
            diff > 0.0
        };

        Self {
            percent: diff.abs(),
            is_improvement,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.percent == 0.0
    }
}

mod percent_or_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// One row of the headline comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryDelta {
    pub metric: SummaryMetric,
    pub baseline: f64,
    pub candidate: f64,
    pub delta: MetricDelta,
}

impl SummaryDelta {
    /// e.g. "12.5% faster", "same", "3.0% worse"
    pub fn describe(&self) -> String {
        let (better, worse) = self.metric.words();
        if self.delta.is_improvement {
            format!("{:.1}% {}", self.delta.percent, better)
        } else if self.delta.is_unchanged() {
            "same".to_string()
        } else {
            format!("{:.1}% {}", self.delta.percent, worse)
        }
    }
}

/// Headline comparison of two runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryComparison {
    pub baseline: RunSummary,
    pub candidate: RunSummary,
    pub deltas: Vec<SummaryDelta>,
}

impl SummaryComparison {
    pub fn new(baseline: RunSummary, candidate: RunSummary) -> Self {
        let deltas = SummaryMetric::ALL
            .iter()
            .map(|&metric| {
                let (b, c) = (baseline.value(metric), candidate.value(metric));
                let delta = if metric == SummaryMetric::FailureRate {
                    MetricDelta::between(
                        floor_zero(b, FAILURE_RATE_FLOOR),
                        floor_zero(c, FAILURE_RATE_FLOOR),
                        metric.lower_is_better(),
                    )
                } else {
                    MetricDelta::between(b, c, metric.lower_is_better())
                };
                SummaryDelta {
                    metric,
                    baseline: b,
                    candidate: c,
                    delta,
                }
            })
            .collect();

        Self {
            baseline,
            candidate,
            deltas,
        }
    }

    /// Both sides present, or nothing to compare
    pub fn from_snapshots(baseline: &[StatsSnapshot], candidate: &[StatsSnapshot]) -> Option<Self> {
        Some(Self::new(
            RunSummary::from_snapshots(baseline)?,
            RunSummary::from_snapshots(candidate)?,
        ))
    }
}

fn floor_zero(value: f64, floor: f64) -> f64 {
    if value == 0.0 {
        floor
    } else {
        value
    }
}
