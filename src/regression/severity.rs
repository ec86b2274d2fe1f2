// Severity classification labels and the two orderings applied to them
//
// The same five values are ordered twice, differently:
// - COMBINATION_PRIORITY decides which per-metric severity becomes the endpoint verdict
// - DISPLAY_ORDER decides where the endpoint lands in the ranked output
//
// Both are explicit lists. MetricSeverity deliberately has no Ord/PartialOrd so the two
// permutations cannot be confused through comparison operators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of comparing one metric (or one endpoint) between baseline and candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricSeverity {
    /// Significant change beyond the critical threshold in the bad direction
    Critical,
    /// Significant change beyond the warning threshold in the bad direction
    Warning,
    /// Significant change within thresholds, or no meaningful baseline
    None,
    /// Not enough samples, or change indistinguishable from noise
    Insignificant,
    /// Significant change beyond the warning threshold in the good direction
    Improvement,
}

/// Priority used to fold per-metric severities into one endpoint severity
pub const COMBINATION_PRIORITY: [MetricSeverity; 5] = [
    MetricSeverity::Critical,
    MetricSeverity::Warning,
    MetricSeverity::Insignificant,
    MetricSeverity::Improvement,
    MetricSeverity::None,
];

/// Ranking used to sort endpoints, worst first
pub const DISPLAY_ORDER: [MetricSeverity; 5] = [
    MetricSeverity::Critical,
    MetricSeverity::Warning,
    MetricSeverity::None,
    MetricSeverity::Insignificant,
    MetricSeverity::Improvement,
];

impl MetricSeverity {
    /// Position in [`DISPLAY_ORDER`] (0 = shown first)
    pub fn display_rank(self) -> usize {
        DISPLAY_ORDER
            .iter()
            .position(|s| *s == self)
            .unwrap_or(DISPLAY_ORDER.len())
    }

    /// Badge text, `None` when no badge is shown
    pub fn badge_label(self) -> Option<&'static str> {
        match self {
            MetricSeverity::Critical => Some("Critical"),
            MetricSeverity::Warning => Some("Warning"),
            MetricSeverity::Improvement => Some("Improved"),
            MetricSeverity::Insignificant => Some("Not Significant"),
            MetricSeverity::None => None,
        }
    }

    /// Badge icon paired with [`badge_label`](Self::badge_label)
    pub fn badge_icon(self) -> Option<&'static str> {
        match self {
            MetricSeverity::Critical => Some("❌"),
            MetricSeverity::Warning => Some("⚠️"),
            MetricSeverity::Improvement => Some("✅"),
            MetricSeverity::Insignificant => Some("➖"),
            MetricSeverity::None => None,
        }
    }

    /// Whether this severity marks a regression (warning or critical)
    pub fn is_regression(self) -> bool {
        matches!(self, MetricSeverity::Critical | MetricSeverity::Warning)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetricSeverity::Critical => "critical",
            MetricSeverity::Warning => "warning",
            MetricSeverity::None => "none",
            MetricSeverity::Insignificant => "insignificant",
            MetricSeverity::Improvement => "improvement",
        }
    }
}

impl fmt::Display for MetricSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fold per-metric severities into one verdict by scanning [`COMBINATION_PRIORITY`]
///
/// The first priority entry present among `severities` wins. An empty slice yields
/// [`MetricSeverity::None`].
pub fn combine_severities(severities: &[MetricSeverity]) -> MetricSeverity {
    for candidate in COMBINATION_PRIORITY {
        if severities.contains(&candidate) {
            return candidate;
        }
    }
    MetricSeverity::None
}
