// Regression policy: sample-size gate, significance level, per-metric thresholds
//
// The constants below are the fixed policy. RegressionConfig::default() is built from
// them and is what compare_endpoints() uses; a TOML file may override individual
// fields for ad-hoc analysis through compare_endpoints_with().

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Minimum observations per side before significance testing is attempted
pub const MIN_SAMPLE_SIZE: u64 = 30;

/// p-values strictly below this are significant
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Response time thresholds (% change)
pub const RESPONSE_TIME_THRESHOLDS: Thresholds = Thresholds {
    warning: 10.0,
    critical: 25.0,
};

/// Failure rate thresholds (% change of the rate itself, not percentage points)
pub const FAILURE_RATE_THRESHOLDS: Thresholds = Thresholds {
    warning: 5.0,
    critical: 15.0,
};

/// Request count thresholds (% change)
pub const REQUEST_COUNT_THRESHOLDS: Thresholds = Thresholds {
    warning: 10.0,
    critical: 25.0,
};

/// Percentage-change thresholds for one metric
///
/// Both values are magnitudes; the direction that counts as a regression is decided by
/// the metric kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub warning: f64,
    pub critical: f64,
}

impl Thresholds {
    fn validate(&self, metric: &str) -> Result<(), String> {
        if !(self.warning >= 0.0 && self.critical >= 0.0) {
            return Err(format!(
                "{metric} thresholds must be non-negative, got warning={} critical={}",
                self.warning, self.critical
            ));
        }

        if self.warning > self.critical {
            return Err(format!(
                "{metric} warning threshold ({}) must not exceed critical threshold ({})",
                self.warning, self.critical
            ));
        }

        Ok(())
    }
}

/// Configuration for endpoint regression detection
///
/// # Example
/// ```
/// use runcompare::regression::RegressionConfig;
///
/// let config = RegressionConfig::default();
/// assert_eq!(config.significance_level, 0.05); // 95% confidence
/// assert_eq!(config.min_sample_size, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionConfig {
    /// Statistical significance level (alpha) for the Welch test
    ///
    /// - 0.05 (default): 95% confidence level
    /// - 0.01: stricter, fewer false positives
    pub significance_level: f64,

    /// Minimum observations per side
    ///
    /// Below this the metric is reported as insignificant no matter how large the
    /// observed change is. The gate runs before the t-test.
    pub min_sample_size: u64,

    /// Mean response time, lower is better
    pub response_time: Thresholds,

    /// Failure rate, lower is better
    pub failure_rate: Thresholds,

    /// Total request count, higher is better
    pub request_count: Thresholds,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            significance_level: SIGNIFICANCE_LEVEL,
            min_sample_size: MIN_SAMPLE_SIZE,
            response_time: RESPONSE_TIME_THRESHOLDS,
            failure_rate: FAILURE_RATE_THRESHOLDS,
            request_count: REQUEST_COUNT_THRESHOLDS,
        }
    }
}

impl RegressionConfig {
    /// Load a policy override from a TOML file
    ///
    /// Missing keys keep their default value. The result is validated.
    ///
    /// ```toml
    /// significance_level = 0.01
    ///
    /// [response_time]
    /// warning = 5.0
    /// critical = 20.0
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Parse and validate a policy override from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.significance_level > 0.0 && self.significance_level <= 1.0) {
            return Err(format!(
                "significance_level must be in (0, 1], got {}",
                self.significance_level
            ));
        }

        if self.min_sample_size < 2 {
            return Err(format!(
                "min_sample_size must be >= 2 for t-test, got {}",
                self.min_sample_size
            ));
        }

        self.response_time.validate("response_time")?;
        self.failure_rate.validate("failure_rate")?;
        self.request_count.validate("request_count")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegressionConfig::default();
        assert_eq!(config.significance_level, 0.05);
        assert_eq!(config.min_sample_size, 30);
        assert_eq!(config.response_time.warning, 10.0);
        assert_eq!(config.response_time.critical, 25.0);
        assert_eq!(config.failure_rate.warning, 5.0);
        assert_eq!(config.failure_rate.critical, 15.0);
        assert_eq!(config.request_count.warning, 10.0);
        assert_eq!(config.request_count.critical, 25.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            significance_level = 0.01

            [failure_rate]
            warning = 2.0
            critical = 8.0
        "#;

        let config = RegressionConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.significance_level, 0.01);
        assert_eq!(config.min_sample_size, MIN_SAMPLE_SIZE);
        assert_eq!(config.failure_rate.warning, 2.0);
        assert_eq!(config.failure_rate.critical, 8.0);
        assert_eq!(config.response_time, RESPONSE_TIME_THRESHOLDS);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = RegressionConfig::from_toml_str("").unwrap();
        assert_eq!(config, RegressionConfig::default());
    }

    #[test]
    fn test_toml_rejects_invalid_values() {
        let toml = r#"
            [request_count]
            warning = 30.0
            critical = 20.0
        "#;
        let err = RegressionConfig::from_toml_str(toml).unwrap_err();
        assert!(format!("{err:#}").contains("request_count"));
    }

    #[test]
    fn test_toml_rejects_garbage() {
        assert!(RegressionConfig::from_toml_str("significance_level = [").is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_significance_level() {
        let mut config = RegressionConfig::default();
        config.significance_level = 1.5;
        assert!(config.validate().is_err());

        config.significance_level = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_min_sample_size() {
        let mut config = RegressionConfig::default();
        config.min_sample_size = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_negative_threshold() {
        let mut config = RegressionConfig::default();
        config.response_time.warning = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("policy.toml");
        fs::write(&path, "min_sample_size = 10\n").unwrap();

        let config = RegressionConfig::from_file(&path).unwrap();
        assert_eq!(config.min_sample_size, 10);
    }

    #[test]
    fn test_from_missing_file() {
        assert!(RegressionConfig::from_file("/nonexistent/policy.toml").is_err());
    }
}
