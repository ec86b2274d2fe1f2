//! CLI argument parsing for runcompare

use crate::regression::MetricSeverity;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for comparison reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

/// Overall severity that makes the process exit non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    /// Always exit 0 when the comparison succeeds
    Never,
    /// Exit 1 on any warning or critical endpoint
    Warning,
    /// Exit 1 on any critical endpoint
    Critical,
}

impl FailOn {
    pub fn is_triggered_by(self, severity: MetricSeverity) -> bool {
        match self {
            FailOn::Never => false,
            FailOn::Warning => severity.is_regression(),
            FailOn::Critical => severity == MetricSeverity::Critical,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "runcompare")]
#[command(version)]
#[command(about = "Statistical regression detection between two load-test runs", long_about = None)]
pub struct Cli {
    /// Results export directory; BASELINE and CANDIDATE are then run ids
    #[arg(short = 'd', long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// List completed runs in --data-dir and exit
    #[arg(long = "list-runs", requires = "data_dir")]
    pub list_runs: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file overriding the regression policy
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only compare endpoints whose "METHOD endpoint" matches this regex
    #[arg(short = 'e', long = "filter", value_name = "REGEX")]
    pub filter: Option<String>,

    /// Exit with status 1 when an endpoint reaches this severity
    #[arg(long = "fail-on", value_enum, default_value = "never")]
    pub fail_on: FailOn,

    /// Enable debug tracing on stderr
    #[arg(long = "debug")]
    pub debug: bool,

    /// Baseline endpoint-stats JSON file (or run id with --data-dir)
    #[arg(value_name = "BASELINE", required_unless_present = "list_runs")]
    pub baseline: Option<String>,

    /// Candidate endpoint-stats JSON file (or run id with --data-dir)
    #[arg(value_name = "CANDIDATE", required_unless_present = "list_runs")]
    pub candidate: Option<String>,
}
