//! Data-fetch contract for comparison inputs
//!
//! The comparison only needs three resources of the results API per run: the run list,
//! per-endpoint statistics and the stats time series. `StatsSource` abstracts where they
//! come from; `DirectorySource` reads an on-disk export laid out like the API paths:
//!
//! ```text
//! <root>/test-runs.json               GET /test-runs
//! <root>/<run_id>/endpoint-stats.json GET /requests/stats/{run_id}/endpoints
//! <root>/<run_id>/stats.json          GET /stats?test_run_id={run_id}
//! <root>/<run_id>/requests.json       GET /requests?test_run_id={run_id}
//! ```
//!
//! Failures are surfaced as-is; nothing is retried.

use crate::model::{aggregate_request_logs, EndpointAggregate, RequestLog, StatsSnapshot, TestRun};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TEST_RUNS_FILE: &str = "test-runs.json";
pub const ENDPOINT_STATS_FILE: &str = "endpoint-stats.json";
pub const SNAPSHOTS_FILE: &str = "stats.json";
pub const REQUESTS_FILE: &str = "requests.json";

/// Errors for loading comparison inputs
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Test run not found: {0}")]
    RunNotFound(String),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid run id: {0:?}")]
    InvalidRunId(String),
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Where comparison inputs come from
pub trait StatsSource {
    /// All known test runs
    fn test_runs(&self) -> Result<Vec<TestRun>>;

    /// Per-endpoint aggregates for one run
    fn endpoint_stats(&self, run_id: &str) -> Result<Vec<EndpointAggregate>>;

    /// Stats time series for one run, oldest first
    fn snapshots(&self, run_id: &str) -> Result<Vec<StatsSnapshot>>;

    /// Completed runs only, in source order
    fn completed_runs(&self) -> Result<Vec<TestRun>> {
        Ok(self
            .test_runs()?
            .into_iter()
            .filter(TestRun::is_completed)
            .collect())
    }
}

/// Reads an on-disk export of the results API
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run_dir(&self, run_id: &str) -> Result<PathBuf> {
        // Run ids become path components; refuse anything that could escape the root
        if run_id.is_empty()
            || run_id == "."
            || run_id == ".."
            || run_id.contains(['/', '\\'])
        {
            return Err(SourceError::InvalidRunId(run_id.to_string()));
        }
        Ok(self.root.join(run_id))
    }
}

impl StatsSource for DirectorySource {
    fn test_runs(&self) -> Result<Vec<TestRun>> {
        read_json(&self.root.join(TEST_RUNS_FILE))
    }

    fn endpoint_stats(&self, run_id: &str) -> Result<Vec<EndpointAggregate>> {
        let dir = self.run_dir(run_id)?;

        let stats_path = dir.join(ENDPOINT_STATS_FILE);
        if stats_path.is_file() {
            return read_json(&stats_path);
        }

        let requests_path = dir.join(REQUESTS_FILE);
        if requests_path.is_file() {
            tracing::info!(
                "No {} for run {}, aggregating {}",
                ENDPOINT_STATS_FILE,
                run_id,
                REQUESTS_FILE
            );
            let logs: Vec<RequestLog> = read_json(&requests_path)?;
            return Ok(aggregate_request_logs(&logs));
        }

        Err(SourceError::RunNotFound(run_id.to_string()))
    }

    fn snapshots(&self, run_id: &str) -> Result<Vec<StatsSnapshot>> {
        let path = self.run_dir(run_id)?.join(SNAPSHOTS_FILE);
        if !path.is_file() {
            tracing::debug!("No snapshots for run {}", run_id);
            return Ok(Vec::new());
        }
        read_json(&path)
    }
}

/// Read a single endpoint-stats JSON array
pub fn load_endpoint_stats<P: AsRef<Path>>(path: P) -> Result<Vec<EndpointAggregate>> {
    read_json(path.as_ref())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
