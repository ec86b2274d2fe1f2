//! Runcompare - statistical regression detection between two load-test runs
//!
//! Given per-endpoint aggregate statistics for a baseline and a candidate run, the
//! [`regression`] engine decides per endpoint and per metric whether a change is a
//! regression, an improvement or noise, and ranks endpoints worst first. The remaining
//! modules load inputs, summarize whole runs and render reports.

pub mod cli;
pub mod csv_output;
pub mod json_output;
pub mod model;
pub mod regression;
pub mod report;
pub mod source;
pub mod summary;
