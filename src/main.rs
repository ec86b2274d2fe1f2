use anyhow::{Context, Result};
use clap::Parser;
use regex::Regex;
use runcompare::cli::{Cli, OutputFormat};
use runcompare::csv_output::CsvOutput;
use runcompare::json_output::JsonOutput;
use runcompare::model::EndpointAggregate;
use runcompare::regression::{compare_endpoints_with, EndpointComparison, RegressionConfig};
use runcompare::report;
use runcompare::source::{self, DirectorySource, StatsSource};
use runcompare::summary::SummaryComparison;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Comparison inputs resolved from files or a results export
struct Inputs {
    baseline: Vec<EndpointAggregate>,
    candidate: Vec<EndpointAggregate>,
    summary: Option<SummaryComparison>,
}

fn load_inputs(args: &Cli, baseline: &str, candidate: &str) -> Result<Inputs> {
    match &args.data_dir {
        Some(dir) => {
            let source = DirectorySource::new(dir);
            let inputs = Inputs {
                baseline: source
                    .endpoint_stats(baseline)
                    .context("Failed to load baseline run")?,
                candidate: source
                    .endpoint_stats(candidate)
                    .context("Failed to load candidate run")?,
                summary: SummaryComparison::from_snapshots(
                    &source.snapshots(baseline)?,
                    &source.snapshots(candidate)?,
                ),
            };
            Ok(inputs)
        }
        None => Ok(Inputs {
            baseline: source::load_endpoint_stats(baseline)
                .context("Failed to load baseline endpoint stats")?,
            candidate: source::load_endpoint_stats(candidate)
                .context("Failed to load candidate endpoint stats")?,
            summary: None,
        }),
    }
}

/// Print completed runs from the export directory
fn list_runs(source: &DirectorySource) -> Result<()> {
    let runs = source.completed_runs().context("Failed to list test runs")?;
    if runs.is_empty() {
        eprintln!("No completed test runs in {}", source.root().display());
        return Ok(());
    }
    for run in runs {
        println!(
            "{}\t{}\t{}\t{}",
            run.id, run.test_name, run.project, run.start_time
        );
    }
    Ok(())
}

fn apply_filter(results: &mut Vec<EndpointComparison>, expr: &str) -> Result<()> {
    let re = Regex::new(expr).with_context(|| format!("Invalid --filter regex: {}", expr))?;
    results.retain(|r| re.is_match(&r.key().to_key_string()));
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    if args.list_runs {
        if let Some(dir) = &args.data_dir {
            return list_runs(&DirectorySource::new(dir));
        }
    }

    let (Some(baseline), Some(candidate)) = (args.baseline.as_deref(), args.candidate.as_deref())
    else {
        anyhow::bail!("Must specify BASELINE and CANDIDATE. Usage: runcompare BASELINE CANDIDATE");
    };

    let config = match &args.config {
        Some(path) => RegressionConfig::from_file(path)?,
        None => RegressionConfig::default(),
    };

    let inputs = load_inputs(&args, baseline, candidate)?;
    tracing::info!(
        baseline_endpoints = inputs.baseline.len(),
        candidate_endpoints = inputs.candidate.len(),
        "comparing runs"
    );

    let mut results = compare_endpoints_with(&inputs.baseline, &inputs.candidate, &config);
    if let Some(expr) = &args.filter {
        apply_filter(&mut results, expr)?;
    }

    match args.format {
        OutputFormat::Text => print!(
            "{}",
            report::to_report_string(baseline, candidate, &results, inputs.summary.as_ref())
        ),
        OutputFormat::Json => {
            let output = JsonOutput::new(baseline, candidate, &results, inputs.summary);
            println!("{}", output.to_json()?);
        }
        OutputFormat::Csv => print!("{}", CsvOutput::from_comparisons(&results).to_csv()),
    }

    if results
        .iter()
        .any(|r| args.fail_on.is_triggered_by(r.overall_severity))
    {
        tracing::info!("failing on {:?}", args.fail_on);
        std::process::exit(1);
    }

    Ok(())
}
