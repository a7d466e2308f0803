#![warn(missing_docs)]
//! QueryBench CLI Library
//!
//! Command-line front end for the benchmark harness. `run()` parses
//! arguments, loads the query corpus, drives the warmup/test protocol
//! against the warehouse and exports the aggregated report.
//!
//! # Example
//!
//! ```ignore
//! fn main() {
//!     if let Err(e) = querybench_cli::run() {
//!         eprintln!("Error: {e:#}");
//!         std::process::exit(1);
//!     }
//! }
//! ```

mod config;
mod executor;

pub use config::*;
pub use executor::{format_human_output, ExecutionConfig, Executor};

use anyhow::Context;
use clap::Parser;
use querybench_client::{SheetsClient, WarehouseClient, WarehouseConfig};
use querybench_core::{load_statements, ExecutionRecord, QueryOptions, RunId, Statement};
use querybench_report::{
    record_row, CsvSink, Row, SpreadsheetApi, SpreadsheetError, SpreadsheetSink, TabularSink,
    RAW_REPORT_FILE,
};
use querybench_stats::{select_median_by_cost, total_client_secs};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable carrying the pre-acquired bearer token
pub const TOKEN_ENV: &str = "QUERYBENCH_TOKEN";

/// QueryBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "querybench")]
#[command(author, version, about = "QueryBench - SQL query benchmarking harness")]
pub struct Cli {
    /// Project id the benchmark jobs run in
    #[arg(long, alias = "project_id")]
    pub project_id: String,

    /// Directory of .sql query files, executed in file-name order
    #[arg(long, alias = "query_dir")]
    pub query_dir: PathBuf,

    /// Dataset used to resolve unqualified table names in the queries
    #[arg(long, alias = "default_dataset")]
    pub default_dataset: Option<String>,

    /// Run a discarded warmup pass before measuring (default: true)
    /// Use --warmup=false to measure cold
    #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
    pub warmup: bool,

    /// Number of measured test iterations
    #[arg(long, alias = "test_iters", default_value = "5")]
    pub test_iters: u32,

    /// Only run queries whose name matches this regex
    #[arg(long)]
    pub filter: Option<String>,

    /// Dry run - list the selected queries without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Also write the raw test execution log next to the report
    #[arg(long)]
    pub export_raw: bool,

    /// Publish the aggregated report to a hosted spreadsheet (default: true)
    /// Use --sheet=false to keep the run file-only
    #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
    pub sheet: bool,

    /// Directory run report directories are created under
    #[arg(long, default_value = "./reports")]
    pub reports_dir: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the QueryBench CLI with the given arguments.
/// This is the main entry point for the `querybench` binary.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the QueryBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("querybench=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("querybench=info")
            .init();
    }

    // Discover querybench.toml configuration (CLI flags override)
    let config = QueryBenchConfig::discover()?.unwrap_or_default();
    let settings = resolve_settings(&cli, &config);

    tracing::info!("Starting benchmark-queries...");
    run_benchmark(&cli, &settings)?;
    tracing::info!("Finished.");
    Ok(())
}

/// Effective settings after layering built-in defaults, querybench.toml
/// and CLI flags.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Run a discarded warmup pass
    pub warmup: bool,
    /// Number of measured test iterations
    pub test_iters: u32,
    /// Warehouse REST endpoint
    pub backend_endpoint: String,
    /// Delay between job completion polls
    pub poll_interval: Duration,
    /// Spreadsheet REST endpoint
    pub sheets_endpoint: String,
    /// Publish to the hosted spreadsheet
    pub sheet_export: bool,
    /// Directory run report directories are created under
    pub reports_dir: PathBuf,
}

/// Layer configuration: querybench.toml values apply where CLI flags sit
/// at their clap defaults; explicitly passed flags win.
pub fn resolve_settings(cli: &Cli, config: &QueryBenchConfig) -> RunSettings {
    // clap defaults are warmup=true, test_iters=5, sheet=true,
    // reports_dir=./reports. If the CLI value differs from clap's default,
    // the user explicitly set it and it wins; otherwise the config file
    // value applies.
    let warmup = if !cli.warmup { false } else { config.runner.warmup };
    let test_iters = if cli.test_iters != 5 {
        cli.test_iters
    } else {
        config.runner.test_iters
    };
    let sheet_export = if !cli.sheet { false } else { config.sheets.export };
    let reports_dir = if cli.reports_dir != Path::new("./reports") {
        cli.reports_dir.clone()
    } else {
        PathBuf::from(&config.output.reports_dir)
    };

    RunSettings {
        warmup,
        test_iters,
        backend_endpoint: config.backend.endpoint.clone(),
        poll_interval: Duration::from_millis(config.backend.poll_interval_ms),
        sheets_endpoint: config.sheets.endpoint.clone(),
        sheet_export,
        reports_dir,
    }
}

fn run_benchmark(cli: &Cli, settings: &RunSettings) -> anyhow::Result<()> {
    tracing::info!(
        "test project id: '{}'; default dataset: '{}'; query directory: '{}';",
        cli.project_id,
        cli.default_dataset.as_deref().unwrap_or(""),
        cli.query_dir.display()
    );

    let statements = load_statements(&cli.query_dir)
        .with_context(|| format!("loading queries from {}", cli.query_dir.display()))?;
    let statements = filter_statements(statements, cli.filter.as_deref())?;

    if cli.dry_run {
        list_statements(&statements);
        return Ok(());
    }
    if statements.is_empty() {
        println!("No queries found.");
        return Ok(());
    }

    let token = std::env::var(TOKEN_ENV)
        .with_context(|| format!("{TOKEN_ENV} must hold the bearer token for the warehouse"))?;

    let run_id = RunId::generate(&cli.project_id);
    let backend = WarehouseClient::new(WarehouseConfig {
        endpoint: settings.backend_endpoint.clone(),
        project_id: cli.project_id.clone(),
        token: token.clone(),
        poll_interval: settings.poll_interval,
    })?;
    let options = QueryOptions {
        default_dataset: cli.default_dataset.clone(),
    };
    let exec_config = ExecutionConfig {
        warmup: settings.warmup,
        test_iters: settings.test_iters,
    };

    let executor = Executor::new(backend, options, run_id.clone());
    let records = executor.execute(&statements, &exec_config)?;

    let selected = select_median_by_cost(&records);
    tracing::info!(
        "Median run total client-time: {:.2}s",
        total_client_secs(&selected)
    );
    tracing::info!("Run ID: {}", run_id);

    let csv_sink = CsvSink::new(&settings.reports_dir, run_id.as_str());
    let sheet_sink = if settings.sheet_export {
        hosted_sink(
            SheetsClient::new(&settings.sheets_endpoint, &token),
            run_id.as_str(),
        )
    } else {
        None
    };
    export_reports(
        &csv_sink,
        sheet_sink.as_ref(),
        &records,
        &selected,
        cli.export_raw,
    )?;

    print!(
        "{}",
        format_human_output(run_id.as_str(), &records, &selected)
    );
    Ok(())
}

/// Select statements by name with an optional regex, preserving corpus
/// order. A filter matching nothing is a configuration error.
fn filter_statements(
    statements: Vec<Statement>,
    filter: Option<&str>,
) -> anyhow::Result<Vec<Statement>> {
    let Some(pattern) = filter else {
        return Ok(statements);
    };
    let re =
        Regex::new(pattern).with_context(|| format!("invalid --filter regex '{pattern}'"))?;
    let selected: Vec<Statement> = statements
        .into_iter()
        .filter(|statement| re.is_match(&statement.name))
        .collect();
    if selected.is_empty() {
        anyhow::bail!("--filter '{pattern}' matched no queries");
    }
    Ok(selected)
}

fn list_statements(statements: &[Statement]) {
    println!("QueryBench Plan:");
    for statement in statements {
        println!("├── {}", statement.name);
    }
    println!("{} queries found.", statements.len());
}

/// Wrap spreadsheet client construction in the same best-effort envelope
/// as the export itself: a client that cannot be built is logged and the
/// run continues file-only.
fn hosted_sink<A: SpreadsheetApi>(
    client: Result<A, SpreadsheetError>,
    run_id: &str,
) -> Option<SpreadsheetSink<A>> {
    match client {
        Ok(api) => Some(SpreadsheetSink::new(api, run_id)),
        Err(e) => {
            tracing::warn!("Failed to export to Google Sheet: {}", e);
            None
        }
    }
}

/// Export the aggregated report to the configured sinks.
///
/// The CSV file is the artifact of record; any failure there fails the
/// run. The hosted spreadsheet is best-effort: a failure is logged and
/// disturbs neither the file artifact nor the exit status.
fn export_reports<S: TabularSink>(
    csv_sink: &CsvSink,
    sheet_sink: Option<&S>,
    records: &[ExecutionRecord],
    selected: &[ExecutionRecord],
    export_raw: bool,
) -> anyhow::Result<()> {
    let report_rows: Vec<Row> = selected.iter().map(|r| record_row(r, false)).collect();
    csv_sink.export(&report_rows)?;

    if export_raw {
        let raw_rows: Vec<Row> = records.iter().map(|r| record_row(r, false)).collect();
        csv_sink.write_named(RAW_REPORT_FILE, &raw_rows)?;
    }

    if let Some(sink) = sheet_sink {
        let sheet_rows: Vec<Row> = selected.iter().map(|r| record_row(r, true)).collect();
        if let Err(e) = sink.export(&sheet_rows) {
            tracing::warn!("Failed to export to Google Sheet: {}", e);
        }
    }

    Ok(())
}
