#![warn(missing_docs)]
//! # QueryBench
//!
//! Benchmark harness for SQL query workloads: run a fixed corpus of queries
//! against a warehouse under a warmup/test protocol and report one stable
//! cost figure per query.
//!
//! - **Deterministic corpus**: queries load from a directory of `.sql` files
//!   and always execute in name order
//! - **Warmup/test protocol**: one discarded warmup pass, then N measured
//!   test iterations (default 5)
//! - **Traceable executions**: every statement carries an identification tag
//!   that shows up in the warehouse's own job logs
//! - **Median-by-cost**: the figure reported per query is an actual execution,
//!   the one whose server-reported slot time sits at the median
//! - **Interchangeable sinks**: CSV file report plus best-effort hosted
//!   spreadsheet export
//!
//! ## Quick Start
//!
//! ```ignore
//! fn main() {
//!     if let Err(e) = querybench::run() {
//!         eprintln!("Error: {e:#}");
//!         std::process::exit(1);
//!     }
//! }
//! ```

// Re-export core types
pub use querybench_core::{
    load_statements, plan_executions, tag_statement, BackendError, CorpusError, ExecutionDraft,
    ExecutionOutcome, ExecutionRecord, QueryBackend, QueryOptions, RunId, RunMode, Statement,
};

// Re-export aggregation
pub use querybench_stats::{select_median_by_cost, total_client_secs, CostSummary};

// Re-export report sinks
pub use querybench_report::{
    record_row, CsvSink, Row, SinkError, SpreadsheetApi, SpreadsheetError, SpreadsheetHandle,
    SpreadsheetSink, TabularSink, RAW_REPORT_FILE, REPORT_FILE, WORKSHEET_TITLE,
};

// Re-export remote clients
pub use querybench_client::{SheetsClient, WarehouseClient, WarehouseConfig};

// Re-export the executor
pub use querybench_cli::{format_human_output, ExecutionConfig, Executor};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        load_statements, select_median_by_cost, ExecutionConfig, Executor, QueryBackend,
        QueryOptions, RunId, RunMode, Statement, TabularSink,
    };
}

/// Run the QueryBench CLI harness.
///
/// Call this from your binary's `main()`:
/// ```ignore
/// fn main() {
///     if let Err(e) = querybench::run() {
///         eprintln!("Error: {e:#}");
///         std::process::exit(1);
///     }
/// }
/// ```
pub use querybench_cli::run;
