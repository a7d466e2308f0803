//! Benchmark Executor
//!
//! Runs the query corpus through the warmup/test protocol and collects
//! execution records.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Statement (loaded from the query corpus)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Warmup pass (discarded), then N test iterations
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ aggregation │  Median-by-cost selection (querybench-stats)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │    sinks    │  CSV report + hosted spreadsheet (querybench-report)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable summary
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Tagging, measurement and the pass loop
//! - [`formatting`] - Human-readable output formatting

mod execution;
mod formatting;

// Re-export public API
pub use execution::{ExecutionConfig, Executor};
pub use formatting::format_human_output;
