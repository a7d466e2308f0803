#![warn(missing_docs)]
//! QueryBench Aggregation
//!
//! Turns the raw test-pass execution log into the reported signal:
//! - Median-by-cost selection, the benchmark's primary metric
//! - Cost spread summaries for the human-readable output

mod median;
mod summary;

pub use median::select_median_by_cost;
pub use summary::{total_client_secs, CostSummary};
