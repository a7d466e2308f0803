//! Cost Summaries
//!
//! Small helpers behind the human-readable output: per-query cost spread
//! across the test executions, and the total client time of a selected
//! set of records.

use querybench_core::ExecutionRecord;

/// Cost spread of one query's executions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostSummary {
    /// Lowest observed cost in slot-milliseconds
    pub min_slot_millis: u64,
    /// Highest observed cost in slot-milliseconds
    pub max_slot_millis: u64,
    /// Mean cost in slot-milliseconds
    pub mean_slot_millis: f64,
    /// Number of executions summarized
    pub executions: usize,
}

impl CostSummary {
    /// Summarize a group of executions. An empty group yields the zeroed
    /// summary.
    pub fn from_records(records: &[&ExecutionRecord]) -> CostSummary {
        if records.is_empty() {
            return CostSummary::default();
        }

        let costs: Vec<u64> = records.iter().map(|r| r.slot_millis).collect();
        let min_slot_millis = *costs.iter().min().unwrap_or(&0);
        let max_slot_millis = *costs.iter().max().unwrap_or(&0);
        let mean_slot_millis = costs.iter().sum::<u64>() as f64 / costs.len() as f64;

        CostSummary {
            min_slot_millis,
            max_slot_millis,
            mean_slot_millis,
            executions: costs.len(),
        }
    }
}

/// Total client-observed time of `records`, in seconds.
pub fn total_client_secs(records: &[ExecutionRecord]) -> f64 {
    records.iter().map(|r| r.duration_ms).sum::<u64>() as f64 / 1000.0
}
