//! Output Formatting
//!
//! Human-readable terminal output for a finished run: one line per query
//! with the selected median cost and the spread across that query's test
//! executions, then a run summary.

use querybench_core::ExecutionRecord;
use querybench_stats::{total_client_secs, CostSummary};
use std::collections::BTreeMap;

/// Format a finished run for terminal display
///
/// # Arguments
/// * `run_id` - Run the records belong to
/// * `records` - All test-pass execution records
/// * `selected` - The per-query median-by-cost selection
pub fn format_human_output(
    run_id: &str,
    records: &[ExecutionRecord],
    selected: &[ExecutionRecord],
) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("QueryBench Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");
    output.push_str(&format!("Run ID: {}\n\n", run_id));

    // Group the raw test records per query for the spread columns.
    let mut groups: BTreeMap<&str, Vec<&ExecutionRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.statement.name.as_str())
            .or_default()
            .push(record);
    }

    let medians: BTreeMap<&str, &ExecutionRecord> = selected
        .iter()
        .map(|record| (record.statement.name.as_str(), record))
        .collect();

    // Find max query name length for alignment
    let name_width = groups
        .keys()
        .map(|name| name.len())
        .max()
        .unwrap_or(5)
        .max("Query".len());

    output.push_str("Per-query cost, slot-milliseconds:\n");
    output.push_str(&format!(
        "  {:<width$}  {:>10}  {:>10}  {:>10}  {:>10}  {:>5}\n",
        "Query",
        "median",
        "min",
        "max",
        "mean",
        "runs",
        width = name_width
    ));
    output.push_str(&format!("  {}\n", "-".repeat(name_width + 57)));

    for (name, group) in &groups {
        let summary = CostSummary::from_records(group);
        let median = medians
            .get(name)
            .map(|record| record.slot_millis.to_string())
            .unwrap_or_else(|| "-".to_string());

        output.push_str(&format!(
            "  {:<width$}  {:>10}  {:>10}  {:>10}  {:>10.1}  {:>5}\n",
            name,
            median,
            summary.min_slot_millis,
            summary.max_slot_millis,
            summary.mean_slot_millis,
            summary.executions,
            width = name_width
        ));
    }

    // Summary
    output.push_str("\nSummary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Queries: {}  Test executions: {}\n",
        groups.len(),
        records.len()
    ));
    output.push_str(&format!(
        "  Median run total client-time: {:.2}s\n",
        total_client_secs(selected)
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use querybench_core::{RunMode, Statement};

    fn record(name: &str, iteration: u32, slot_millis: u64, duration_ms: u64) -> ExecutionRecord {
        ExecutionRecord {
            statement: Statement::new(name, "SELECT 1"),
            iteration_index: iteration,
            run_mode: RunMode::Test,
            started_at: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            duration_ms,
            job_id: format!("p:US.job-{name}-{iteration}"),
            slot_millis,
        }
    }

    #[test]
    fn test_output_lists_each_query_once() {
        let records = vec![
            record("orders", 1, 100, 50),
            record("orders", 2, 300, 60),
            record("users", 1, 40, 20),
            record("users", 2, 80, 30),
        ];
        let selected = vec![record("orders", 2, 300, 60), record("users", 2, 80, 30)];
        let output = format_human_output("p_20240301_000000", &records, &selected);

        assert!(output.contains("QueryBench Results"));
        assert!(output.contains("Run ID: p_20240301_000000"));
        assert_eq!(output.matches("orders").count(), 1);
        assert_eq!(output.matches("users").count(), 1);
    }

    #[test]
    fn test_summary_totals() {
        let records = vec![record("q", 1, 100, 1500), record("q", 2, 200, 2000)];
        let selected = vec![record("q", 2, 200, 2000)];
        let output = format_human_output("r", &records, &selected);

        assert!(output.contains("Queries: 1  Test executions: 2"));
        assert!(output.contains("Median run total client-time: 2.00s"));
    }

    #[test]
    fn test_median_column_shows_selected_cost() {
        let records = vec![
            record("q", 1, 100, 10),
            record("q", 2, 900, 10),
            record("q", 3, 500, 10),
        ];
        let selected = vec![record("q", 3, 500, 10)];
        let output = format_human_output("r", &records, &selected);

        let line = output.lines().find(|l| l.contains("q ")).unwrap();
        assert!(line.contains("500"));
        assert!(line.contains("900"));
    }
}
