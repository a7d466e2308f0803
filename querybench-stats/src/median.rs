//! Median Selection
//!
//! The reported figure for each query is not a synthetic average but an
//! actual execution: the one whose server-reported cost sits at the median
//! of that query's test executions. Slot time is the selection key because
//! it is unaffected by client and network jitter.

use querybench_core::ExecutionRecord;
use std::collections::BTreeMap;

/// Select the median-cost execution for every distinct statement.
///
/// Executions are grouped by statement name; each group is sorted by
/// `slot_millis` (stable, so equal costs keep generation order) and the
/// record at index `len / 2` is taken. For even-sized groups that is the
/// upper median. The result is ordered by statement name.
pub fn select_median_by_cost(records: &[ExecutionRecord]) -> Vec<ExecutionRecord> {
    let mut by_name: BTreeMap<&str, Vec<&ExecutionRecord>> = BTreeMap::new();
    for record in records {
        by_name
            .entry(record.statement.name.as_str())
            .or_default()
            .push(record);
    }

    by_name
        .into_values()
        .map(|mut group| {
            group.sort_by_key(|record| record.slot_millis);
            group[group.len() / 2].clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use querybench_core::{RunMode, Statement};

    fn record(name: &str, iteration: u32, slot_millis: u64) -> ExecutionRecord {
        ExecutionRecord {
            statement: Statement::new(name, format!("SELECT '{name}'")),
            iteration_index: iteration,
            run_mode: RunMode::Test,
            started_at: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            duration_ms: slot_millis / 10,
            job_id: format!("p:US.job-{name}-{iteration}"),
            slot_millis,
        }
    }

    #[test]
    fn test_odd_group_picks_middle_cost() {
        let records = vec![record("q", 1, 300), record("q", 2, 100), record("q", 3, 200)];
        let selected = select_median_by_cost(&records);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].slot_millis, 200);
    }

    #[test]
    fn test_even_group_picks_upper_median() {
        let records = vec![record("q", 1, 100), record("q", 2, 200)];
        let selected = select_median_by_cost(&records);
        assert_eq!(selected[0].slot_millis, 200);
    }

    #[test]
    fn test_single_execution_selected_as_is() {
        let records = vec![record("q", 1, 512)];
        let selected = select_median_by_cost(&records);
        assert_eq!(selected[0].job_id, "p:US.job-q-1");
    }

    #[test]
    fn test_output_ordered_by_statement_name() {
        let records = vec![
            record("zeta", 1, 10),
            record("alpha", 1, 20),
            record("mid", 1, 30),
        ];
        let names: Vec<_> = select_median_by_cost(&records)
            .into_iter()
            .map(|r| r.statement.name)
            .collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_selection_is_idempotent() {
        let records = vec![
            record("a", 1, 100),
            record("a", 2, 300),
            record("a", 3, 200),
            record("b", 1, 50),
            record("b", 2, 60),
        ];
        let once = select_median_by_cost(&records);
        let twice = select_median_by_cost(&once);
        let costs = |rs: &[ExecutionRecord]| {
            rs.iter().map(|r| r.slot_millis).collect::<Vec<_>>()
        };
        assert_eq!(costs(&once), costs(&twice));
    }

    #[test]
    fn test_equal_costs_keep_generation_order() {
        // Stable sort: with every cost equal, index len/2 lands on the
        // middle iteration as generated.
        let records = vec![record("q", 1, 100), record("q", 2, 100), record("q", 3, 100)];
        let selected = select_median_by_cost(&records);
        assert_eq!(selected[0].iteration_index, 2);
    }

    #[test]
    fn test_empty_input_yields_empty_selection() {
        assert!(select_median_by_cost(&[]).is_empty());
    }
}
