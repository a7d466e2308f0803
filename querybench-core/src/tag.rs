//! Execution Identification Tagging
//!
//! Every executed statement is prefixed with a single comment line carrying
//! the run id, run mode, iteration and query name. The tag travels with the
//! job into the warehouse's logs, which is what lets a server-side entry be
//! traced back to its exact position in a benchmark run.

use crate::RunMode;

/// Prefix `sql` with the identification comment for one execution.
///
/// The result is the comment line, a newline, then the original SQL
/// unchanged; dropping the first line recovers the input exactly.
pub fn tag_statement(
    run_id: &str,
    sql: &str,
    query_name: &str,
    iteration_index: u32,
    run_mode: RunMode,
) -> String {
    format!(
        "/* run_id={run_id}, run_mode={run_mode}, iter={iteration_index}, query={query_name} */\n{sql}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_format() {
        let tagged = tag_statement("proj_20240301_130509", "SELECT 1", "daily", 3, RunMode::Test);
        assert_eq!(
            tagged,
            "/* run_id=proj_20240301_130509, run_mode=test, iter=3, query=daily */\nSELECT 1"
        );
    }

    #[test]
    fn test_warmup_mode_spelled_out() {
        let tagged = tag_statement("r", "SELECT 1", "q", 1, RunMode::Warmup);
        assert!(tagged.starts_with("/* run_id=r, run_mode=warmup, iter=1, query=q */"));
    }

    #[test]
    fn test_sql_recoverable_after_first_line() {
        let sql = "SELECT *\nFROM sales\nWHERE region = 'emea'";
        let tagged = tag_statement("r", sql, "q", 1, RunMode::Test);
        let (_, rest) = tagged.split_once('\n').unwrap();
        assert_eq!(rest, sql);
    }
}
