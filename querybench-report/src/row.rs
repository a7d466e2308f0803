//! Named Rows
//!
//! `Row` is the projection every sink consumes: an ordered list of
//! (field name, value) pairs. The field list doubles as the header, so
//! all rows of one export must share the same shape.

use querybench_core::ExecutionRecord;

/// An ordered set of named string fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Field names in row order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Field values in row order.
    pub fn values(&self) -> Vec<&str> {
        self.fields.iter().map(|(_, value)| value.as_str()).collect()
    }

    /// Look up a field's value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Project an execution record into its report row.
///
/// Field order is fixed: `query`, `start_time`, `total_slot_millis`,
/// `job_id`, then `sql` when `include_sql` is set. The spreadsheet export
/// includes the SQL; the CSV report leaves it out to keep the files
/// diffable.
pub fn record_row(record: &ExecutionRecord, include_sql: bool) -> Row {
    let mut row = Row::new();
    row.push("query", record.statement.name.clone());
    row.push("start_time", record.started_at.to_rfc3339());
    row.push("total_slot_millis", record.slot_millis.to_string());
    row.push("job_id", record.job_id.clone());
    if include_sql {
        row.push("sql", record.statement.sql.clone());
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use querybench_core::{RunMode, Statement};

    fn record() -> ExecutionRecord {
        ExecutionRecord {
            statement: Statement::new("daily", "SELECT 1"),
            iteration_index: 4,
            run_mode: RunMode::Test,
            started_at: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 13, 5, 9).unwrap(),
            duration_ms: 742,
            job_id: "p:US.job-9".to_string(),
            slot_millis: 18_250,
        }
    }

    #[test]
    fn test_record_row_field_order() {
        let row = record_row(&record(), false);
        assert_eq!(
            row.field_names(),
            ["query", "start_time", "total_slot_millis", "job_id"]
        );
        assert_eq!(row.get("query"), Some("daily"));
        assert_eq!(row.get("total_slot_millis"), Some("18250"));
        assert_eq!(row.get("job_id"), Some("p:US.job-9"));
    }

    #[test]
    fn test_start_time_is_rfc3339() {
        let row = record_row(&record(), false);
        assert_eq!(row.get("start_time"), Some("2024-03-01T13:05:09+00:00"));
    }

    #[test]
    fn test_sql_field_appended_last_when_requested() {
        let row = record_row(&record(), true);
        assert_eq!(row.field_names().last(), Some(&"sql"));
        assert_eq!(row.get("sql"), Some("SELECT 1"));
    }

    #[test]
    fn test_get_missing_field() {
        let row = record_row(&record(), false);
        assert_eq!(row.get("sql"), None);
    }
}
