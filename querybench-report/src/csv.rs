//! CSV File Sink
//!
//! Writes the aggregated report as `query_executions.csv` under
//! `<reports_root>/<run_id>/`. The header comes from the first row's
//! field names. An empty row set writes nothing at all, not even the run
//! directory.

use crate::{Row, SinkError, TabularSink};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the aggregated execution report
pub const REPORT_FILE: &str = "query_executions.csv";

/// File name of the optional raw execution log
pub const RAW_REPORT_FILE: &str = "query_executions_raw.csv";

/// CSV sink rooted at `<reports_root>/<run_id>/`
#[derive(Debug, Clone)]
pub struct CsvSink {
    run_dir: PathBuf,
}

impl CsvSink {
    /// Create a sink for one run. Nothing touches the filesystem until
    /// rows are exported.
    pub fn new(reports_root: impl AsRef<Path>, run_id: &str) -> Self {
        Self {
            run_dir: reports_root.as_ref().join(run_id),
        }
    }

    /// Directory this sink writes into.
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Write `rows` to `file_name` inside the run directory.
    ///
    /// Used for secondary artifacts such as the raw execution log. Skips
    /// everything, including directory creation, when `rows` is empty.
    pub fn write_named(&self, file_name: &str, rows: &[Row]) -> Result<(), SinkError> {
        if rows.is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.run_dir)?;
        let mut file = std::fs::File::create(self.run_dir.join(file_name))?;
        file.write_all(render_csv(rows).as_bytes())?;
        Ok(())
    }
}

impl TabularSink for CsvSink {
    fn export(&self, rows: &[Row]) -> Result<(), SinkError> {
        if rows.is_empty() {
            return Ok(());
        }
        tracing::info!("Exporting reports to: {}", self.run_dir.display());
        self.write_named(REPORT_FILE, rows)
    }
}

/// Render rows as CSV text, header first, CRLF line ends.
fn render_csv(rows: &[Row]) -> String {
    let mut out = String::new();
    let Some(first) = rows.first() else {
        return out;
    };

    let header: Vec<String> = first.field_names().iter().map(|n| escape_field(n)).collect();
    out.push_str(&header.join(","));
    out.push_str("\r\n");

    for row in rows {
        let line: Vec<String> = row.values().iter().map(|v| escape_field(v)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }
    out
}

/// Quote a field when it contains a comma, quote or line break; inner
/// quotes are doubled.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
