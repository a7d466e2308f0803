#![warn(missing_docs)]
//! QueryBench Report - Execution Log Export
//!
//! Projects execution records into named rows and writes them to
//! interchangeable tabular sinks:
//! - CSV files under the run's report directory
//! - A hosted spreadsheet, driven through the `SpreadsheetApi` seam

mod csv;
mod row;
mod sheet;

pub use csv::{CsvSink, RAW_REPORT_FILE, REPORT_FILE};
pub use row::{record_row, Row};
pub use sheet::{
    SpreadsheetApi, SpreadsheetError, SpreadsheetHandle, SpreadsheetSink, WORKSHEET_TITLE,
};

use thiserror::Error;

/// Errors raised while exporting rows
#[derive(Debug, Error)]
pub enum SinkError {
    /// Filesystem failure while writing a report file
    #[error("report i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Hosted spreadsheet failure
    #[error("spreadsheet export failed: {0}")]
    Spreadsheet(#[from] SpreadsheetError),
}

/// A destination for named rows.
///
/// Sinks receive rows already projected from execution records; which
/// record field a column came from is invisible to them, so adding a
/// field to the projection changes every export format at once.
pub trait TabularSink {
    /// Export `rows`. Exporting an empty slice leaves no artifact behind.
    fn export(&self, rows: &[Row]) -> Result<(), SinkError>;
}
