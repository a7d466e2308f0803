//! Hosted Spreadsheet Sink
//!
//! Publishes the aggregated report as a fresh spreadsheet. Every remote
//! operation goes through the `SpreadsheetApi` trait, so the sequencing
//! logic here is testable against a recording fake and the HTTP client
//! only enters at the edge.

use crate::{Row, SinkError, TabularSink};
use thiserror::Error;

/// Title of the worksheet holding the execution rows
pub const WORKSHEET_TITLE: &str = "Query Executions";

/// Errors from a spreadsheet service
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    /// Transport-level failure reaching the service
    #[error("spreadsheet transport error: {0}")]
    Transport(String),

    /// The service rejected a request
    #[error("spreadsheet api error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Service-reported message
        message: String,
    },

    /// The service answered with something the client cannot interpret
    #[error("malformed spreadsheet response: {0}")]
    Response(String),
}

/// Handle to a freshly created spreadsheet
#[derive(Debug, Clone)]
pub struct SpreadsheetHandle {
    /// Service-assigned spreadsheet id
    pub spreadsheet_id: String,
    /// Browser URL of the spreadsheet
    pub url: String,
    /// Sheet id of the default worksheet the service creates alongside
    pub default_sheet_id: i64,
}

/// Remote spreadsheet operations required by the sink
pub trait SpreadsheetApi {
    /// Create a spreadsheet titled `title`.
    fn create_spreadsheet(&self, title: &str) -> Result<SpreadsheetHandle, SpreadsheetError>;

    /// Add a worksheet and return its sheet id.
    fn add_worksheet(&self, spreadsheet_id: &str, title: &str) -> Result<i64, SpreadsheetError>;

    /// Overwrite cells starting at A1 of `worksheet_title` with `values`.
    fn update_values(
        &self,
        spreadsheet_id: &str,
        worksheet_title: &str,
        values: &[Vec<String>],
    ) -> Result<(), SpreadsheetError>;

    /// Freeze the top `rows` rows of a worksheet.
    fn freeze_rows(
        &self,
        spreadsheet_id: &str,
        sheet_id: i64,
        rows: u32,
    ) -> Result<(), SpreadsheetError>;

    /// Delete a worksheet.
    fn delete_worksheet(&self, spreadsheet_id: &str, sheet_id: i64)
        -> Result<(), SpreadsheetError>;
}

/// Sink that publishes rows to a new hosted spreadsheet
pub struct SpreadsheetSink<A> {
    api: A,
    run_id: String,
}

impl<A: SpreadsheetApi> SpreadsheetSink<A> {
    /// Create a sink publishing under the given run id.
    pub fn new(api: A, run_id: &str) -> Self {
        Self {
            api,
            run_id: run_id.to_string(),
        }
    }

    /// Spreadsheet title for this run.
    pub fn title(&self) -> String {
        format!("Benchmark Queries Report: {}", self.run_id)
    }
}

impl<A: SpreadsheetApi> TabularSink for SpreadsheetSink<A> {
    /// Create the spreadsheet, fill the report worksheet, freeze the
    /// header and drop the service's default worksheet, in that order.
    fn export(&self, rows: &[Row]) -> Result<(), SinkError> {
        let Some(first) = rows.first() else {
            return Ok(());
        };

        let spreadsheet = self.api.create_spreadsheet(&self.title())?;
        tracing::info!("Exporting to Google Sheet: {}", spreadsheet.url);

        let sheet_id = self
            .api
            .add_worksheet(&spreadsheet.spreadsheet_id, WORKSHEET_TITLE)?;

        let mut values = Vec::with_capacity(rows.len() + 1);
        values.push(first.field_names().iter().map(|n| n.to_string()).collect());
        for row in rows {
            values.push(row.values().iter().map(|v| v.to_string()).collect());
        }
        self.api
            .update_values(&spreadsheet.spreadsheet_id, WORKSHEET_TITLE, &values)?;
        self.api
            .freeze_rows(&spreadsheet.spreadsheet_id, sheet_id, 1)?;
        self.api
            .delete_worksheet(&spreadsheet.spreadsheet_id, spreadsheet.default_sheet_id)?;

        Ok(())
    }
}
