#![warn(missing_docs)]
//! QueryBench Client - Remote Service Clients
//!
//! Blocking HTTP clients for the two external collaborators:
//! - `WarehouseClient` submits query jobs and collects their statistics;
//!   it implements `querybench_core::QueryBackend`
//! - `SheetsClient` drives the hosted spreadsheet export; it implements
//!   `querybench_report::SpreadsheetApi`
//!
//! Both take a pre-acquired bearer token. Credential acquisition and
//! refresh are outside the harness.

mod sheets;
mod warehouse;

pub use sheets::{SheetsClient, DEFAULT_SHEETS_ENDPOINT};
pub use warehouse::{
    WarehouseClient, WarehouseConfig, DEFAULT_ENDPOINT, DEFAULT_POLL_INTERVAL_MS,
};
