//! Run Identity
//!
//! A run id names one end-to-end invocation: the project under test plus a
//! second-resolution UTC timestamp. It namespaces the execution tags, the
//! report directory and the spreadsheet title, and it is the handle for
//! digging a run's jobs out of the warehouse logs later.

use chrono::{DateTime, Utc};

/// Identifier of one benchmark run: `<project_id>_<YYYYMMDD_HHMMSS>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunId(String);

impl RunId {
    /// Generate a run id for `project_id` at the current UTC time.
    pub fn generate(project_id: &str) -> Self {
        Self::generate_at(project_id, Utc::now())
    }

    /// Generate a run id for `project_id` at an explicit timestamp.
    pub fn generate_at(project_id: &str, at: DateTime<Utc>) -> Self {
        RunId(format!("{}_{}", project_id, at.format("%Y%m%d_%H%M%S")))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
