#![warn(missing_docs)]
//! QueryBench Core - Benchmark Domain Types
//!
//! Building blocks for one benchmark run:
//! - `Statement` and deterministic corpus loading from a directory of `.sql` files
//! - Identification tagging so individual executions can be traced in the
//!   warehouse's own job logs
//! - `ExecutionDraft` / `ExecutionRecord` pairs for the measurement protocol
//! - The `QueryBackend` trait the execution driver runs against

mod backend;
mod corpus;
mod record;
mod run;
mod tag;

pub use backend::{BackendError, ExecutionOutcome, QueryBackend, QueryOptions};
pub use corpus::{load_statements, CorpusError};
pub use record::{plan_executions, ExecutionDraft, ExecutionRecord, RunMode};
pub use run::RunId;
pub use tag::tag_statement;

use serde::{Deserialize, Serialize};

/// A named unit of query text loaded from the corpus.
///
/// Identity is `name`, the stem of the source file; within one loaded
/// corpus names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Statement name, derived from the source file name
    pub name: String,
    /// Raw SQL text, exactly as read from the file
    pub sql: String,
}

impl Statement {
    /// Create a statement from its name and SQL body.
    pub fn new(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
        }
    }
}
