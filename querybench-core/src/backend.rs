//! Query Backend Interface
//!
//! The execution driver is written against `QueryBackend`, a narrow seam
//! over the warehouse client: run one statement, block until the job
//! finishes, report where it ran and what it cost. Tests plug in scripted
//! fakes; production wires in the HTTP client.

use thiserror::Error;

/// Job options applied to every execution of a run.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Dataset used to resolve unqualified table names
    pub default_dataset: Option<String>,
}

/// What the backend reports for one finished execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Project the job ran in
    pub project: String,
    /// Location the job ran in
    pub location: String,
    /// Backend-assigned job id
    pub job_id: String,
    /// Server-measured cost in slot-milliseconds
    pub slot_millis: u64,
}

impl ExecutionOutcome {
    /// Composite id in `project:location.job_id` form, unique across
    /// projects and locations.
    pub fn composite_job_id(&self) -> String {
        format!("{}:{}.{}", self.project, self.location, self.job_id)
    }
}

/// Errors surfaced by a query backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure reaching the service
    #[error("backend transport error: {0}")]
    Transport(String),

    /// The service rejected the request or the job itself failed
    #[error("backend api error: {0}")]
    Api(String),

    /// The service answered with something the client cannot interpret
    #[error("malformed backend response: {0}")]
    Response(String),
}

/// Synchronous query execution service.
///
/// `execute` blocks until the submitted statement has run to completion
/// and its statistics are available. The driver relies on that blocking
/// behavior to pace the run.
pub trait QueryBackend {
    /// Execute `sql` and return the finished job's outcome.
    fn execute(&self, sql: &str, options: &QueryOptions) -> Result<ExecutionOutcome, BackendError>;
}
