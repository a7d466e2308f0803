//! Execution Records
//!
//! `ExecutionDraft` is a planned execution, carrying everything known
//! before the backend is called. Completing a draft with the measured
//! fields produces an immutable `ExecutionRecord`, so a half-measured
//! record is unrepresentable.

use crate::Statement;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether an execution belongs to the discarded warmup pass or the
/// measured test pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Warmup pass, results discarded
    Warmup,
    /// Test pass, results measured and reported
    Test,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Warmup => write!(f, "warmup"),
            RunMode::Test => write!(f, "test"),
        }
    }
}

/// A planned execution: one statement at one iteration of one pass.
#[derive(Debug, Clone)]
pub struct ExecutionDraft {
    /// Statement to execute
    pub statement: Statement,
    /// 1-based iteration this execution belongs to
    pub iteration_index: u32,
    /// Pass this execution belongs to
    pub run_mode: RunMode,
}

impl ExecutionDraft {
    /// Complete the draft with the measured fields, producing the
    /// immutable record.
    pub fn complete(
        self,
        started_at: DateTime<Utc>,
        duration_ms: u64,
        job_id: String,
        slot_millis: u64,
    ) -> ExecutionRecord {
        ExecutionRecord {
            statement: self.statement,
            iteration_index: self.iteration_index,
            run_mode: self.run_mode,
            started_at,
            duration_ms,
            job_id,
            slot_millis,
        }
    }
}

/// One completed execution of a statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Statement that was executed
    pub statement: Statement,
    /// 1-based iteration this execution belonged to
    pub iteration_index: u32,
    /// Pass this execution belonged to
    pub run_mode: RunMode,
    /// Wall-clock time the execution was submitted
    pub started_at: DateTime<Utc>,
    /// Client-observed duration in milliseconds, measured on the
    /// monotonic clock
    pub duration_ms: u64,
    /// Composite warehouse job id (`project:location.job_id`)
    pub job_id: String,
    /// Server-reported execution cost in slot-milliseconds
    pub slot_millis: u64,
}

/// Plan one pass of executions: every iteration runs every statement once,
/// in corpus order.
///
/// Iterations are the outer loop, so for two iterations over `a, b` the
/// plan reads `(a,1) (b,1) (a,2) (b,2)`.
pub fn plan_executions(
    run_mode: RunMode,
    iteration_count: u32,
    statements: &[Statement],
) -> Vec<ExecutionDraft> {
    let mut drafts = Vec::with_capacity(iteration_count as usize * statements.len());
    for iteration_index in 1..=iteration_count {
        for statement in statements {
            drafts.push(ExecutionDraft {
                statement: statement.clone(),
                iteration_index,
                run_mode,
            });
        }
    }
    drafts
}
