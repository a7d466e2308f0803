//! Benchmark Execution
//!
//! Core execution logic for one benchmark run: plan each pass, decorate
//! every statement with its identification tag, run it through the backend
//! and measure it.
//!
//! Execution is strictly sequential. The blocking backend call paces the
//! run, there is no retry, and a failed execution fails the whole run so a
//! partial report can never masquerade as a complete one.

use chrono::Utc;
use querybench_core::{
    plan_executions, tag_statement, BackendError, ExecutionDraft, ExecutionRecord, QueryBackend,
    QueryOptions, RunId, RunMode, Statement,
};
use std::time::Instant;

/// Configuration for the warmup/test protocol
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Run one discarded warmup pass before measuring
    pub warmup: bool,
    /// Number of measured test iterations
    pub test_iters: u32,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            warmup: true,
            test_iters: 5,
        }
    }
}

/// Executes statements against a query backend and produces records
pub struct Executor<B> {
    backend: B,
    options: QueryOptions,
    run_id: RunId,
}

impl<B: QueryBackend> Executor<B> {
    /// Create an executor for one run.
    pub fn new(backend: B, options: QueryOptions, run_id: RunId) -> Self {
        Self {
            backend,
            options,
            run_id,
        }
    }

    /// Run the full warmup/test protocol over `statements`.
    ///
    /// The warmup pass is discarded; the returned records are the test
    /// pass only, in generation order.
    pub fn execute(
        &self,
        statements: &[Statement],
        config: &ExecutionConfig,
    ) -> Result<Vec<ExecutionRecord>, BackendError> {
        if config.warmup {
            // One full pass to warm server-side caches; measurements dropped.
            self.run_pass(RunMode::Warmup, 1, statements)?;
        }
        self.run_pass(RunMode::Test, config.test_iters, statements)
    }

    /// Run one pass: `iteration_count` iterations over every statement,
    /// statements in corpus order within each iteration.
    pub fn run_pass(
        &self,
        run_mode: RunMode,
        iteration_count: u32,
        statements: &[Statement],
    ) -> Result<Vec<ExecutionRecord>, BackendError> {
        let drafts = plan_executions(run_mode, iteration_count, statements);
        let mut records = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let record = self.execute_single(draft)?;
            tracing::info!(
                "Executed query: {}, iteration: {}, run mode: {}, client time: {}ms, total slot time: {}ms",
                record.statement.name,
                record.iteration_index,
                record.run_mode,
                record.duration_ms,
                record.slot_millis
            );
            records.push(record);
        }
        Ok(records)
    }

    /// Execute one planned statement and measure it.
    fn execute_single(&self, draft: ExecutionDraft) -> Result<ExecutionRecord, BackendError> {
        let sql = tag_statement(
            self.run_id.as_str(),
            &draft.statement.sql,
            &draft.statement.name,
            draft.iteration_index,
            draft.run_mode,
        );

        // Calendar clock for the report, monotonic clock for the interval.
        let started_at = Utc::now();
        let started = Instant::now();
        let outcome = self.backend.execute(&sql, &self.options)?;
        let duration_ms = (started.elapsed().as_secs_f64() * 1000.0).round() as u64;

        Ok(draft.complete(
            started_at,
            duration_ms,
            outcome.composite_job_id(),
            outcome.slot_millis,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use querybench_core::ExecutionOutcome;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Backend that replays scripted costs and remembers every SQL text
    /// it was handed.
    struct FakeBackend {
        costs: RefCell<VecDeque<u64>>,
        seen_sql: RefCell<Vec<String>>,
        fail_after: Option<usize>,
    }

    impl FakeBackend {
        fn with_costs(costs: &[u64]) -> Self {
            Self {
                costs: RefCell::new(costs.iter().copied().collect()),
                seen_sql: RefCell::new(Vec::new()),
                fail_after: None,
            }
        }

        fn failing_after(executions: usize) -> Self {
            Self {
                fail_after: Some(executions),
                ..Self::with_costs(&[])
            }
        }
    }

    impl QueryBackend for FakeBackend {
        fn execute(
            &self,
            sql: &str,
            _options: &QueryOptions,
        ) -> Result<ExecutionOutcome, BackendError> {
            let mut seen = self.seen_sql.borrow_mut();
            if let Some(limit) = self.fail_after {
                if seen.len() >= limit {
                    return Err(BackendError::Api("quota exceeded".to_string()));
                }
            }
            seen.push(sql.to_string());

            let cost = self.costs.borrow_mut().pop_front().unwrap_or(100);
            Ok(ExecutionOutcome {
                project: "test-project".to_string(),
                location: "US".to_string(),
                job_id: format!("job-{}", seen.len()),
                slot_millis: cost,
            })
        }
    }

    fn statements(names: &[&str]) -> Vec<Statement> {
        names
            .iter()
            .map(|name| Statement::new(*name, format!("SELECT '{name}'")))
            .collect()
    }

    fn executor(backend: FakeBackend) -> Executor<FakeBackend> {
        let at = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 13, 5, 9).unwrap();
        Executor::new(
            backend,
            QueryOptions::default(),
            RunId::generate_at("test-project", at),
        )
    }

    #[test]
    fn test_pass_runs_statements_in_corpus_order_per_iteration() {
        let exec = executor(FakeBackend::with_costs(&[]));
        let records = exec
            .run_pass(RunMode::Test, 2, &statements(&["a", "b", "c"]))
            .unwrap();

        let shape: Vec<_> = records
            .iter()
            .map(|r| (r.statement.name.as_str(), r.iteration_index))
            .collect();
        assert_eq!(
            shape,
            [("a", 1), ("b", 1), ("c", 1), ("a", 2), ("b", 2), ("c", 2)]
        );
    }

    #[test]
    fn test_warmup_pass_discarded_from_results() {
        let exec = executor(FakeBackend::with_costs(&[]));
        let config = ExecutionConfig {
            warmup: true,
            test_iters: 2,
        };
        let records = exec.execute(&statements(&["q"]), &config).unwrap();

        // Two test records come back, but the backend saw three executions.
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.run_mode == RunMode::Test));
        let seen = exec.backend.seen_sql.borrow();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].contains("run_mode=warmup"));
        assert!(seen[1].contains("run_mode=test"));
    }

    #[test]
    fn test_warmup_disabled_skips_pass() {
        let exec = executor(FakeBackend::with_costs(&[]));
        let config = ExecutionConfig {
            warmup: false,
            test_iters: 2,
        };
        exec.execute(&statements(&["a", "b"]), &config).unwrap();
        assert_eq!(exec.backend.seen_sql.borrow().len(), 4);
    }

    #[test]
    fn test_backend_receives_tagged_sql() {
        let exec = executor(FakeBackend::with_costs(&[]));
        exec.run_pass(RunMode::Test, 1, &statements(&["a"])).unwrap();

        let seen = exec.backend.seen_sql.borrow();
        assert_eq!(
            seen[0],
            "/* run_id=test-project_20240301_130509, run_mode=test, iter=1, query=a */\nSELECT 'a'"
        );
    }

    #[test]
    fn test_record_carries_backend_outcome() {
        let exec = executor(FakeBackend::with_costs(&[640]));
        let records = exec.run_pass(RunMode::Test, 1, &statements(&["a"])).unwrap();

        assert_eq!(records[0].job_id, "test-project:US.job-1");
        assert_eq!(records[0].slot_millis, 640);
    }

    #[test]
    fn test_backend_error_aborts_the_pass() {
        let exec = executor(FakeBackend::failing_after(1));
        let err = exec
            .run_pass(RunMode::Test, 1, &statements(&["a", "b"]))
            .unwrap_err();

        assert!(matches!(err, BackendError::Api(_)));
        assert_eq!(exec.backend.seen_sql.borrow().len(), 1);
    }

    #[test]
    fn test_default_config() {
        let config = ExecutionConfig::default();
        assert!(config.warmup);
        assert_eq!(config.test_iters, 5);
    }
}
