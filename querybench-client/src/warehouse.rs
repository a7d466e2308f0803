//! Warehouse Query Client
//!
//! Speaks the BigQuery v2 REST surface: submit a query job, poll until it
//! completes, then fetch the finished job for its slot-time statistics.
//! Every job carries the fixed harness options: standard SQL, query cache
//! off, no result rows fetched back.

use querybench_core::{BackendError, ExecutionOutcome, QueryBackend, QueryOptions};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default REST endpoint of the warehouse
pub const DEFAULT_ENDPOINT: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Default delay between job completion polls, in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Connection settings for the warehouse client
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// Base REST endpoint
    pub endpoint: String,
    /// Project jobs are submitted to
    pub project_id: String,
    /// Bearer token sent with every request
    pub token: String,
    /// Delay between job completion polls
    pub poll_interval: Duration,
}

/// Blocking client for the query warehouse
pub struct WarehouseClient {
    http: reqwest::blocking::Client,
    config: WarehouseConfig,
}

impl WarehouseClient {
    /// Build a client from connection settings.
    ///
    /// The transport runs without a request timeout: analytic queries can
    /// legitimately take much longer than any general-purpose default, and
    /// the harness relies on the blocking call to pace the run.
    pub fn new(config: WarehouseConfig) -> Result<Self, BackendError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn submit(&self, sql: &str, options: &QueryOptions) -> Result<QueryResponse, BackendError> {
        let url = format!(
            "{}/projects/{}/queries",
            self.config.endpoint, self.config.project_id
        );
        let body = QueryRequest {
            query: sql,
            use_legacy_sql: false,
            use_query_cache: false,
            max_results: 0,
            default_dataset: options.default_dataset.as_deref().map(|dataset_id| {
                DatasetReference {
                    project_id: &self.config.project_id,
                    dataset_id,
                }
            }),
        };
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        parse_json(response)
    }

    fn poll(&self, job: &JobReference) -> Result<bool, BackendError> {
        tracing::debug!("Polling job {} for completion", job.job_id);
        let url = format!(
            "{}/projects/{}/queries/{}",
            self.config.endpoint, job.project_id, job.job_id
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.token)
            .query(&[("location", job.location.as_str()), ("maxResults", "0")])
            .send()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let results: QueryResponse = parse_json(response)?;
        Ok(results.job_complete)
    }

    fn fetch_job(&self, job: &JobReference) -> Result<Job, BackendError> {
        let url = format!(
            "{}/projects/{}/jobs/{}",
            self.config.endpoint, job.project_id, job.job_id
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.token)
            .query(&[("location", job.location.as_str())])
            .send()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        parse_json(response)
    }
}

impl QueryBackend for WarehouseClient {
    fn execute(&self, sql: &str, options: &QueryOptions) -> Result<ExecutionOutcome, BackendError> {
        let submitted = self.submit(sql, options)?;
        let job_ref = submitted.job_reference;

        let mut complete = submitted.job_complete;
        while !complete {
            std::thread::sleep(self.config.poll_interval);
            complete = self.poll(&job_ref)?;
        }

        let job = self.fetch_job(&job_ref)?;
        if let Some(error) = job.status.and_then(|s| s.error_result) {
            return Err(job_error(error));
        }

        let slot_millis = job
            .statistics
            .and_then(|s| s.query)
            .and_then(|q| q.total_slot_ms)
            .unwrap_or(0);

        Ok(ExecutionOutcome {
            project: job_ref.project_id,
            location: job_ref.location,
            job_id: job_ref.job_id,
            slot_millis,
        })
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(api_error(status.as_u16(), &body));
    }
    response
        .json()
        .map_err(|e| BackendError::Response(e.to_string()))
}

/// Map a non-success HTTP response to the api error, preferring the
/// message from the service's JSON error envelope over the raw body.
fn api_error(status: u16, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string());
    BackendError::Api(format!("status {}: {}", status, message))
}

/// Map a finished job's error result to the api error.
fn job_error(error: ErrorProto) -> BackendError {
    BackendError::Api(match error.reason {
        Some(reason) => format!("{} ({})", error.message, reason),
        None => error.message,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    query: &'a str,
    use_legacy_sql: bool,
    use_query_cache: bool,
    max_results: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_dataset: Option<DatasetReference<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DatasetReference<'a> {
    project_id: &'a str,
    dataset_id: &'a str,
}

/// Shape shared by the submit response and the completion poll.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    job_reference: JobReference,
    #[serde(default)]
    job_complete: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    project_id: String,
    job_id: String,
    #[serde(default)]
    location: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Job {
    #[serde(default)]
    status: Option<JobStatus>,
    #[serde(default)]
    statistics: Option<JobStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobStatus {
    #[serde(default)]
    error_result: Option<ErrorProto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorProto {
    #[serde(default)]
    reason: Option<String>,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobStatistics {
    #[serde(default)]
    query: Option<QueryStatistics>,
}

// The service serializes 64-bit counters as JSON strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryStatistics {
    #[serde(default, deserialize_with = "u64_from_string_or_number")]
    total_slot_ms: Option<u64>,
}

fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Num(u64),
        Text(String),
    }

    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Num(n)) => Ok(Some(n)),
        Some(Loose::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_wire_shape() {
        let request = QueryRequest {
            query: "SELECT 1",
            use_legacy_sql: false,
            use_query_cache: false,
            max_results: 0,
            default_dataset: Some(DatasetReference {
                project_id: "acme-prod",
                dataset_id: "analytics",
            }),
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["query"], "SELECT 1");
        assert_eq!(value["useLegacySql"], false);
        assert_eq!(value["useQueryCache"], false);
        assert_eq!(value["maxResults"], 0);
        assert_eq!(value["defaultDataset"]["projectId"], "acme-prod");
        assert_eq!(value["defaultDataset"]["datasetId"], "analytics");
    }

    #[test]
    fn test_default_dataset_omitted_when_absent() {
        let request = QueryRequest {
            query: "SELECT 1",
            use_legacy_sql: false,
            use_query_cache: false,
            max_results: 0,
            default_dataset: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("defaultDataset").is_none());
    }

    #[test]
    fn test_query_response_defaults_incomplete() {
        let response: QueryResponse = serde_json::from_str(
            r#"{"jobReference": {"projectId": "p", "jobId": "job_1", "location": "US"}}"#,
        )
        .unwrap();
        assert!(!response.job_complete);
        assert_eq!(response.job_reference.location, "US");
    }

    #[test]
    fn test_slot_millis_parsed_from_string() {
        let job: Job = serde_json::from_str(
            r#"{"statistics": {"query": {"totalSlotMs": "18250"}}}"#,
        )
        .unwrap();
        let slot = job.statistics.unwrap().query.unwrap().total_slot_ms;
        assert_eq!(slot, Some(18_250));
    }

    #[test]
    fn test_slot_millis_parsed_from_number() {
        let job: Job =
            serde_json::from_str(r#"{"statistics": {"query": {"totalSlotMs": 18250}}}"#).unwrap();
        let slot = job.statistics.unwrap().query.unwrap().total_slot_ms;
        assert_eq!(slot, Some(18_250));
    }

    #[test]
    fn test_job_error_result_parsed() {
        let job: Job = serde_json::from_str(
            r#"{"status": {"errorResult": {"reason": "invalidQuery", "message": "Syntax error"}}}"#,
        )
        .unwrap();
        let error = job.status.unwrap().error_result.unwrap();
        assert_eq!(error.reason.as_deref(), Some("invalidQuery"));
        assert_eq!(error.message, "Syntax error");
    }

    #[test]
    fn test_error_envelope_parsed() {
        let envelope: ErrorEnvelope = serde_json::from_str(
            r#"{"error": {"code": 403, "message": "Access Denied", "status": "PERMISSION_DENIED"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.error.message, "Access Denied");
    }

    #[test]
    fn test_api_error_prefers_envelope_message() {
        let err = api_error(403, r#"{"error": {"code": 403, "message": "Access Denied"}}"#);
        assert!(matches!(err, BackendError::Api(_)));
        assert_eq!(
            err.to_string(),
            "backend api error: status 403: Access Denied"
        );
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        let err = api_error(502, "Bad Gateway");
        assert_eq!(
            err.to_string(),
            "backend api error: status 502: Bad Gateway"
        );
    }

    #[test]
    fn test_job_error_carries_reason() {
        let error = ErrorProto {
            reason: Some("invalidQuery".to_string()),
            message: "Syntax error".to_string(),
        };
        let err = job_error(error);
        assert!(matches!(err, BackendError::Api(_)));
        assert_eq!(
            err.to_string(),
            "backend api error: Syntax error (invalidQuery)"
        );
    }

    #[test]
    fn test_job_error_without_reason() {
        let error = ErrorProto {
            reason: None,
            message: "Quota exceeded".to_string(),
        };
        assert_eq!(
            job_error(error).to_string(),
            "backend api error: Quota exceeded"
        );
    }
}
