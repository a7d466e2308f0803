//! Configuration loading from querybench.toml
//!
//! QueryBench configuration can be specified in a `querybench.toml` file in
//! the project root. The configuration is automatically discovered by
//! walking up from the current directory; CLI flags override file values.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// QueryBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QueryBenchConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Warehouse backend configuration
    #[serde(default)]
    pub backend: BackendConfig,
    /// Spreadsheet export configuration
    #[serde(default)]
    pub sheets: SheetsConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for the warmup/test protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Run a discarded warmup pass before the test pass
    #[serde(default = "default_warmup")]
    pub warmup: bool,
    /// Number of measured test iterations
    #[serde(default = "default_test_iters")]
    pub test_iters: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            warmup: default_warmup(),
            test_iters: default_test_iters(),
        }
    }
}

fn default_warmup() -> bool {
    true
}
fn default_test_iters() -> u32 {
    5
}

/// Warehouse backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base REST endpoint of the query service
    #[serde(default = "default_backend_endpoint")]
    pub endpoint: String,
    /// Delay between job completion polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: default_backend_endpoint(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_backend_endpoint() -> String {
    querybench_client::DEFAULT_ENDPOINT.to_string()
}
fn default_poll_interval_ms() -> u64 {
    querybench_client::DEFAULT_POLL_INTERVAL_MS
}

/// Spreadsheet export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Base REST endpoint of the spreadsheet service
    #[serde(default = "default_sheets_endpoint")]
    pub endpoint: String,
    /// Publish the aggregated report to a hosted spreadsheet
    #[serde(default = "default_sheet_export")]
    pub export: bool,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_sheets_endpoint(),
            export: default_sheet_export(),
        }
    }
}

fn default_sheets_endpoint() -> String {
    querybench_client::DEFAULT_SHEETS_ENDPOINT.to_string()
}
fn default_sheet_export() -> bool {
    true
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory run report directories are created under
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            reports_dir: default_reports_dir(),
        }
    }
}

fn default_reports_dir() -> String {
    "./reports".to_string()
}

impl QueryBenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current
    /// directory.
    ///
    /// A missing file is `Ok(None)`; a file that exists but does not
    /// parse is an error, never a silent fall-back to defaults.
    pub fn discover() -> anyhow::Result<Option<Self>> {
        match std::env::current_dir() {
            Ok(dir) => Self::discover_from(dir),
            Err(_) => Ok(None),
        }
    }

    fn discover_from(mut dir: PathBuf) -> anyhow::Result<Option<Self>> {
        loop {
            let config_path = dir.join("querybench.toml");
            if config_path.exists() {
                let config = Self::load(&config_path)
                    .with_context(|| format!("loading {}", config_path.display()))?;
                return Ok(Some(config));
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }
}
