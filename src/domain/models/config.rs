use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::checkpoint::TimeoutAction;

/// Main configuration structure for osint-swarm
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Default investigation profile: darknet or osint
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Search provider configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Page fetch configuration
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Retry policy for provider calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Human checkpoint behavior
    #[serde(default)]
    pub checkpoint: CheckpointConfig,

    /// Orchestration tuning
    #[serde(default)]
    pub orchestration: OrchestrationConfig,

    /// Cross-run memory store
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Report output
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_profile() -> String {
    "darknet".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            search: SearchConfig::default(),
            scrape: ScrapeConfig::default(),
            retry: RetryConfig::default(),
            checkpoint: CheckpointConfig::default(),
            orchestration: OrchestrationConfig::default(),
            memory: MemoryConfig::default(),
            report: ReportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Search provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    /// Provider kind: serper or none
    #[serde(default = "default_search_provider")]
    pub provider: String,

    /// API key (also read from SERPER_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Search endpoint URL
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Result-count limit; profile default when unset
    #[serde(default)]
    pub result_limit: Option<usize>,

    /// Country hint; profile default when unset
    #[serde(default)]
    pub country: Option<String>,

    /// Locale hint; profile default when unset
    #[serde(default)]
    pub locale: Option<String>,

    /// Requests per second allowed against the provider
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_search_provider() -> String {
    "serper".to_string()
}

fn default_search_endpoint() -> String {
    "https://google.serper.dev/search".to_string()
}

const fn default_requests_per_second() -> u32 {
    5
}

const fn default_http_timeout_secs() -> u64 {
    30
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: default_search_provider(),
            api_key: None,
            endpoint: default_search_endpoint(),
            result_limit: None,
            country: None,
            locale: None,
            requests_per_second: default_requests_per_second(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

/// Page fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScrapeConfig {
    /// Maximum characters kept from a fetched page
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_max_chars() -> usize {
    4000
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    500
}

const fn default_max_backoff_ms() -> u64 {
    10_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Human checkpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckpointConfig {
    /// Seconds to wait for the operator; wait forever when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Decision taken when the timeout fires
    #[serde(default)]
    pub on_timeout: TimeoutAction,

    /// Rejections allowed per stage before the latest output is kept
    #[serde(default = "default_max_revisions")]
    pub max_revisions: u32,
}

const fn default_max_revisions() -> u32 {
    5
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            on_timeout: TimeoutAction::default(),
            max_revisions: default_max_revisions(),
        }
    }
}

/// Orchestration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OrchestrationConfig {
    /// How many nested delegation hops a worker may open
    #[serde(default = "default_max_delegation_depth")]
    pub max_delegation_depth: usize,

    /// Planning pre-pass for the hierarchical model; profile default when unset
    #[serde(default)]
    pub planning: Option<bool>,
}

const fn default_max_delegation_depth() -> usize {
    1
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            max_delegation_depth: default_max_delegation_depth(),
            planning: None,
        }
    }
}

/// Cross-run memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemoryConfig {
    /// Force memory on or off; profile default when unset
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Prior findings recalled per run
    #[serde(default = "default_recall_limit")]
    pub recall_limit: usize,
}

fn default_database_path() -> String {
    ".osint-swarm/memory.db".to_string()
}

const fn default_recall_limit() -> usize {
    10
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            database_path: default_database_path(),
            recall_limit: default_recall_limit(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReportConfig {
    /// Directory receiving report files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("osint_results")
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling JSON log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
