use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::profile::ProfileKind;

/// Project-local directory holding configuration and the memory database.
pub const CONFIG_DIR: &str = ".osint-swarm";

/// Environment variable carrying the search API key.
pub const SERPER_API_KEY_ENV: &str = "SERPER_API_KEY";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid profile: {0}. Must be one of: darknet, osint")]
    InvalidProfile(String),

    #[error("Invalid search provider: {0}. Must be one of: serper, none")]
    InvalidSearchProvider(String),

    #[error("Invalid requests_per_second: {0}. Must be at least 1")]
    InvalidRequestsPerSecond(u32),

    #[error("Invalid result_limit: {0}. Must be between 1 and 100")]
    InvalidResultLimit(usize),

    #[error("Invalid {0} timeout: must be at least 1 second")]
    InvalidTimeout(&'static str),

    #[error("Invalid scrape max_chars: {0}. Must be at least 1")]
    InvalidMaxChars(usize),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid max_delegation_depth: {0}. Must be at most 5")]
    InvalidDelegationDepth(usize),

    #[error("Memory database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration relative to the current directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .osint-swarm/config.yaml (created by init)
    /// 3. .osint-swarm/local.yaml (optional overrides)
    /// 4. Environment variables (OSINT_SWARM_* prefix, `__` for nesting)
    /// 5. SERPER_API_KEY as `search.api_key`
    pub fn load() -> Result<Config> {
        Self::load_from_dir(Path::new("."))
    }

    /// Load configuration from the `.osint-swarm/` directory under `root`.
    pub fn load_from_dir(root: &Path) -> Result<Config> {
        let dir = root.join(CONFIG_DIR);
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")));

        let config: Config = with_env(figment)
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file; environment overrides still apply.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()));

        let config: Config = with_env(figment).extract().context(format!(
            "Failed to load config from {}",
            path.as_ref().display()
        ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.profile.parse::<ProfileKind>().is_err() {
            return Err(ConfigError::InvalidProfile(config.profile.clone()));
        }

        let valid_providers = ["serper", "none"];
        if !valid_providers.contains(&config.search.provider.as_str()) {
            return Err(ConfigError::InvalidSearchProvider(
                config.search.provider.clone(),
            ));
        }

        if config.search.requests_per_second == 0 {
            return Err(ConfigError::InvalidRequestsPerSecond(
                config.search.requests_per_second,
            ));
        }

        if let Some(limit) = config.search.result_limit {
            if limit == 0 || limit > 100 {
                return Err(ConfigError::InvalidResultLimit(limit));
            }
        }

        if config.search.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("search"));
        }

        if config.scrape.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("scrape"));
        }

        if config.checkpoint.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidTimeout("checkpoint"));
        }

        if config.scrape.max_chars == 0 {
            return Err(ConfigError::InvalidMaxChars(config.scrape.max_chars));
        }

        if config.retry.initial_backoff_ms >= config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        if config.orchestration.max_delegation_depth > 5 {
            return Err(ConfigError::InvalidDelegationDepth(
                config.orchestration.max_delegation_depth,
            ));
        }

        if config.memory.database_path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

fn with_env(figment: Figment) -> Figment {
    figment
        .merge(Env::prefixed("OSINT_SWARM_").split("__"))
        .merge(
            Env::raw()
                .only(&[SERPER_API_KEY_ENV])
                .map(|_| "search.api_key".into()),
        )
}
