//! CLI command implementations.

pub mod init;
pub mod investigate;
pub mod memory;
pub mod plan;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::sqlite::{database_url, initialize_database, SqliteMemoryRepository};
use crate::domain::models::{Config, Profile, ProfileKind};
use crate::infrastructure::config::ConfigLoader;

/// Accepted values for `--profile`.
pub const PROFILE_NAMES: [&str; 2] = ["darknet", "osint"];

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Resolve the profile from the flag, falling back to the configured default.
pub fn resolve_profile(flag: Option<&str>, config: &Config) -> Result<Arc<Profile>> {
    let name = flag.unwrap_or(&config.profile);
    let kind: ProfileKind = name.parse()?;
    let profile = Profile::builtin(kind).context("Failed to build investigation profile")?;
    Ok(Arc::new(profile))
}

pub async fn open_memory_store(config: &Config) -> Result<SqliteMemoryRepository> {
    let url = database_url(&config.memory.database_path);
    let pool = initialize_database(&url)
        .await
        .with_context(|| format!("Failed to open memory store at {}", config.memory.database_path))?;
    Ok(SqliteMemoryRepository::new(pool))
}
