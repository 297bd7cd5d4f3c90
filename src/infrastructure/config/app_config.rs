use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_PORT: u16 = 7540;
pub const DEFAULT_DB_FILE: &str = "scheduler.db";
pub const DEFAULT_WEB_DIR: &str = "./web";

/// Runtime settings, read from the environment (and `.env`, loaded in main)
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub db_file: PathBuf,
    pub web_dir: PathBuf,
    pub log_level: Level,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("TODO_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("TODO_PORT must be a port number, got `{}`", raw))?,
            None => DEFAULT_PORT,
        };

        let db_file = match get("TODO_DBFILE") {
            Some(path) => PathBuf::from(path),
            None => env::current_dir()
                .context("Error getting current working directory")?
                .join(DEFAULT_DB_FILE),
        };

        let web_dir = get("TODO_WEB_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WEB_DIR));

        let log_level = match get("TODO_LOG_LEVEL") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("TODO_LOG_LEVEL is not a log level: `{}`", raw))?,
            None => Level::INFO,
        };

        Ok(Self {
            port,
            db_file,
            web_dir,
            log_level,
        })
    }
}
