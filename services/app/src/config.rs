//! services/app/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the hosted backend, e.g. `https://xyz.example.co`.
    pub api_url: String,
    /// The project's public (anon) API key, sent with every request.
    pub api_key: String,
    pub log_level: Level,
    pub page_size: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure tests
    /// are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let api_url = std::env::var("QUOTEVAULT_API_URL")
            .map_err(|_| ConfigError::MissingVar("QUOTEVAULT_API_URL".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let api_key = std::env::var("QUOTEVAULT_API_KEY")
            .map_err(|_| ConfigError::MissingVar("QUOTEVAULT_API_KEY".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let page_size_str =
            std::env::var("QUOTEVAULT_PAGE_SIZE").unwrap_or_else(|_| "10".to_string());
        let page_size = page_size_str
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "QUOTEVAULT_PAGE_SIZE".to_string(),
                    format!("'{}' is not a positive integer", page_size_str),
                )
            })?;

        Ok(Self {
            api_url,
            api_key,
            log_level,
            page_size,
        })
    }
}
