use dotenv::{dotenv, from_path};
use std::env;
use thiserror::Error;

pub const DEFAULT_DATABASE_PATH: &str = "bloodbank.db";
pub const DEFAULT_API_HOST: &str = "0.0.0.0";
pub const DEFAULT_API_PORT: u16 = 8000;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Failed to load .env file from path {path}: {reason}")]
    EnvFile { path: String, reason: String },

    #[error("Invalid {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: String,
    pub api_host: String,
    pub api_port: u16,
    /// Tracing directive overriding the server's default filter.
    pub log_filter: Option<String>,
}

impl Config {
    /// Load configuration from a specified `.env` file path or default to the
    /// `.env` file in the working directory, then read the process environment.
    pub fn from_env(env_path: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = env_path {
            from_path(path).map_err(|e| ConfigError::EnvFile {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        } else {
            // A missing default `.env` is fine
            dotenv().ok();
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_port = match non_empty("API_PORT") {
            Some(raw) => raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    key: "API_PORT",
                    reason: format!("{raw:?}: {e}"),
                }
            })?,
            None => DEFAULT_API_PORT,
        };

        Ok(Self {
            database_path: non_empty("DATABASE_PATH")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            api_host: non_empty("API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_string()),
            api_port,
            log_filter: non_empty("LOG_FILTER"),
        })
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}
