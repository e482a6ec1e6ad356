//! Environment-driven configuration.
//!
//! Values come from the process environment, after loading a `.env` file
//! from the working directory when one exists.

use std::env;

use thiserror::Error;

/// Base URL of the task service.
pub const TASK_SERVER_VAR: &str = "TASK_SERVER";
/// Base URL of the user service.
pub const USER_SERVER_VAR: &str = "USER_SERVER";
/// Turns on persisting same-column reorders.
pub const PERSIST_REORDER_VAR: &str = "TASKERIZE_PERSIST_REORDER";
/// Directory to record gateway cassettes into.
pub const RECORD_VAR: &str = "TASKERIZE_RECORD";
/// Cassette file to replay instead of calling the services.
pub const REPLAY_VAR: &str = "TASKERIZE_REPLAY";
/// Log filter, falls back to `RUST_LOG`.
pub const LOG_VAR: &str = "TASKERIZE_LOG";

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    /// A variable has a value that cannot be parsed.
    #[error("environment variable {name} has invalid value {value:?}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Loads `.env` into the process environment, ignoring a missing file.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, "ignoring unreadable .env file");
        }
    }
}

/// Where the remote services live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Task service base URL, without trailing slash.
    pub task_server: String,
    /// User service base URL, without trailing slash.
    pub user_server: String,
}

impl GatewayConfig {
    /// Builds a config from two base URLs.
    pub fn new(task_server: impl Into<String>, user_server: impl Into<String>) -> Self {
        Self {
            task_server: task_server.into().trim_end_matches('/').to_string(),
            user_server: user_server.into().trim_end_matches('/').to_string(),
        }
    }

    /// Reads `TASK_SERVER` and `USER_SERVER`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if either is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &'static str| {
            lookup(name).filter(|v| !v.trim().is_empty()).ok_or(ConfigError::Missing(name))
        };
        Ok(Self::new(read(TASK_SERVER_VAR)?, read(USER_SERVER_VAR)?))
    }
}

/// Behavioural switches for the board controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardOptions {
    /// Persist same-column reorders by re-saving the task.
    ///
    /// The task service has no notion of order within a status, so this
    /// only refreshes the task's fields. Off by default.
    pub persist_reorder: bool,
}

impl BoardOptions {
    /// Reads `TASKERIZE_PERSIST_REORDER` (`1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for any other value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let persist_reorder = match lookup(PERSIST_REORDER_VAR) {
            None => false,
            Some(value) => parse_flag(&value)
                .ok_or(ConfigError::Invalid { name: PERSIST_REORDER_VAR, value })?,
        };
        Ok(Self { persist_reorder })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Some(false),
        "1" | "true" | "yes" | "on" => Some(true),
        _ => None,
    }
}
