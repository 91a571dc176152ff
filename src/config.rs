//! Dashboard configuration parsed from CLI flags and environment variables.
//!
//! Every flag has an env fallback so the dashboard can run from a `.env`
//! file next to the server's.

use std::time::Duration;

use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_HISTORY_PATH: &str = "/history";
pub const DEFAULT_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_TRANSITION_MS: u64 = 3000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base URL: {0} (expected http:// or https://)")]
    InvalidBaseUrl(String),
    #[error("invalid history path: {0} (must start with '/')")]
    InvalidHistoryPath(String),
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

#[derive(Parser, Debug)]
#[command(name = "climate-dashboard", about = "Live terminal dashboard for proactive climate readings")]
pub struct Cli {
    #[arg(long, env = "DASHBOARD_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "DASHBOARD_HISTORY_PATH", default_value = DEFAULT_HISTORY_PATH)]
    pub history_path: String,

    #[arg(long, env = "DASHBOARD_INTERVAL_MS", default_value_t = DEFAULT_INTERVAL_MS)]
    pub interval_ms: u64,

    #[arg(long, env = "DASHBOARD_TRANSITION_MS", default_value_t = DEFAULT_TRANSITION_MS)]
    pub transition_ms: u64,

    #[arg(long, env = "DASHBOARD_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "DASHBOARD_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    pub connect_timeout_secs: u64,

    #[arg(long, env = "DASHBOARD_NO_CLEAR", default_value_t = false, help = "Append frames instead of redrawing the screen")]
    pub no_clear: bool,

    #[arg(long, default_value_t = false, help = "Fetch and render a single snapshot, then exit")]
    pub once: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub history_path: String,
    pub interval: Duration,
    pub transition: Duration,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub clear_screen: bool,
    pub once: bool,
}

impl DashboardConfig {
    /// Validate parsed flags into a typed config.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-HTTP base URL, a relative history path,
    /// or a zero interval/timeout.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let base_url = cli.base_url.trim_end_matches('/').to_owned();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(cli.base_url));
        }
        if !cli.history_path.starts_with('/') {
            return Err(ConfigError::InvalidHistoryPath(cli.history_path));
        }

        Ok(Self {
            base_url,
            history_path: cli.history_path,
            interval: non_zero_millis("interval_ms", cli.interval_ms)?,
            transition: Duration::from_millis(cli.transition_ms),
            request_timeout: non_zero_secs("request_timeout_secs", cli.request_timeout_secs)?,
            connect_timeout: non_zero_secs("connect_timeout_secs", cli.connect_timeout_secs)?,
            clear_screen: !cli.no_clear,
            once: cli.once,
        })
    }

    #[must_use]
    pub fn history_url(&self) -> String {
        format!("{}{}", self.base_url, self.history_path)
    }
}

fn non_zero_millis(field: &'static str, value: u64) -> Result<Duration, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Zero { field });
    }
    Ok(Duration::from_millis(value))
}

fn non_zero_secs(field: &'static str, value: u64) -> Result<Duration, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Zero { field });
    }
    Ok(Duration::from_secs(value))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
