use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::cli::Cli;

pub const DEFAULT_AIRTABLE_BASE_ID: &str = "appTxTTXPTBFwjelH";
pub const DEFAULT_ACCOUNTS_TABLE: &str = "Accounts";
pub const DEFAULT_HISTORY_TABLE: &str = "Statistics";
pub const DEFAULT_ROCKETAPI_URL: &str = "https://v1.rocketapi.io";
pub const DEFAULT_AIRTABLE_URL: &str = "https://api.airtable.com/v0";
pub const DEFAULT_TELEGRAM_URL: &str = "https://api.telegram.org";

/// Follower count below which an account is flagged when its record has no
/// threshold of its own.
pub const DEFAULT_THRESHOLD: i64 = 15;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECONDS: u64 = 2;
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Everything a sync run needs, validated once at startup.
#[derive(Clone)]
pub struct Config {
    pub rocketapi_token: String,
    pub airtable_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,

    pub airtable_base_id: String,
    pub accounts_table: String,
    pub history_table: String,

    pub rocketapi_url: String,
    pub airtable_url: String,
    pub telegram_url: String,

    pub default_threshold: i64,
    pub max_attempts: u32,
    pub retry_delay_seconds: u64,
    pub http_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as
    /// missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let required = |key: &str| get(key).ok_or_else(|| format!("{} is required", key));

        let rocketapi_token = required("ROCKETAPI_TOKEN")?;
        let airtable_token = required("AIRTABLE_TOKEN")?;
        let telegram_token = required("TELEGRAM_TOKEN")?;
        let telegram_chat_id = required("TELEGRAM_CHAT_ID")?;

        let or_default =
            |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let default_threshold =
            parse_or(get("DEFAULT_THRESHOLD"), "DEFAULT_THRESHOLD", DEFAULT_THRESHOLD)?;
        let max_attempts =
            parse_or(get("FETCH_MAX_ATTEMPTS"), "FETCH_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        let retry_delay_seconds = parse_or(
            get("FETCH_RETRY_DELAY_SECONDS"),
            "FETCH_RETRY_DELAY_SECONDS",
            DEFAULT_RETRY_DELAY_SECONDS,
        )?;
        let http_timeout_seconds = parse_or(
            get("HTTP_TIMEOUT_SECONDS"),
            "HTTP_TIMEOUT_SECONDS",
            DEFAULT_HTTP_TIMEOUT_SECONDS,
        )?;

        let config = Self {
            rocketapi_token,
            airtable_token,
            telegram_token,
            telegram_chat_id,
            airtable_base_id: or_default("AIRTABLE_BASE_ID", DEFAULT_AIRTABLE_BASE_ID),
            accounts_table: or_default("AIRTABLE_ACCOUNTS_TABLE", DEFAULT_ACCOUNTS_TABLE),
            history_table: or_default("AIRTABLE_HISTORY_TABLE", DEFAULT_HISTORY_TABLE),
            rocketapi_url: trim_url(or_default("ROCKETAPI_URL", DEFAULT_ROCKETAPI_URL)),
            airtable_url: trim_url(or_default("AIRTABLE_URL", DEFAULT_AIRTABLE_URL)),
            telegram_url: trim_url(or_default("TELEGRAM_URL", DEFAULT_TELEGRAM_URL)),
            default_threshold,
            max_attempts,
            retry_delay_seconds,
            http_timeout_seconds,
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the environment and re-check
    /// the result.
    pub fn with_overrides(mut self, cli: &Cli) -> Result<Self, String> {
        if let Some(max_attempts) = cli.max_attempts {
            self.max_attempts = max_attempts;
        }
        if let Some(delay) = cli.retry_delay {
            self.retry_delay_seconds = delay;
        }
        if let Some(timeout) = cli.http_timeout {
            self.http_timeout_seconds = timeout;
        }
        if let Some(threshold) = cli.default_threshold {
            self.default_threshold = threshold;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }

    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("FETCH_MAX_ATTEMPTS must be at least 1".into());
        }
        if self.http_timeout_seconds == 0 {
            return Err("HTTP_TIMEOUT_SECONDS must be at least 1".into());
        }
        Ok(())
    }
}

// Secrets stay out of the startup log line.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("airtable_base_id", &self.airtable_base_id)
            .field("accounts_table", &self.accounts_table)
            .field("history_table", &self.history_table)
            .field("rocketapi_url", &self.rocketapi_url)
            .field("airtable_url", &self.airtable_url)
            .field("telegram_url", &self.telegram_url)
            .field("default_threshold", &self.default_threshold)
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay_seconds", &self.retry_delay_seconds)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .finish_non_exhaustive()
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, String> {
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
