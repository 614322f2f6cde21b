use thiserror::Error;

/// Run-level application error.
///
/// Only these abort a sync run. Everything that goes wrong for a single
/// account (fetch, persistence, notification) is contained and logged by
/// the orchestrator instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Could not list tracked accounts: {0}")]
    Listing(#[from] StoreError),

    #[error("HTTP client error: {0}")]
    Http(String),
}

/// A single failed attempt against the metrics provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Provider returned HTTP {status}")]
    Status { status: u16 },

    #[error("Data format error: {message}")]
    Format { message: String },
}

/// Errors from the tabular record store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors from the notification channel.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

// Transport failures only. Body decoding is mapped explicitly at each call
// site so it lands in the format/parse variants.
//
// The URL is stripped from every message: the chat API carries the bot token
// in its path.
impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Network { message: err.without_url().to_string() }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Network(err.without_url().to_string())
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Network(err.without_url().to_string())
    }
}
