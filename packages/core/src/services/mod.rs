//! Clients for the three external HTTP services, each behind a trait so the
//! sync loop can be driven by fakes.

pub mod airtable;
pub mod rocketapi;
pub mod telegram;

use std::time::Duration;

use reqwest::Client;

use crate::error::AppError;

pub use airtable::{AirtableClient, RecordStore};
pub use rocketapi::{FollowerCountProvider, RocketApiClient};
pub use telegram::{NotificationChannel, TelegramClient};

/// Shared HTTP client with the configured per-request timeout.
pub fn http_client(timeout: Duration) -> Result<Client, AppError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|err| AppError::Http(err.to_string()))
}
