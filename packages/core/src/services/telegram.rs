use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::NotifyError;

/// Outbound chat channel for the run report.
#[async_trait]
pub trait NotificationChannel {
    /// Send one HTML-formatted message to the configured destination.
    async fn send_message(&self, text: &str) -> Result<(), NotifyError>;
}

#[derive(Clone)]
pub struct TelegramClient {
    base_url: String,
    bot_token: String,
    chat_id: String,
    http: Client,
}

impl TelegramClient {
    pub fn new(base_url: String, bot_token: String, chat_id: String, http: Client) -> Self {
        Self {
            base_url,
            bot_token,
            chat_id,
            http,
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[async_trait]
impl NotificationChannel for TelegramClient {
    async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);

        let response = self
            .http
            .post(&url)
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
                parse_mode: "HTML",
            })
            .send()
            .await?;

        // The body is only read to explain a rejection; no delivery receipt
        // is consumed.
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
