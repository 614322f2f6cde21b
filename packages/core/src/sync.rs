//! Run-once reconciliation.
//!
//! Lists every tracked account, then for each one in turn: fetch the
//! current follower count, classify it against the stored baseline, patch
//! the account record and append a history row. Only a failed listing
//! aborts the run; anything that goes wrong for a single account is logged
//! and the loop moves on. The aggregate report is sent once at the end.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::classifier::{classify, Classification};
use crate::config::Config;
use crate::error::AppError;
use crate::fetcher::{MetricFetcher, RetryPolicy};
use crate::notifier::send_summary;
use crate::records::{AccountRecord, HistoryEntry};
use crate::services::{
    http_client, AirtableClient, NotificationChannel, RecordStore, RocketApiClient, TelegramClient,
};
use crate::summary::{AccountOutcome, RunSummary};

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub summary: RunSummary,
    pub outcomes: Vec<AccountOutcome>,
    pub records_listed: usize,
    /// Records without a username.
    pub skipped: usize,
    /// Accounts whose update or history write was rejected.
    pub persistence_failures: usize,
    pub notified: bool,
}

/// How far persistence got for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Persisted {
    Complete,
    UpdateFailed,
    HistoryFailed,
}

pub struct SyncRunner {
    store: Arc<dyn RecordStore + Send + Sync>,
    fetcher: MetricFetcher,
    channel: Arc<dyn NotificationChannel + Send + Sync>,
    default_threshold: i64,
}

impl SyncRunner {
    pub fn new(
        store: Arc<dyn RecordStore + Send + Sync>,
        fetcher: MetricFetcher,
        channel: Arc<dyn NotificationChannel + Send + Sync>,
        default_threshold: i64,
    ) -> Self {
        Self {
            store,
            fetcher,
            channel,
            default_threshold,
        }
    }

    /// Wire the HTTP-backed collaborators from a validated config.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let http = http_client(config.http_timeout())?;

        let provider = RocketApiClient::new(
            config.rocketapi_url.clone(),
            config.rocketapi_token.clone(),
            http.clone(),
        );
        let store = AirtableClient::new(
            config.airtable_url.clone(),
            config.airtable_token.clone(),
            config.airtable_base_id.clone(),
            config.accounts_table.clone(),
            config.history_table.clone(),
            http.clone(),
        );
        let channel = TelegramClient::new(
            config.telegram_url.clone(),
            config.telegram_token.clone(),
            config.telegram_chat_id.clone(),
            http,
        );

        Ok(Self::new(
            Arc::new(store),
            MetricFetcher::new(Arc::new(provider), RetryPolicy::from_config(config)),
            Arc::new(channel),
            config.default_threshold,
        ))
    }

    pub async fn run(&self) -> Result<SyncReport, AppError> {
        self.run_at(Utc::now()).await
    }

    /// Run once, stamping every write with `checked_at`.
    pub async fn run_at(&self, checked_at: DateTime<Utc>) -> Result<SyncReport, AppError> {
        let records = self.store.list_records().await?;
        let records_listed = records.len();

        tracing::info!(records = records_listed, "Starting follower sync");

        let mut outcomes = Vec::with_capacity(records_listed);
        let mut skipped = 0;
        let mut persistence_failures = 0;

        for record in &records {
            let Some(username) = record.username() else {
                tracing::warn!(record_id = %record.id, "Skipping record without a username");
                skipped += 1;
                continue;
            };

            let (outcome, persisted) = self.sync_account(record, username, checked_at).await;
            if persisted != Persisted::Complete {
                persistence_failures += 1;
            }
            outcomes.push(outcome);
        }

        let summary = RunSummary::from_outcomes(&outcomes);
        let notified = send_summary(&self.channel, &summary).await;

        tracing::info!(
            active = summary.active.len(),
            ad_issue = summary.ad_issue.len(),
            suspended = summary.suspended.len(),
            skipped,
            persistence_failures,
            "Follower sync complete"
        );

        Ok(SyncReport {
            summary,
            outcomes,
            records_listed,
            skipped,
            persistence_failures,
            notified,
        })
    }

    /// Fetch, classify and persist one account.
    async fn sync_account(
        &self,
        record: &AccountRecord,
        username: &str,
        checked_at: DateTime<Utc>,
    ) -> (AccountOutcome, Persisted) {
        tracing::info!(username, record_id = %record.id, "Checking account");

        let fetched = self.fetcher.fetch(username).await;
        let classification = classify(
            record.current_followers(),
            fetched,
            record.threshold(self.default_threshold),
        );

        let persisted = self
            .persist(record, username, &classification, checked_at)
            .await;

        let outcome = AccountOutcome {
            username: username.to_string(),
            classification,
        };

        (outcome, persisted)
    }

    async fn persist(
        &self,
        record: &AccountRecord,
        username: &str,
        classification: &Classification,
        checked_at: DateTime<Utc>,
    ) -> Persisted {
        let update = classification.to_update(checked_at);

        if let Err(err) = self.store.update_record(&record.id, &update).await {
            tracing::error!(username, record_id = %record.id, "Failed to update account record: {}", err);
            return Persisted::UpdateFailed;
        }

        let Classification::Observed { current, delta, status, .. } = *classification else {
            tracing::warn!(
                username,
                status = classification.status().as_str(),
                "Marked account as suspected suspended"
            );
            return Persisted::Complete;
        };

        let entry = HistoryEntry::new(username, current, delta, &record.id, checked_at);
        if let Err(err) = self.store.append_history_entry(&entry).await {
            tracing::error!(username, record_id = %record.id, "Failed to append history entry: {}", err);
            return Persisted::HistoryFailed;
        }

        tracing::info!(
            username,
            followers = current,
            delta,
            status = status.as_str(),
            "Updated account"
        );
        Persisted::Complete
    }
}
