//! Tabular store client.
//!
//! Reads the tracked-accounts table page by page, patches account records
//! in place and appends rows to the history table. Every call is
//! authenticated with the store's bearer token.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::records::{AccountRecord, HistoryEntry, RecordUpdate};

#[async_trait]
pub trait RecordStore {
    /// All tracked-account records, in store order.
    async fn list_records(&self) -> Result<Vec<AccountRecord>, StoreError>;

    /// Patch exactly the fields in `update` onto one record.
    async fn update_record(&self, record_id: &str, update: &RecordUpdate) -> Result<(), StoreError>;

    /// Create one row in the history table.
    async fn append_history_entry(&self, entry: &HistoryEntry) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct AirtableClient {
    base_url: String,
    token: String,
    base_id: String,
    accounts_table: String,
    history_table: String,
    http: Client,
}

impl AirtableClient {
    pub fn new(
        base_url: String,
        token: String,
        base_id: String,
        accounts_table: String,
        history_table: String,
        http: Client,
    ) -> Self {
        Self {
            base_url,
            token,
            base_id,
            accounts_table,
            history_table,
            http,
        }
    }

    /// `{base_url}/{base_id}/{table}[/{record_id}]`, with each segment
    /// percent-encoded so table names may contain spaces.
    fn table_url(&self, table: &str, record_id: Option<&str>) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| StoreError::Network(format!("Invalid store URL {}: {}", self.base_url, err)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::Network(format!("Store URL {} cannot hold a path", self.base_url)))?;
            segments.pop_if_empty().push(&self.base_id).push(table);
            if let Some(id) = record_id {
                segments.push(id);
            }
        }

        Ok(url)
    }

    async fn fetch_page(&self, offset: Option<&str>) -> Result<RecordPage, StoreError> {
        let url = self.table_url(&self.accounts_table, None)?;

        let mut request = self.http.get(url).bearer_auth(&self.token);
        if let Some(offset) = offset {
            request = request.query(&[("offset", offset)]);
        }

        let response = ensure_success(request.send().await?).await?;

        response
            .json::<RecordPage>()
            .await
            .map_err(|err| StoreError::Parse(format!("Failed to parse record listing: {}", err.without_url())))
    }
}

#[derive(Debug, Deserialize)]
struct RecordPage {
    records: Vec<AccountRecord>,
    /// Present while more pages remain.
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Serialize)]
struct FieldsBody<'a, T> {
    fields: &'a T,
}

async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn list_records(&self) -> Result<Vec<AccountRecord>, StoreError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut seen_offsets = HashSet::new();

        loop {
            let page = self.fetch_page(offset.as_deref()).await?;
            records.extend(page.records);

            match page.offset {
                Some(next) => {
                    // A repeated token would page forever.
                    if !seen_offsets.insert(next.clone()) {
                        return Err(StoreError::Parse(format!(
                            "Record listing repeated offset {} after {} records",
                            next,
                            records.len()
                        )));
                    }
                    tracing::debug!(fetched = records.len(), "Following record listing offset");
                    offset = Some(next);
                }
                None => break,
            }
        }

        Ok(records)
    }

    async fn update_record(&self, record_id: &str, update: &RecordUpdate) -> Result<(), StoreError> {
        let url = self.table_url(&self.accounts_table, Some(record_id))?;

        let response = self
            .http
            .patch(url)
            .bearer_auth(&self.token)
            .json(&FieldsBody { fields: update })
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn append_history_entry(&self, entry: &HistoryEntry) -> Result<(), StoreError> {
        let url = self.table_url(&self.history_table, None)?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&FieldsBody { fields: entry })
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}
