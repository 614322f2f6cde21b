//! Record shapes exchanged with the tabular store.
//!
//! Account records are read as an opaque field map because the store omits
//! empty cells and may hand back whole numbers as floats. The write-side
//! shapes ([`RecordUpdate`], [`HistoryEntry`]) are typed and serialize to
//! the store's column names.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::classifier::AccountStatus;

/// Column names of the tracked-accounts table.
pub mod fields {
    pub const USERNAME: &str = "Username";
    pub const THRESHOLD: &str = "Shadowban Threshold";
    pub const PREVIOUS_FOLLOWERS: &str = "Previous Followers";
    pub const CURRENT_FOLLOWERS: &str = "Current Followers";
    pub const STATUS: &str = "Status";
    pub const FLAGGED: &str = "Flagged?";
    pub const LAST_CHECKED: &str = "Last Checked";
}

/// One row of the tracked-accounts table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Opaque record id assigned by the store.
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl AccountRecord {
    /// The tracked username, or `None` when the cell is missing or blank.
    pub fn username(&self) -> Option<&str> {
        self.fields
            .get(fields::USERNAME)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Per-account threshold, falling back to `default` when absent.
    pub fn threshold(&self, default: i64) -> i64 {
        self.fields
            .get(fields::THRESHOLD)
            .and_then(read_count)
            .unwrap_or(default)
    }

    /// The count written by the previous run. This run's baseline.
    pub fn current_followers(&self) -> Option<i64> {
        self.fields.get(fields::CURRENT_FOLLOWERS).and_then(read_count)
    }
}

fn read_count(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Partial update for one account record. Absent counts are left untouched
/// by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordUpdate {
    #[serde(rename = "Previous Followers", skip_serializing_if = "Option::is_none")]
    pub previous_followers: Option<i64>,
    #[serde(rename = "Current Followers", skip_serializing_if = "Option::is_none")]
    pub current_followers: Option<i64>,
    #[serde(rename = "Last Checked")]
    pub last_checked: String,
    #[serde(rename = "Flagged?")]
    pub flagged: bool,
    #[serde(rename = "Status")]
    pub status: AccountStatus,
}

/// Append-only time-series row, one per successfully fetched account per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Followers")]
    pub followers: i64,
    #[serde(rename = "Change")]
    pub change: i64,
    /// Link field; the store expects a list of record ids.
    #[serde(rename = "Source Record")]
    pub source_record: Vec<String>,
}

impl HistoryEntry {
    pub fn new(
        username: &str,
        followers: i64,
        change: i64,
        source_record_id: &str,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username: username.to_string(),
            date: format_timestamp(recorded_at),
            followers,
            change,
            source_record: vec![source_record_id.to_string()],
        }
    }
}

/// RFC 3339 in UTC with millisecond precision, as the store's date fields
/// accept it.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(fields: Value) -> AccountRecord {
        serde_json::from_value(json!({ "id": "rec1", "fields": fields })).unwrap()
    }

    #[test]
    fn reads_typed_fields() {
        let rec = record(json!({
            "Username": "alice",
            "Shadowban Threshold": 50,
            "Current Followers": 120
        }));

        assert_eq!(rec.username(), Some("alice"));
        assert_eq!(rec.threshold(15), 50);
        assert_eq!(rec.current_followers(), Some(120));
    }

    #[test]
    fn missing_fields_fall_back() {
        let rec = record(json!({ "Username": "bob" }));
        assert_eq!(rec.threshold(15), 15);
        assert_eq!(rec.current_followers(), None);
    }

    #[test]
    fn blank_username_is_missing() {
        assert_eq!(record(json!({ "Username": "   " })).username(), None);
        assert_eq!(record(json!({})).username(), None);
    }

    #[test]
    fn record_without_fields_object_deserializes() {
        let rec: AccountRecord = serde_json::from_value(json!({ "id": "rec9" })).unwrap();
        assert!(rec.fields.is_empty());
    }

    #[test]
    fn whole_floats_are_read_as_counts() {
        let rec = record(json!({ "Current Followers": 120.0, "Shadowban Threshold": 15.5 }));
        assert_eq!(rec.current_followers(), Some(120));
        // fractional threshold is unreadable, so the default applies
        assert_eq!(rec.threshold(15), 15);
    }

    #[test]
    fn text_count_is_treated_as_absent() {
        let rec = record(json!({ "Current Followers": "lots" }));
        assert_eq!(rec.current_followers(), None);
    }

    #[test]
    fn failed_fetch_update_omits_counts() {
        let update = RecordUpdate {
            previous_followers: None,
            current_followers: None,
            last_checked: "2026-10-15T09:00:00.000Z".into(),
            flagged: true,
            status: AccountStatus::SuspectedSuspended,
        };

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "Last Checked": "2026-10-15T09:00:00.000Z",
                "Flagged?": true,
                "Status": "Suspended?"
            })
        );
    }

    #[test]
    fn history_entry_uses_store_columns() {
        let at = Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap();
        let entry = HistoryEntry::new("alice", 120, 20, "rec1", at);

        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "Username": "alice",
                "Date": "2026-10-15T09:00:00.000Z",
                "Followers": 120,
                "Change": 20,
                "Source Record": ["rec1"]
            })
        );
    }
}
