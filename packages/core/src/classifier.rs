//! Per-account classification.
//!
//! A pure function of the stored baseline, the fetch outcome, and the
//! account's threshold. Across runs the status only lives in the store:
//! OK and AdIssue toggle on every successful fetch, and SuspectedSuspended
//! lasts until the next successful fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::records::{format_timestamp, RecordUpdate};

/// Result of asking the metrics provider for one account's count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched(i64),
    Failed,
}

/// Status values as written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    #[serde(rename = "✅ OK")]
    Ok,
    #[serde(rename = "Ad Issue?")]
    AdIssue,
    #[serde(rename = "Suspended?")]
    SuspectedSuspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Ok => "✅ OK",
            AccountStatus::AdIssue => "Ad Issue?",
            AccountStatus::SuspectedSuspended => "Suspended?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The provider answered; counts and delta are known.
    Observed {
        previous: i64,
        current: i64,
        delta: i64,
        status: AccountStatus,
    },
    /// Every attempt failed.
    FetchFailed,
}

impl Classification {
    pub fn status(&self) -> AccountStatus {
        match self {
            Classification::Observed { status, .. } => *status,
            Classification::FetchFailed => AccountStatus::SuspectedSuspended,
        }
    }

    pub fn flagged(&self) -> bool {
        self.status() != AccountStatus::Ok
    }

    pub fn delta(&self) -> Option<i64> {
        match self {
            Classification::Observed { delta, .. } => Some(*delta),
            Classification::FetchFailed => None,
        }
    }

    /// Fields to patch onto the account record. A failed fetch leaves both
    /// counts untouched.
    pub fn to_update(&self, checked_at: DateTime<Utc>) -> RecordUpdate {
        let (previous_followers, current_followers) = match self {
            Classification::Observed { previous, current, .. } => (Some(*previous), Some(*current)),
            Classification::FetchFailed => (None, None),
        };

        RecordUpdate {
            previous_followers,
            current_followers,
            last_checked: format_timestamp(checked_at),
            flagged: self.flagged(),
            status: self.status(),
        }
    }
}

/// Classify one account.
///
/// `previous` is the count the store holds from the last run. When the
/// store has none, the fresh count stands in for it and the delta is zero.
pub fn classify(previous: Option<i64>, outcome: FetchOutcome, threshold: i64) -> Classification {
    let current = match outcome {
        FetchOutcome::Fetched(count) => count,
        FetchOutcome::Failed => return Classification::FetchFailed,
    };

    let previous = previous.unwrap_or(current);
    let status = if current < threshold {
        AccountStatus::AdIssue
    } else {
        AccountStatus::Ok
    };

    Classification::Observed {
        previous,
        current,
        delta: current.saturating_sub(previous),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn growth_above_threshold_is_ok() {
        let c = classify(Some(100), FetchOutcome::Fetched(120), 15);
        assert_eq!(
            c,
            Classification::Observed {
                previous: 100,
                current: 120,
                delta: 20,
                status: AccountStatus::Ok,
            }
        );
        assert!(!c.flagged());
    }

    #[test]
    fn drop_below_threshold_is_ad_issue() {
        let c = classify(Some(80), FetchOutcome::Fetched(40), 50);
        assert_eq!(c.status(), AccountStatus::AdIssue);
        assert_eq!(c.delta(), Some(-40));
        assert!(c.flagged());
    }

    #[test]
    fn count_equal_to_threshold_is_ok() {
        let c = classify(Some(50), FetchOutcome::Fetched(50), 50);
        assert_eq!(c.status(), AccountStatus::Ok);
    }

    #[test]
    fn first_observation_has_zero_delta() {
        let c = classify(None, FetchOutcome::Fetched(300), 15);
        assert_eq!(
            c,
            Classification::Observed {
                previous: 300,
                current: 300,
                delta: 0,
                status: AccountStatus::Ok,
            }
        );
    }

    #[test]
    fn extreme_baseline_saturates_delta() {
        let c = classify(Some(i64::MIN), FetchOutcome::Fetched(1), 15);
        assert_eq!(c.delta(), Some(i64::MAX));
        assert_eq!(c.status(), AccountStatus::AdIssue);
    }

    #[test]
    fn failed_fetch_is_suspected_suspended() {
        let c = classify(Some(100), FetchOutcome::Failed, 15);
        assert_eq!(c, Classification::FetchFailed);
        assert_eq!(c.status(), AccountStatus::SuspectedSuspended);
        assert!(c.flagged());
        assert_eq!(c.delta(), None);
    }

    #[test]
    fn failed_fetch_update_leaves_counts_alone() {
        let at = Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap();
        let update = Classification::FetchFailed.to_update(at);

        assert_eq!(update.previous_followers, None);
        assert_eq!(update.current_followers, None);
        assert_eq!(update.status, AccountStatus::SuspectedSuspended);
        assert!(update.flagged);
        assert_eq!(update.last_checked, "2026-10-15T09:00:00.000Z");
    }

    #[test]
    fn observed_update_shifts_counts() {
        let at = Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap();
        let update = classify(Some(100), FetchOutcome::Fetched(120), 15).to_update(at);

        assert_eq!(update.previous_followers, Some(100));
        assert_eq!(update.current_followers, Some(120));
        assert_eq!(update.status, AccountStatus::Ok);
        assert!(!update.flagged);
    }

    #[test]
    fn status_strings_match_serialized_form() {
        for status in [
            AccountStatus::Ok,
            AccountStatus::AdIssue,
            AccountStatus::SuspectedSuspended,
        ] {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::Value::String(status.as_str().to_string())
            );
        }
    }

    proptest! {
        #[test]
        fn at_or_above_threshold_is_never_flagged(
            previous in proptest::option::of(0i64..10_000_000),
            threshold in 0i64..1_000_000,
            extra in 0i64..1_000_000,
        ) {
            let current = threshold + extra;
            let c = classify(previous, FetchOutcome::Fetched(current), threshold);
            prop_assert_eq!(c.status(), AccountStatus::Ok);
            prop_assert!(!c.flagged());
        }

        #[test]
        fn below_threshold_is_always_flagged(
            previous in proptest::option::of(0i64..10_000_000),
            current in 0i64..1_000_000,
            gap in 1i64..1_000_000,
        ) {
            let c = classify(previous, FetchOutcome::Fetched(current), current + gap);
            prop_assert_eq!(c.status(), AccountStatus::AdIssue);
            prop_assert!(c.flagged());
        }

        #[test]
        fn delta_is_current_minus_baseline(
            previous in proptest::option::of(0i64..10_000_000),
            current in 0i64..10_000_000,
            threshold in 0i64..1_000_000,
        ) {
            let c = classify(previous, FetchOutcome::Fetched(current), threshold);
            prop_assert_eq!(c.delta(), Some(current - previous.unwrap_or(current)));
        }

        #[test]
        fn any_stored_baseline_classifies_without_overflow(
            previous in any::<i64>(),
            current in any::<i64>(),
            threshold in any::<i64>(),
        ) {
            let c = classify(Some(previous), FetchOutcome::Fetched(current), threshold);
            prop_assert_eq!(c.delta(), Some(current.saturating_sub(previous)));
            prop_assert_eq!(c.flagged(), current < threshold);
        }

        #[test]
        fn failure_ignores_counts_and_threshold(
            previous in proptest::option::of(0i64..10_000_000),
            threshold in -1_000i64..1_000_000,
        ) {
            let c = classify(previous, FetchOutcome::Failed, threshold);
            prop_assert_eq!(c, Classification::FetchFailed);
        }
    }
}
