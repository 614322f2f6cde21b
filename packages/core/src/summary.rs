//! Per-run grouping of classified accounts.
//!
//! The loop records one tagged outcome per account; the three report groups
//! are derived from those afterwards.

use crate::classifier::{AccountStatus, Classification};

/// One processed account and how it was classified this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountOutcome {
    pub username: String,
    pub classification: Classification,
}

/// Usernames grouped by final status, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub active: Vec<String>,
    pub ad_issue: Vec<String>,
    pub suspended: Vec<String>,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[AccountOutcome]) -> Self {
        let mut summary = Self::default();

        for outcome in outcomes {
            let group = match outcome.classification.status() {
                AccountStatus::Ok => &mut summary.active,
                AccountStatus::AdIssue => &mut summary.ad_issue,
                AccountStatus::SuspectedSuspended => &mut summary.suspended,
            };
            group.push(outcome.username.clone());
        }

        summary
    }

    pub fn total(&self) -> usize {
        self.active.len() + self.ad_issue.len() + self.suspended.len()
    }
}
