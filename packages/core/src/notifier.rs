//! Aggregate run report.
//!
//! One HTML message per run, sent best-effort: a failed send is logged and
//! never changes the run's outcome.

use std::sync::Arc;

use crate::services::NotificationChannel;
use crate::summary::RunSummary;

/// Render the report. Every group line is present, even when empty.
pub fn format_summary(summary: &RunSummary) -> String {
    let mut msg = String::from("📊 <b>Instagram Sync Report</b>\n\n");
    msg.push_str(&group_line("✅", "Active", &summary.active));
    msg.push_str(&group_line("⚠️", "Ad Issue", &summary.ad_issue));
    msg.push_str(&group_line("❌", "Suspended", &summary.suspended));
    msg
}

fn group_line(icon: &str, label: &str, members: &[String]) -> String {
    let names: Vec<String> = members.iter().map(|name| escape_html(name)).collect();
    format!(
        "{} <b>{}:</b> {} → {}\n",
        icon,
        label,
        members.len(),
        names.join(", ")
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Send the report. Returns whether the channel accepted it.
pub async fn send_summary(
    channel: &Arc<dyn NotificationChannel + Send + Sync>,
    summary: &RunSummary,
) -> bool {
    let message = format_summary(summary);

    match channel.send_message(&message).await {
        Ok(()) => {
            tracing::info!(accounts = summary.total(), "Sync report sent");
            true
        }
        Err(err) => {
            tracing::error!("Failed to send sync report: {}", err);
            false
        }
    }
}
