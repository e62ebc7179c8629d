//! Slack release notifications.
//!
//! A best-effort announcement: failures are reported as warnings and never
//! fail a build that already produced a good archive.

use serde_json::{Value, json};
use std::time::Duration;
use tracing::warn;

use crate::release::{TableStyle, create_release_info};

/// Everything the notification message needs.
#[derive(Debug)]
pub struct ReleaseNotification<'a> {
    pub plugin_name: &'a str,
    pub version: &'a str,
    pub branch: &'a str,
    pub commit: &'a str,
    /// Where the archive can be fetched from, if published anywhere.
    pub download_url: Option<&'a str>,
}

/// Build the Slack Block Kit payload for a release.
pub fn build_payload(notification: &ReleaseNotification<'_>) -> Value {
    let info = create_release_info(
        notification.plugin_name,
        notification.branch,
        notification.commit,
        notification.version,
        TableStyle::Simple,
    );

    let mut blocks = vec![
        json!({
            "type": "header",
            "text": {
                "type": "plain_text",
                "text": format!(
                    "🚀 New Plugin Release: {} v{}",
                    notification.plugin_name,
                    notification.version.trim_start_matches('v')
                )
            }
        }),
        json!({
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": format!("```\n{info}\n```")
            }
        }),
    ];

    if let Some(url) = notification.download_url {
        blocks.push(json!({
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": format!("*Download:*\n{url}")
            }
        }));
    }

    json!({ "blocks": blocks })
}

/// Post the release notification to a Slack webhook.
///
/// Returns whether the notification was delivered. Any failure is logged
/// as a warning and swallowed.
pub async fn send_release_notification(
    webhook_url: &str,
    notification: &ReleaseNotification<'_>,
) -> bool {
    let payload = build_payload(notification);
    // Bounded wait: a stalled webhook must not hang an otherwise finished
    // build.
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!("could not construct HTTP client: {e}");
            return false;
        }
    };
    match client.post(webhook_url).json(&payload).send().await {
        Ok(response) => match response.error_for_status() {
            Ok(_) => true,
            Err(e) => {
                warn!("Slack webhook rejected the notification: {e}");
                false
            }
        },
        Err(e) => {
            warn!("failed to send Slack notification: {e}");
            false
        }
    }
}
