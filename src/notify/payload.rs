use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::SlackTarget;

/// Body for an incoming-webhook post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub text: String,
    pub username: String,
    pub icon_emoji: String,
    pub channel: String,
}

impl WebhookPayload {
    pub fn new(target: &SlackTarget, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            username: target.default_username.clone(),
            icon_emoji: target.default_icon.clone(),
            channel: target.default_channel.clone(),
        }
    }
}

/// Body for `chat.postMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMessagePayload {
    pub channel: String,
    pub text: String,
    pub username: String,
    pub icon_emoji: String,
}

impl PostMessagePayload {
    pub fn new(target: &SlackTarget, text: impl Into<String>) -> Self {
        Self {
            channel: target.default_channel.clone(),
            text: text.into(),
            username: target.default_username.clone(),
            icon_emoji: target.default_icon.clone(),
        }
    }
}

/// Slack Web API envelope: HTTP 200 even when the call failed.
#[derive(Debug, Deserialize)]
pub struct SlackApiResponse {
    pub ok: bool,
    pub error: Option<String>,
}

pub fn format_commit_summary(summary: &str, commit_count: usize, date: NaiveDate) -> String {
    let commits = if commit_count == 1 {
        "1 commit".to_string()
    } else {
        format!("{} commits", commit_count)
    };

    format!(
        "*:clipboard: Daily Standup - {}*\n_{} today_\n\n{}",
        date.format("%a %b %d %Y"),
        commits,
        summary.trim_end()
    )
}
