use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_CHANNEL: &str = "#general";
pub const DEFAULT_USERNAME: &str = "AI Commit Bot";
pub const DEFAULT_ICON: &str = ":robot_face:";

/// Where and how a report gets posted.
///
/// At least one of `webhook_url` / `bot_token` must be set before a send or a
/// connection test can succeed. When both are set the webhook wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackTarget {
    pub webhook_url: Option<String>,
    pub bot_token: Option<String>,
    pub default_channel: String,
    pub default_username: String,
    pub default_icon: String,
}

impl Default for SlackTarget {
    fn default() -> Self {
        Self {
            webhook_url: None,
            bot_token: None,
            default_channel: DEFAULT_CHANNEL.to_string(),
            default_username: DEFAULT_USERNAME.to_string(),
            default_icon: DEFAULT_ICON.to_string(),
        }
    }
}

impl SlackTarget {
    pub fn with_webhook(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = non_blank(url.into());
        self
    }

    pub fn with_bot_token(mut self, token: impl Into<String>) -> Self {
        self.bot_token = non_blank(token.into());
        self
    }

    pub fn webhook(&self) -> Option<&str> {
        self.webhook_url.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn token(&self) -> Option<&str> {
        self.bot_token.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.webhook().is_some() || self.token().is_some()
    }

    /// Webhook first, then bot token.
    pub fn delivery_method(&self) -> Option<DeliveryMethod> {
        if self.webhook().is_some() {
            Some(DeliveryMethod::Webhook)
        } else if self.token().is_some() {
            Some(DeliveryMethod::Bot)
        } else {
            None
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Webhook,
    Bot,
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMethod::Webhook => f.write_str("webhook"),
            DeliveryMethod::Bot => f.write_str("bot"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTest {
    pub success: bool,
    pub method: DeliveryMethod,
    pub error: Option<String>,
}

impl ConnectionTest {
    pub fn ok(method: DeliveryMethod) -> Self {
        Self {
            success: true,
            method,
            error: None,
        }
    }

    pub fn failed(method: DeliveryMethod, error: impl Into<String>) -> Self {
        Self {
            success: false,
            method,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_takes_priority_over_bot_token() {
        let target = SlackTarget::default()
            .with_webhook("https://hooks.slack.com/services/T/B/X")
            .with_bot_token("xoxb-1");
        assert_eq!(target.delivery_method(), Some(DeliveryMethod::Webhook));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let target = SlackTarget::default().with_webhook("   ").with_bot_token("");
        assert!(!target.is_configured());
        assert_eq!(target.delivery_method(), None);

        let target = SlackTarget {
            webhook_url: Some(String::new()),
            bot_token: Some("xoxb-1".to_string()),
            ..SlackTarget::default()
        };
        assert_eq!(target.delivery_method(), Some(DeliveryMethod::Bot));
    }
}
