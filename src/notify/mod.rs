//! Slack delivery for finished reports.
//!
//! Two mechanisms, picked fresh on every call: an incoming webhook when one is
//! configured, otherwise the Web API with a bot token.

pub mod payload;

use chrono::{Local, NaiveDate};
use std::sync::Arc;

use crate::domain::{ConnectionTest, DeliveryMethod, SlackTarget};
use crate::errors::NotifyError;
use crate::prompts::SLACK_TEST_MESSAGE;
use crate::transport::{HttpRequest, HttpTransport};

pub use payload::{format_commit_summary, PostMessagePayload, SlackApiResponse, WebhookPayload};

pub const SLACK_API_BASE: &str = "https://slack.com/api";

pub struct SlackNotifier {
    target: SlackTarget,
    api_base: String,
    transport: Arc<dyn HttpTransport>,
}

impl SlackNotifier {
    pub fn new(target: SlackTarget, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            target,
            api_base: SLACK_API_BASE.to_string(),
            transport,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Probes the configured mechanism without posting a report.
    ///
    /// The webhook has no read-only endpoint, so its probe posts a one-line
    /// test message. The bot path only calls `auth.test`.
    pub async fn test_connection(&self) -> ConnectionTest {
        let result = match self.target.delivery_method() {
            Some(DeliveryMethod::Webhook) => self
                .post_webhook(SLACK_TEST_MESSAGE)
                .await
                .map(|_| DeliveryMethod::Webhook),
            Some(DeliveryMethod::Bot) => self.auth_test().await.map(|_| DeliveryMethod::Bot),
            None => Err(NotifyError::NotConfigured),
        };

        match result {
            Ok(method) => {
                tracing::info!(%method, "Slack connection test passed");
                ConnectionTest::ok(method)
            }
            Err(e) => {
                let method = self
                    .target
                    .delivery_method()
                    .unwrap_or(DeliveryMethod::Webhook);
                tracing::warn!(%method, error = %e, "Slack connection test failed");
                ConnectionTest::failed(method, e.to_string())
            }
        }
    }

    /// Posts `text` and reports which mechanism delivered it.
    pub async fn send_message(&self, text: &str) -> Result<DeliveryMethod, NotifyError> {
        match self.target.delivery_method() {
            Some(DeliveryMethod::Webhook) => {
                self.post_webhook(text).await?;
                Ok(DeliveryMethod::Webhook)
            }
            Some(DeliveryMethod::Bot) => {
                self.post_message(text).await?;
                Ok(DeliveryMethod::Bot)
            }
            None => Err(NotifyError::NotConfigured),
        }
    }

    /// Formats and posts a summary dated today. Any failure becomes `false`.
    pub async fn send_commit_summary(&self, summary: &str, commit_count: usize) -> bool {
        self.send_commit_summary_for(summary, commit_count, Local::now().date_naive())
            .await
    }

    pub async fn send_commit_summary_for(
        &self,
        summary: &str,
        commit_count: usize,
        date: NaiveDate,
    ) -> bool {
        let text = format_commit_summary(summary, commit_count, date);
        match self.send_message(&text).await {
            Ok(method) => {
                tracing::info!(%method, commit_count, "Standup sent to Slack");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to send standup to Slack");
                false
            }
        }
    }

    async fn post_webhook(&self, text: &str) -> Result<(), NotifyError> {
        let url = self.target.webhook().ok_or(NotifyError::NotConfigured)?;
        let body = serde_json::to_value(WebhookPayload::new(&self.target, text))
            .map_err(|e| NotifyError::InvalidResponse(e.to_string()))?;

        let response = self.transport.post_json(HttpRequest::post(url, body)).await?;
        if !response.is_success() {
            return Err(NotifyError::Http {
                status: response.status,
                body: response.body,
            });
        }
        Ok(())
    }

    async fn post_message(&self, text: &str) -> Result<(), NotifyError> {
        let body = serde_json::to_value(PostMessagePayload::new(&self.target, text))
            .map_err(|e| NotifyError::InvalidResponse(e.to_string()))?;
        self.call_api("chat.postMessage", body).await
    }

    async fn auth_test(&self) -> Result<(), NotifyError> {
        self.call_api("auth.test", serde_json::json!({})).await
    }

    async fn call_api(&self, method: &str, body: serde_json::Value) -> Result<(), NotifyError> {
        let token = self.target.token().ok_or(NotifyError::NotConfigured)?;
        let request = HttpRequest::post(format!("{}/{}", self.api_base, method), body).bearer(token);

        let response = self.transport.post_json(request).await?;
        if !response.is_success() {
            return Err(NotifyError::Http {
                status: response.status,
                body: response.body,
            });
        }

        let envelope: SlackApiResponse = response
            .json()
            .map_err(|e| NotifyError::InvalidResponse(e.to_string()))?;
        if !envelope.ok {
            return Err(NotifyError::Api(
                envelope.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
        Ok(())
    }
}
