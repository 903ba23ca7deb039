use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

use standup::notify::{format_commit_summary, WebhookPayload};
use standup::transport::ScriptedTransport;
use standup::{DeliveryMethod, SlackNotifier, SlackTarget, TransportError};

const WEBHOOK: &str = "https://hooks.slack.com/services/T000/B000/XXXX";

#[tokio::test]
async fn webhook_wins_when_both_mechanisms_are_configured() {
    let transport = Arc::new(ScriptedTransport::new().respond(200, "ok"));
    let target = SlackTarget::default()
        .with_webhook(WEBHOOK)
        .with_bot_token("xoxb-123");
    let slack = SlackNotifier::new(target, transport.clone());

    let result = slack.test_connection().await;

    assert!(result.success);
    assert_eq!(result.method, DeliveryMethod::Webhook);
    assert_eq!(result.method.to_string(), "webhook");

    let request = &transport.requests()[0];
    assert_eq!(request.url, WEBHOOK);
    assert_eq!(request.bearer_token, None);
}

#[tokio::test]
async fn bot_token_alone_probes_with_auth_test() {
    let transport = Arc::new(
        ScriptedTransport::new().respond_json(200, json!({"ok": true, "team": "acme", "user": "standup"})),
    );
    let slack = SlackNotifier::new(SlackTarget::default().with_bot_token("xoxb-123"), transport.clone());

    let result = slack.test_connection().await;

    assert!(result.success);
    assert_eq!(result.method.to_string(), "bot");
    assert_eq!(transport.requests()[0].url, "https://slack.com/api/auth.test");
}

#[tokio::test]
async fn bot_probe_reports_slack_error_field() {
    let transport = Arc::new(
        ScriptedTransport::new().respond_json(200, json!({"ok": false, "error": "invalid_auth"})),
    );
    let slack = SlackNotifier::new(SlackTarget::default().with_bot_token("xoxb-bad"), transport);

    let result = slack.test_connection().await;

    assert!(!result.success);
    assert_eq!(result.method, DeliveryMethod::Bot);
    assert_eq!(result.error.as_deref(), Some("Slack API error: invalid_auth"));
}

#[tokio::test]
async fn failed_delivery_returns_false() {
    let transport = Arc::new(
        ScriptedTransport::new().fail(TransportError::Timeout("30s elapsed".to_string())),
    );
    let slack = SlackNotifier::new(SlackTarget::default().with_webhook(WEBHOOK), transport.clone());

    assert!(!slack.send_commit_summary("Worked on retries.", 4).await);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn summary_is_posted_with_title_and_count() {
    let transport = Arc::new(ScriptedTransport::new().respond_json(200, json!({"ok": true})));
    let target = SlackTarget {
        default_channel: "#standups".to_string(),
        ..SlackTarget::default()
    }
    .with_bot_token("xoxb-123");
    let slack = SlackNotifier::new(target, transport.clone());
    let date = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();

    assert!(slack.send_commit_summary_for("Shipped the parser.", 2, date).await);

    let request = &transport.requests()[0];
    assert_eq!(request.url, "https://slack.com/api/chat.postMessage");
    assert_eq!(request.body["channel"], "#standups");
    assert_eq!(
        request.body["text"],
        "*:clipboard: Daily Standup - Tue May 14 2024*\n_2 commits today_\n\nShipped the parser."
    );
}

#[test]
fn webhook_payload_round_trips_summary_text() {
    let summary = "Yesterday: added retries & backoff.\nToday: \"Slack\" delivery <soon>.";
    let date = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();
    let text = format_commit_summary(summary, 3, date);

    let payload = WebhookPayload::new(&SlackTarget::default(), text.clone());
    let wire = serde_json::to_string(&payload).unwrap();
    let parsed: WebhookPayload = serde_json::from_str(&wire).unwrap();

    assert_eq!(parsed, payload);
    assert!(parsed.text.ends_with(summary));
    assert_eq!(parsed.text, text);
}
