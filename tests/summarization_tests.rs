use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use standup::llm::{GeminiClient, OpenAiClient};
use standup::transport::ScriptedTransport;
use standup::{create_client, create_client_from_tag, LlmError, ProviderConfig, ProviderKind, SummarizationClient};

fn gemini_ok(text: &str) -> serde_json::Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
}

fn openai_ok(text: &str) -> serde_json::Value {
    json!({
        "choices": [{"message": {"content": text}}],
        "usage": {"prompt_tokens": 40, "completion_tokens": 20, "total_tokens": 60}
    })
}

fn commits() -> Vec<String> {
    vec![
        "Add retry to Gemini client".to_string(),
        "Post reports to Slack".to_string(),
        "Fix typo in README".to_string(),
    ]
}

#[tokio::test]
async fn openai_summary_is_one_call_and_returned_verbatim() {
    let summary = "- Added retries\n- Slack posting\n- Docs fix";
    let transport = Arc::new(ScriptedTransport::new().respond_json(200, openai_ok(summary)));
    let client = OpenAiClient::new(ProviderConfig::new("sk-test"), transport.clone());

    let result = client.summarize_commits(&commits()).await.unwrap();

    assert_eq!(result, summary);
    assert_eq!(transport.request_count(), 1);

    let body = &transport.requests()[0].body;
    assert_eq!(body["messages"][0]["role"], "system");
    let user_prompt = body["messages"][1]["content"].as_str().unwrap();
    assert!(user_prompt.contains(
        "Add retry to Gemini client\nPost reports to Slack\nFix typo in README"
    ));
}

#[tokio::test]
async fn gemini_summary_is_one_call_and_returned_verbatim() {
    let transport = Arc::new(ScriptedTransport::new().respond_json(200, gemini_ok("All good.")));
    let client = GeminiClient::new(ProviderConfig::new("AIza-test"), transport.clone()).unwrap();

    let result = client.summarize_commits(&commits()).await.unwrap();

    assert_eq!(result, "All good.");
    assert_eq!(transport.request_count(), 1);
    let text = transport.requests()[0].body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(text.starts_with("You are an expert at summarizing software development progress"));
    assert!(text.contains("Post reports to Slack"));
}

#[tokio::test(start_paused = true)]
async fn gemini_retries_rate_limits_with_doubling_delays() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .repeat(3, 429, "{\"error\":{\"code\":429}}")
            .respond_json(200, gemini_ok("Recovered.")),
    );
    let client = GeminiClient::new(ProviderConfig::new("AIza-test"), transport.clone()).unwrap();

    let started = tokio::time::Instant::now();
    let response = client.generate_response("prompt", None).await.unwrap();

    assert_eq!(response.content, "Recovered.");
    assert_eq!(transport.request_count(), 4);
    assert!(started.elapsed() >= Duration::from_secs(7));

    let intervals = transport.intervals();
    assert_eq!(intervals.len(), 3);
    for (observed, expected) in intervals.iter().zip([1u64, 2, 4]) {
        let expected = Duration::from_secs(expected);
        assert!(*observed >= expected, "waited {:?}, expected {:?}", observed, expected);
        assert!(*observed < expected + Duration::from_millis(100));
    }
}

#[tokio::test(start_paused = true)]
async fn gemini_gives_up_after_five_rate_limited_attempts() {
    let transport = Arc::new(ScriptedTransport::new().repeat(5, 429, "").respond_json(200, gemini_ok("late")));
    let client = GeminiClient::new(ProviderConfig::new("AIza-test"), transport.clone()).unwrap();

    let started = tokio::time::Instant::now();
    let err = client.generate_response("prompt", None).await.unwrap_err();

    match err {
        LlmError::RateLimitExhausted { attempts, .. } => assert_eq!(attempts, 5),
        other => panic!("expected RateLimitExhausted, got {:?}", other),
    }
    assert_eq!(transport.request_count(), 5);
    assert!(started.elapsed() >= Duration::from_secs(15));
}

#[tokio::test]
async fn openai_server_error_fails_after_one_attempt() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(500, "boom")
            .respond_json(200, openai_ok("unused")),
    );
    let client = OpenAiClient::new(ProviderConfig::new("sk-test"), transport.clone());

    let err = client.summarize_commits(&commits()).await.unwrap_err();

    match err {
        LlmError::Api { status, status_text, .. } => {
            assert_eq!(status, 500);
            assert_eq!(status_text, "Internal Server Error");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn transport_failures_surface_without_retry() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .fail(standup::TransportError::Connect("refused".to_string()))
            .respond_json(200, gemini_ok("unused")),
    );
    let client = GeminiClient::new(ProviderConfig::new("AIza-test"), transport.clone()).unwrap();

    let err = client.summarize_commits(&commits()).await.unwrap_err();
    assert!(matches!(err, LlmError::Transport(_)));
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn factory_returns_the_requested_variant() {
    let transport = Arc::new(ScriptedTransport::new());
    let config = ProviderConfig::new("key").with_model("some-model");

    let openai = create_client_from_tag("openai", config.clone(), transport.clone()).unwrap();
    assert_eq!(openai.provider(), ProviderKind::OpenAi);
    assert_eq!(openai.model(), "some-model");

    let gemini = create_client(ProviderKind::Gemini, config.clone(), transport.clone()).unwrap();
    assert_eq!(gemini.provider(), ProviderKind::Gemini);

    let err = create_client_from_tag("bogus", config, transport).err().unwrap();
    assert_eq!(err.to_string(), "Unsupported AI provider: bogus");
}
