use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::retry::{sleep_or_cancel, RetryPolicy};
use super::SummarizationClient;
use crate::domain::{AIResponse, ProviderConfig, ProviderKind, TokenUsage};
use crate::errors::LlmError;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const TEMPERATURE: f64 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 1000;
const RATE_LIMITED: u16 = 429;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct UsageMetadata {
    prompt_token_count: u32,
    candidates_token_count: u32,
    total_token_count: u32,
}

/// generateContent client. Retries HTTP 429 with exponential backoff.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    retry: RetryPolicy,
    cancel: Option<CancellationToken>,
    transport: Arc<dyn HttpTransport>,
}

impl GeminiClient {
    pub fn new(config: ProviderConfig, transport: Arc<dyn HttpTransport>) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey(
                ProviderKind::Gemini.display_name().to_string(),
            ));
        }

        Ok(Self {
            api_key: config.api_key,
            model: config
                .model
                .unwrap_or_else(|| ProviderKind::Gemini.default_model().to_string()),
            base_url: GEMINI_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            cancel: None,
            transport,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Lets a caller abort a pending backoff wait.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn build_request(&self, prompt: &str, system_prompt: Option<&str>) -> Result<HttpRequest, LlmError> {
        let full_prompt = match system_prompt {
            Some(system) => format!("{}\n\n{}", system, prompt),
            None => prompt.to_string(),
        };

        let body = serde_json::to_value(GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: full_prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        })
        .map_err(|e| invalid(format!("failed to encode request: {}", e)))?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        Ok(HttpRequest::post(url, body).query("key", &self.api_key))
    }

    fn parse(response: &HttpResponse) -> Result<AIResponse, LlmError> {
        let parsed: GeminiResponse = response.json().map_err(|e| invalid(e.to_string()))?;

        let content = parsed
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| invalid("missing candidates[0].content.parts[0].text"))?;

        let usage = parsed.usage_metadata.unwrap_or_default();

        Ok(AIResponse {
            content,
            usage: Some(TokenUsage {
                prompt_tokens: usage.prompt_token_count,
                completion_tokens: usage.candidates_token_count,
                total_tokens: usage.total_token_count,
            }),
        })
    }
}

fn invalid(reason: impl Into<String>) -> LlmError {
    LlmError::InvalidResponse {
        provider: ProviderKind::Gemini.display_name().to_string(),
        reason: reason.into(),
    }
}

#[async_trait]
impl SummarizationClient for GeminiClient {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_response(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<AIResponse, LlmError> {
        let request = self.build_request(prompt, system_prompt)?;
        let mut backoff = self.retry.backoff();

        loop {
            tracing::debug!(
                model = %self.model,
                attempt = backoff.attempt(),
                "Generating response with Gemini"
            );

            let response = self.transport.post_json(request.clone()).await.map_err(|e| {
                tracing::error!(error = %e, "Gemini request failed");
                LlmError::from(e)
            })?;

            if response.status == RATE_LIMITED {
                match backoff.next_delay() {
                    Some(delay) => {
                        tracing::warn!(
                            "Rate limit hit. Retrying in {}s... (Attempt {}/{})",
                            delay.as_secs_f64(),
                            backoff.attempt() - 1,
                            backoff.max_attempts()
                        );
                        sleep_or_cancel(delay, self.cancel.as_ref()).await?;
                        continue;
                    }
                    None => {
                        tracing::error!(attempts = backoff.attempt(), "Gemini rate limit exhausted");
                        return Err(LlmError::RateLimitExhausted {
                            provider: ProviderKind::Gemini.display_name().to_string(),
                            attempts: backoff.attempt(),
                        });
                    }
                }
            }

            if !response.is_success() {
                tracing::error!(status = response.status, body = %response.body, "Gemini API error");
                return Err(LlmError::Api {
                    provider: ProviderKind::Gemini.display_name().to_string(),
                    status: response.status,
                    status_text: response.status_text,
                    body: response.body,
                });
            }

            return Self::parse(&response);
        }
    }
}
