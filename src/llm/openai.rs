use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::SummarizationClient;
use crate::domain::{AIResponse, ProviderConfig, ProviderKind, TokenUsage};
use crate::errors::LlmError;
use crate::transport::{HttpRequest, HttpTransport};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 1000;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Chat-completions client. One attempt per call; no retry on any status.
pub struct OpenAiClient {
    api_key: String,
    model: String,
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl OpenAiClient {
    pub fn new(config: ProviderConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_key: config.api_key,
            model: config
                .model
                .unwrap_or_else(|| ProviderKind::OpenAi.default_model().to_string()),
            base_url: OPENAI_BASE_URL.to_string(),
            transport,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_request(&self, prompt: &str, system_prompt: Option<&str>) -> Result<HttpRequest, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let body = serde_json::to_value(ChatRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        })
        .map_err(|e| self.invalid(format!("failed to encode request: {}", e)))?;

        Ok(HttpRequest::post(format!("{}/chat/completions", self.base_url), body)
            .bearer(&self.api_key))
    }

    fn invalid(&self, reason: impl Into<String>) -> LlmError {
        LlmError::InvalidResponse {
            provider: ProviderKind::OpenAi.display_name().to_string(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SummarizationClient for OpenAiClient {
    fn provider(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_response(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<AIResponse, LlmError> {
        tracing::debug!(model = %self.model, "Generating response with OpenAI");
        let request = self.build_request(prompt, system_prompt)?;

        let response = self.transport.post_json(request).await.map_err(|e| {
            tracing::error!(error = %e, "OpenAI request failed");
            LlmError::from(e)
        })?;

        if !response.is_success() {
            tracing::error!(status = response.status, "OpenAI API error");
            return Err(LlmError::Api {
                provider: ProviderKind::OpenAi.display_name().to_string(),
                status: response.status,
                status_text: response.status_text,
                body: String::new(),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| self.invalid(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| self.invalid("no message content in first choice"))?;

        let usage = parsed.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(AIResponse { content, usage })
    }
}
