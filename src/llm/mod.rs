pub mod gemini;
pub mod openai;
pub mod retry;
pub mod summarizer;

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{AIResponse, ProviderConfig, ProviderKind};
use crate::errors::LlmError;
use crate::prompts::STANDUP_SYSTEM_PROMPT;
use crate::transport::HttpTransport;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use retry::RetryPolicy;
pub use summarizer::{commit_prompt, StandupReport};

#[async_trait]
pub trait SummarizationClient: Send + Sync {
    fn provider(&self) -> ProviderKind;

    fn model(&self) -> &str;

    /// One completion call (plus any provider-specific retries).
    async fn generate_response(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<AIResponse, LlmError>;

    /// Summarizes commit subjects into a standup update.
    ///
    /// Both providers share the prompt template and system prompt so the
    /// output reads the same whichever one is configured.
    async fn summarize_commits(&self, commits: &[String]) -> Result<String, LlmError> {
        if commits.is_empty() {
            return Err(LlmError::NoCommits);
        }

        let prompt = commit_prompt(commits);
        let response = self
            .generate_response(&prompt, Some(STANDUP_SYSTEM_PROMPT))
            .await?;

        if let Some(usage) = response.usage {
            tracing::debug!(
                provider = %self.provider(),
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Summary generated"
            );
        }

        Ok(response.content)
    }
}

pub fn create_client(
    kind: ProviderKind,
    config: ProviderConfig,
    transport: Arc<dyn HttpTransport>,
) -> Result<Box<dyn SummarizationClient>, LlmError> {
    match kind {
        ProviderKind::OpenAi => Ok(Box::new(OpenAiClient::new(config, transport))),
        ProviderKind::Gemini => Ok(Box::new(GeminiClient::new(config, transport)?)),
    }
}

/// Same as [`create_client`] but takes the provider tag as written in config.
pub fn create_client_from_tag(
    tag: &str,
    config: ProviderConfig,
    transport: Arc<dyn HttpTransport>,
) -> Result<Box<dyn SummarizationClient>, LlmError> {
    create_client(tag.parse()?, config, transport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ScriptedTransport;

    fn transport() -> Arc<dyn HttpTransport> {
        Arc::new(ScriptedTransport::new())
    }

    #[test]
    fn factory_picks_the_variant_by_tag() {
        let openai = create_client_from_tag("openai", ProviderConfig::new("sk"), transport()).unwrap();
        assert_eq!(openai.provider(), ProviderKind::OpenAi);

        let gemini = create_client_from_tag("gemini", ProviderConfig::new("AIza"), transport()).unwrap();
        assert_eq!(gemini.provider(), ProviderKind::Gemini);
        assert_eq!(gemini.model(), "gemini-pro");
    }

    #[test]
    fn factory_rejects_unknown_tags() {
        let result = create_client_from_tag("bogus", ProviderConfig::new("sk"), transport());
        assert!(matches!(result, Err(LlmError::UnsupportedProvider(tag)) if tag == "bogus"));
    }

    #[test]
    fn factory_surfaces_gemini_key_check() {
        let result = create_client(ProviderKind::Gemini, ProviderConfig::new(""), transport());
        assert!(matches!(result, Err(LlmError::MissingApiKey(_))));
    }

    #[tokio::test]
    async fn empty_commit_list_fails_before_any_request() {
        let scripted = Arc::new(ScriptedTransport::new());
        let client = create_client(ProviderKind::OpenAi, ProviderConfig::new("sk"), scripted.clone()).unwrap();
        let err = client.summarize_commits(&[]).await.unwrap_err();
        assert!(matches!(err, LlmError::NoCommits));
        assert_eq!(scripted.request_count(), 0);
    }
}
