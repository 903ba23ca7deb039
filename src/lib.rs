//! Daily standup reports from git history.
//!
//! Commit subjects are summarized by an LLM provider ([`llm`]) and the report
//! can be posted to Slack ([`notify`]).

pub mod cli;
pub mod collectors;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod llm;
pub mod notify;
pub mod prompts;
pub mod transport;

pub use domain::{AIResponse, ConnectionTest, DeliveryMethod, ProviderConfig, ProviderKind, SlackTarget, TokenUsage};
pub use errors::{LlmError, NotifyError, TransportError};
pub use llm::{create_client, create_client_from_tag, SummarizationClient};
pub use notify::SlackNotifier;
