pub mod provider;
pub mod slack;

pub use provider::{AIResponse, ProviderConfig, ProviderKind, TokenUsage};
pub use slack::{ConnectionTest, DeliveryMethod, SlackTarget};
