use std::collections::HashMap;

pub const OPENAI_API_KEY: &str = "openai-api-key";
pub const GEMINI_API_KEY: &str = "gemini-api-key";
pub const SLACK_WEBHOOK_URL: &str = "slack-webhook-url";
pub const SLACK_BOT_TOKEN: &str = "slack-bot-token";

/// Read-only access to credentials, keyed by name.
pub trait SecretStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// Secrets from `STANDUP_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn new() -> Self {
        Self
    }

    /// Environment variable backing a secret name.
    pub fn env_var(name: &str) -> String {
        format!("STANDUP_{}", name.replace('-', "_").to_uppercase())
    }
}

impl SecretStore for EnvSecretStore {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(Self::env_var(name))
            .ok()
            .filter(|v| !v.trim().is_empty())
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    secrets: HashMap<String, String>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.secrets.insert(name.to_string(), value.to_string());
        self
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, name: &str) -> Option<String> {
        self.secrets
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_var_names_follow_secret_names() {
        assert_eq!(EnvSecretStore::env_var(OPENAI_API_KEY), "STANDUP_OPENAI_API_KEY");
        assert_eq!(EnvSecretStore::env_var(SLACK_BOT_TOKEN), "STANDUP_SLACK_BOT_TOKEN");
    }

    #[test]
    fn blank_secrets_are_absent() {
        let store = MemorySecretStore::new()
            .with(GEMINI_API_KEY, "  ")
            .with(SLACK_WEBHOOK_URL, "https://hooks.slack.com/services/x");
        assert_eq!(store.get(GEMINI_API_KEY), None);
        assert!(store.get(SLACK_WEBHOOK_URL).is_some());
        assert_eq!(store.get("unknown"), None);
    }
}
