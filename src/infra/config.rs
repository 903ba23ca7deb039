use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::slack::{DEFAULT_CHANNEL, DEFAULT_ICON, DEFAULT_USERNAME};
use crate::domain::{ProviderKind, SlackTarget};
use crate::prompts::DEFAULT_CONFIG_CONTENT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandupConfig {
    pub provider: ProviderKind,
    pub openai: ModelConfig,
    pub gemini: ModelConfig,
    pub slack: SlackConfig,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    pub default_channel: String,
    pub bot_username: String,
    pub bot_icon: String,
}

impl Default for StandupConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            openai: ModelConfig {
                model: "gpt-3.5-turbo".to_string(),
            },
            gemini: ModelConfig {
                model: "gemini-2.0-flash".to_string(),
            },
            slack: SlackConfig::default(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            default_channel: DEFAULT_CHANNEL.to_string(),
            bot_username: DEFAULT_USERNAME.to_string(),
            bot_icon: DEFAULT_ICON.to_string(),
        }
    }
}

impl StandupConfig {
    pub fn model_for(&self, provider: ProviderKind) -> &str {
        match provider {
            ProviderKind::OpenAi => &self.openai.model,
            ProviderKind::Gemini => &self.gemini.model,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Slack target with no credentials; callers attach webhook/token.
    pub fn slack_target(&self) -> SlackTarget {
        SlackTarget {
            webhook_url: None,
            bot_token: None,
            default_channel: self.slack.default_channel.clone(),
            default_username: self.slack.bot_username.clone(),
            default_icon: self.slack.bot_icon.clone(),
        }
    }
}

pub struct ConfigManager {
    source: Option<PathBuf>,
    config: StandupConfig,
}

impl ConfigManager {
    const CONFIG_FILE: &'static str = ".standup.yml";

    /// Loads `<repo>/.standup.yml`, then the user config file, then defaults.
    pub fn new(repo_root: impl AsRef<Path>) -> Result<Self> {
        let candidates = [
            Some(repo_root.as_ref().join(Self::CONFIG_FILE)),
            Self::user_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            if path.exists() {
                let config = Self::load_config(&path)?;
                tracing::debug!(path = %path.display(), "Loaded configuration");
                return Ok(Self {
                    source: Some(path),
                    config,
                });
            }
        }

        Ok(Self {
            source: None,
            config: StandupConfig::default(),
        })
    }

    fn load_config(path: &Path) -> Result<StandupConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(StandupConfig::default());
        }
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("standup").join("config.yml"))
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Effective configuration with environment overrides applied.
    pub fn get(&self) -> StandupConfig {
        let mut config = self.config.clone();

        if let Some(provider) = env_value("STANDUP_PROVIDER") {
            match provider.parse() {
                Ok(kind) => config.provider = kind,
                Err(e) => tracing::warn!(error = %e, "Ignoring STANDUP_PROVIDER"),
            }
        }
        if let Some(model) = env_value("STANDUP_MODEL") {
            match config.provider {
                ProviderKind::OpenAi => config.openai.model = model,
                ProviderKind::Gemini => config.gemini.model = model,
            }
        }
        if let Some(channel) = env_value("STANDUP_SLACK_CHANNEL") {
            config.slack.default_channel = channel;
        }

        config
    }

    pub fn create_default(repo_root: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        let config_path = repo_root.as_ref().join(Self::CONFIG_FILE);

        if config_path.exists() {
            return Ok(None);
        }

        std::fs::write(&config_path, DEFAULT_CONFIG_CONTENT)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        Ok(Some(config_path))
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn default_file_parses_back_to_defaults() {
        let config: StandupConfig = serde_yaml::from_str(DEFAULT_CONFIG_CONTENT).unwrap();
        assert_eq!(config, StandupConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: StandupConfig = serde_yaml::from_str(
            "provider: openai\nopenai:\n  model: gpt-4o\nslack:\n  default_channel: \"#standup\"\n",
        )
        .unwrap();

        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.model_for(ProviderKind::OpenAi), "gpt-4o");
        assert_eq!(config.model_for(ProviderKind::Gemini), "gemini-2.0-flash");
        assert_eq!(config.slack.default_channel, "#standup");
        assert_eq!(config.slack.bot_username, "AI Commit Bot");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn repo_file_wins_and_create_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".standup.yml"), "provider: openai\n").unwrap();

        let manager = ConfigManager::new(dir.path()).unwrap();
        assert_eq!(manager.config.provider, ProviderKind::OpenAi);
        assert_eq!(manager.source(), Some(dir.path().join(".standup.yml").as_path()));

        assert_eq!(ConfigManager::create_default(dir.path()).unwrap(), None);
        let contents = std::fs::read_to_string(dir.path().join(".standup.yml")).unwrap();
        assert_eq!(contents, "provider: openai\n");
    }

    #[test]
    fn slack_target_carries_display_defaults() {
        let target = StandupConfig::default().slack_target();
        assert_eq!(target.default_icon, ":robot_face:");
        assert!(!target.is_configured());
    }
}
