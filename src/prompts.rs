/// All user-facing strings and prompts for standup
///
/// This module centralizes all text constants for easy maintenance

// LLM Prompts
pub const STANDUP_SYSTEM_PROMPT: &str = "You are an expert at summarizing software development progress for daily standup meetings. Create concise, clear summaries that highlight key accomplishments and changes.";
pub const STANDUP_PROMPT_HEADER: &str = "Please summarize the following git commits into a concise daily standup update:";
pub const STANDUP_PROMPT_FOOTER: &str = "Format the summary as a brief, professional update suitable for a team standup meeting.";

// Generate Command Messages
pub const MSG_GENERATING: &str = "📝 Generating daily standup...";
pub const MSG_NO_COMMITS: &str = "No commits found for today.";
pub const MSG_SENDING_TO_SLACK: &str = "Sending to Slack...";
pub const MSG_SLACK_SENT: &str = "✅ Daily standup sent to Slack!";
pub const MSG_SLACK_SEND_FAILED: &str = "❌ Failed to send message to Slack";

// Slack Messages
pub const MSG_TESTING_SLACK: &str = "Testing Slack connection...";
pub const MSG_SLACK_NOT_CONFIGURED: &str = "Slack not configured";
pub const MSG_SLACK_CONFIG_INSTRUCTION: &str = "Set one of these environment variables:\n  export STANDUP_SLACK_WEBHOOK_URL=https://hooks.slack.com/services/...\n  export STANDUP_SLACK_BOT_TOKEN=xoxb-...";
pub const SLACK_TEST_MESSAGE: &str = ":white_check_mark: Standup bot connected";

// Health Check Messages
pub const MSG_HEALTH_CHECK: &str = "🏥 Checking standup health...";
pub const MSG_ALL_SYSTEMS_OK: &str = "\n✅ All systems operational!";
pub const MSG_ISSUES_DETECTED: &str = "\n⚠️ Some issues detected";

// Init Messages
pub const MSG_INITIALIZING: &str = "🔧 Initializing standup...";
pub const MSG_INIT_COMPLETE: &str = "✅ standup is ready!";

// Configuration File Content
pub const DEFAULT_CONFIG_CONTENT: &str = r##"# standup configuration
# Summarize today's commits into a standup report

provider: gemini  # openai | gemini

openai:
  model: gpt-3.5-turbo

gemini:
  model: gemini-2.0-flash

slack:
  default_channel: "#general"
  bot_username: AI Commit Bot
  bot_icon: ":robot_face:"

request_timeout_secs: 30
"##;

/// Environment variable hint for a provider's API key.
pub fn api_key_instruction(env_var: &str) -> String {
    format!("Set this system environment variable:\n  export {}=your-key", env_var)
}
