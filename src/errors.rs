use thiserror::Error;

/// Failures below the HTTP status line: the request never produced a response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to send HTTP request: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout(error.to_string())
        } else if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else {
            TransportError::Request(error.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Unsupported AI provider: {0}")]
    UnsupportedProvider(String),

    #[error("API key is required for the {0} provider")]
    MissingApiKey(String),

    #[error("No commits to summarize")]
    NoCommits,

    #[error("{provider} API error: {status} {status_text}{}", format_body(.body))]
    Api {
        provider: String,
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("{provider} rate limit still exceeded after {attempts} attempts")]
    RateLimitExhausted { provider: String, attempts: u32 },

    #[error("Invalid response format from {provider} API: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Request cancelled while waiting to retry")]
    Cancelled,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

fn format_body(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" - {}", body)
    }
}

impl LlmError {
    /// Status code of the failed call, when the failure came from the API.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            LlmError::RateLimitExhausted { .. } => Some(429),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Slack not configured: set a webhook URL or a bot token")]
    NotConfigured,

    #[error("Slack returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Slack API error: {0}")]
    Api(String),

    #[error("Unexpected Slack response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
