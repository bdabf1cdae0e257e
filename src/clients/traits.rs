use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix on every failure rendered as text.
pub const FAILURE_MARKER: &str = "⚠️";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("no API key configured (set OPENAI_API_KEY)")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("authentication failed ({status}): {message}")]
    Authentication { status: u16, message: String },
    #[error("rate limit exceeded: {message}")]
    RateLimited { message: String },
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl CompletionError {
    /// Displayable text for a failed call.
    pub fn to_failure_text(&self) -> String {
        format!("{} OpenAI Error: {}", FAILURE_MARKER, self)
    }
}

/// True when `text` was produced by [`CompletionError::to_failure_text`].
pub fn is_failure_text(text: &str) -> bool {
    text.starts_with(FAILURE_MARKER)
}

/// Success or failure of one completion call; exactly one string is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum CompletionOutcome {
    Success(String),
    Failure(String),
}

impl CompletionOutcome {
    pub fn text(&self) -> &str {
        match self {
            CompletionOutcome::Success(text) | CompletionOutcome::Failure(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            CompletionOutcome::Success(text) | CompletionOutcome::Failure(text) => text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CompletionOutcome::Success(_))
    }
}

impl From<Result<String, CompletionError>> for CompletionOutcome {
    fn from(result: Result<String, CompletionError>) -> Self {
        match result {
            Ok(text) => CompletionOutcome::Success(text),
            Err(err) => CompletionOutcome::Failure(err.to_failure_text()),
        }
    }
}

/// A hosted text-generation endpoint.
///
/// Implementors only provide [`complete`](CompletionClient::complete); callers
/// that need the never-fails contract use [`outcome`](CompletionClient::outcome)
/// or [`complete_text`](CompletionClient::complete_text).
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;

    async fn outcome(&self, prompt: &str) -> CompletionOutcome {
        let result = self.complete(prompt).await;
        if let Err(err) = &result {
            tracing::warn!("Completion failed: {}", err);
        }
        result.into()
    }

    /// Generated text, or the failure rendered as text.
    async fn complete_text(&self, prompt: &str) -> String {
        self.outcome(prompt).await.into_text()
    }
}
