use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of a remote generation call
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to model endpoint failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not decode model response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("prompt blocked by model: {0}")]
    Blocked(String),

    #[error("model returned no text candidates")]
    EmptyResponse,
}

/// Interface for a stateless text-generation model.
/// One call per prompt; no history is kept between calls.
#[async_trait]
pub trait TranslationLLM: Send + Sync {
    /// Generate a completion for `prompt` under `system_instruction`.
    /// Returns the text of the first candidate.
    async fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, LlmError>;
}
