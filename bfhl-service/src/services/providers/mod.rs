//! AI provider abstractions and implementations.
//!
//! The `AI` operation only needs one-shot text generation, so there is a
//! single trait with a Gemini backend and a mock for tests and local runs.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Send `prompt` as-is and return the text of the first candidate, if any.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, ProviderError>;
}

/// Placeholder answer when the provider returns no usable text.
pub const UNKNOWN_ANSWER: &str = "Unknown";

/// Reduce a generated text to its first whitespace-delimited word.
pub fn first_word(text: Option<&str>) -> String {
    text.and_then(|t| t.split_whitespace().next())
        .unwrap_or(UNKNOWN_ANSWER)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_word_takes_leading_token() {
        assert_eq!(first_word(Some("  Paris is the capital\n")), "Paris");
        assert_eq!(first_word(Some("Mumbai.")), "Mumbai.");
    }

    #[test]
    fn first_word_defaults_to_unknown() {
        assert_eq!(first_word(None), UNKNOWN_ANSWER);
        assert_eq!(first_word(Some("")), UNKNOWN_ANSWER);
        assert_eq!(first_word(Some(" \t\n ")), UNKNOWN_ANSWER);
    }
}
