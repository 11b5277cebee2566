//! Mock provider implementation for testing.

use super::{ProviderError, TextProvider};
use async_trait::async_trait;

/// Mock text provider returning a canned reply.
pub struct MockTextProvider {
    reply: Result<Option<String>, String>,
}

impl MockTextProvider {
    /// Always answer with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(Some(reply.into())),
        }
    }

    /// Answer with no candidate text.
    pub fn empty() -> Self {
        Self { reply: Ok(None) }
    }

    /// Fail every call with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
        }
    }
}

impl Default for MockTextProvider {
    fn default() -> Self {
        Self::new("Mock response")
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<Option<String>, ProviderError> {
        self.reply
            .clone()
            .map_err(ProviderError::ApiError)
    }
}
