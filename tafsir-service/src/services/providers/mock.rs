//! Mock provider implementation for testing.

use super::{CommentaryProvider, ProviderError};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum MockOutcome {
    Reply(String),
    Fail(String),
}

/// Scripted commentary provider. Records every prompt it receives.
pub struct MockCommentaryProvider {
    outcome: MockOutcome,
    prompts: Mutex<Vec<String>>,
}

impl MockCommentaryProvider {
    /// Always answer with `commentary`.
    pub fn replying(commentary: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Reply(commentary.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with a network error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Fail(message.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        match self.prompts.lock() {
            Ok(prompts) => prompts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl CommentaryProvider for MockCommentaryProvider {
    async fn generate_commentary(&self, prompt: &str) -> Result<String, ProviderError> {
        match self.prompts.lock() {
            Ok(mut prompts) => prompts.push(prompt.to_string()),
            Err(poisoned) => poisoned.into_inner().push(prompt.to_string()),
        }

        match &self.outcome {
            MockOutcome::Reply(text) => Ok(text.clone()),
            MockOutcome::Fail(message) => Err(ProviderError::NetworkError(message.clone())),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
