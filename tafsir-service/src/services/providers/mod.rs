//! Commentary provider abstraction.
//!
//! The request handler only sees `CommentaryProvider`, so the Groq backend can
//! be swapped for the scripted mock in tests.

pub mod groq;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A single-turn text generation backend.
#[async_trait]
pub trait CommentaryProvider: Send + Sync {
    /// Send `prompt` as one user message and return the first completion.
    async fn generate_commentary(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}
