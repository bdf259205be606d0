//! Text-generation abstractions and implementations.
//!
//! The chat relay talks to the model through the [`TextGenerator`] trait so
//! the HTTP surface stays testable without a real model behind it.

pub mod inference;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for generator operations.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Generation timed out after {0}s")]
    Timeout(u64),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// A text-generation capability configured once at process start.
///
/// Implementations hold no per-conversation state; each call is a single
/// message in, single completion out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the given message.
    async fn generate(&self, message: &str) -> Result<String, GeneratorError>;

    /// Verify the backing model endpoint is reachable.
    async fn health_check(&self) -> Result<(), GeneratorError>;
}
