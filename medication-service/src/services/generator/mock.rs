//! Mock generator implementations for testing.

use super::{GeneratorError, TextGenerator};
use async_trait::async_trait;

/// Canned text generator used by integration tests.
pub struct MockTextGenerator {
    reply: Option<String>,
    fail: bool,
}

impl MockTextGenerator {
    /// Generator that returns a fixed reply.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            fail: false,
        }
    }

    /// Generator that echoes the incoming message.
    pub fn echoing() -> Self {
        Self {
            reply: None,
            fail: false,
        }
    }

    /// Generator that produces empty text.
    pub fn empty() -> Self {
        Self {
            reply: Some(String::new()),
            fail: false,
        }
    }

    /// Generator whose calls always fail.
    pub fn failing() -> Self {
        Self {
            reply: None,
            fail: true,
        }
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, message: &str) -> Result<String, GeneratorError> {
        if self.fail {
            return Err(GeneratorError::ApiError(
                "mock generator failure".to_string(),
            ));
        }

        Ok(self
            .reply
            .clone()
            .unwrap_or_else(|| format!("Mock reply for: {}", message)))
    }

    async fn health_check(&self) -> Result<(), GeneratorError> {
        if self.fail {
            Err(GeneratorError::ApiError(
                "mock generator failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoing_mock_includes_message() {
        let generator = MockTextGenerator::echoing();
        let reply = generator.generate("hello").await.unwrap();
        assert!(reply.contains("hello"));
    }

    #[tokio::test]
    async fn failing_mock_errors() {
        let generator = MockTextGenerator::failing();
        assert!(generator.generate("hello").await.is_err());
    }
}
