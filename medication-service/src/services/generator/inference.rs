//! Text generator backed by a hosted inference endpoint.
//!
//! Speaks the Hugging Face text-generation wire format:
//! `POST {base_url}/models/{model}` with `{"inputs": ..}` returning
//! `[{"generated_text": ..}]`.

use super::{GeneratorError, TextGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Generator configuration, fixed at process start.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Base URL of the inference endpoint.
    pub base_url: String,
    /// Model identifier, e.g. `openai-community/gpt2`.
    pub model: String,
    /// Maximum output length per completion.
    pub max_new_tokens: u32,
    /// Hard deadline for a single generation call.
    pub timeout_secs: u64,
    /// Optional bearer token for hosted endpoints.
    pub api_token: Option<String>,
}

/// Inference endpoint text generator.
pub struct InferenceTextGenerator {
    config: InferenceConfig,
    client: Client,
}

impl InferenceTextGenerator {
    pub fn new(config: InferenceConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn api_url(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: Option<String>,
}

#[async_trait]
impl TextGenerator for InferenceTextGenerator {
    async fn generate(&self, message: &str) -> Result<String, GeneratorError> {
        let request = GenerateRequest {
            inputs: message,
            parameters: GenerateParameters {
                max_new_tokens: self.config.max_new_tokens,
                return_full_text: true,
            },
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = message.len(),
            "Sending request to inference endpoint"
        );

        let mut req = self.client.post(self.api_url()).json(&request);
        if let Some(token) = &self.config.api_token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                GeneratorError::Timeout(self.config.timeout_secs)
            } else {
                GeneratorError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::ApiError(format!("{}: {}", status, body)));
        }

        let outputs: Vec<GeneratedText> = response
            .json()
            .await
            .map_err(|e| GeneratorError::ApiError(format!("Invalid response body: {}", e)))?;

        // The endpoint returns one candidate per input; relay the first.
        Ok(outputs
            .into_iter()
            .next()
            .and_then(|o| o.generated_text)
            .unwrap_or_default())
    }

    async fn health_check(&self) -> Result<(), GeneratorError> {
        self.client
            .get(self.api_url())
            .send()
            .await
            .map_err(|e| GeneratorError::NetworkError(e.to_string()))?;
        Ok(())
    }
}
