//! Chat relay over the configured text generator.

use crate::services::record_chat_generation;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

/// Reply returned when the model produces no usable text.
pub const DEFAULT_REPLY: &str = "Sorry, I didn't understand that.";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Forward the user's message to the text generator and relay its first
/// response verbatim. No prompt engineering, no conversation history.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    tracing::debug!(message_len = request.message.len(), "Received chat request");

    let generated = state
        .generator
        .generate(&request.message)
        .await
        .map_err(|e| {
            record_chat_generation("error");
            tracing::error!(error = %e, "Text generation failed");
            AppError::InternalError(anyhow::anyhow!(e))
        })?;

    record_chat_generation("ok");
    let reply = if generated.trim().is_empty() {
        DEFAULT_REPLY.to_string()
    } else {
        generated
    };

    Ok(Json(ChatResponse { reply }))
}
