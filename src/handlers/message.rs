use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{NextStep, OutboundResult};
use crate::services::conversation;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MessageRequest {
    pub message: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub response: String,
    pub metadata: ReplyMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMetadata {
    pub qualified: bool,
    pub next_step: NextStep,
    pub score: u8,
}

impl From<OutboundResult> for MessageResponse {
    fn from(result: OutboundResult) -> Self {
        Self {
            response: result.response,
            metadata: ReplyMetadata {
                qualified: result.qualified,
                next_step: result.next_step,
                score: result.score,
            },
        }
    }
}

pub async fn post_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(payload) = payload?;

    let phone = payload
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| state.config.default_caller.clone());

    tracing::info!(phone = %phone, message = %payload.message, "incoming message");

    let result = conversation::process_message(&state, &phone, &payload.message).await?;
    Ok(Json(result.into()))
}
