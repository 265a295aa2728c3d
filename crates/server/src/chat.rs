use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{correlation_id, json_body, reject, ApiError};
use crate::state::AppState;

pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/chat", post(chat))
}

pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    const EVENT: &str = "api.chat.failed";
    let correlation_id = correlation_id();

    let request = json_body(EVENT, &correlation_id, body)?;
    // Non-UTF-8 header values are treated as absent.
    let session_id = headers.get(SESSION_HEADER).and_then(|value| value.to_str().ok());

    let turn = state
        .chat
        .respond(session_id, request.message.as_deref())
        .await
        .map_err(|error| reject(EVENT, &correlation_id, error))?;

    info!(
        event_name = "api.chat.replied",
        correlation_id = %correlation_id,
        session_id = %turn.session_id,
        intent = turn.intent.as_str(),
        exchange_id = turn.exchange_id.0,
        "chat turn answered"
    );

    Ok(Json(ChatResponse { reply: turn.reply }))
}
