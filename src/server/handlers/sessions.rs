use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::core::errors::ApiError;
use crate::core::security::require_api_key;
use crate::notation::{segment, Segment};
use crate::session::{Role, SharedSession, Turn};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TurnView {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
}

impl From<&Turn> for TurnView {
    fn from(turn: &Turn) -> Self {
        let segments = match turn.role {
            Role::Assistant => Some(segment(&turn.content)),
            Role::User => None,
        };
        Self {
            role: turn.role,
            content: turn.content.clone(),
            created_at: turn.created_at,
            segments,
        }
    }
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    require_api_key(&headers, &state.session_token)?;
    let session_id = state.sessions.create().await;
    Ok(Json(json!({ "session_id": session_id })))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_api_key(&headers, &state.session_token)?;
    let id = parse_session_id(&session_id)?;
    if !state.sessions.remove(&id).await {
        return Err(session_not_found());
    }
    Ok(Json(json!({ "deleted": true })))
}

pub async fn get_session_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_api_key(&headers, &state.session_token)?;
    let session = find_session(&state, &session_id).await?;

    let orchestrator = session.lock().await;
    let messages: Vec<TurnView> = orchestrator
        .history()
        .turns()
        .iter()
        .map(TurnView::from)
        .collect();

    Ok(Json(json!({ "messages": messages })))
}

pub async fn post_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_api_key(&headers, &state.session_token)?;

    if payload.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message must not be empty".to_string()));
    }
    let max_len = state.config.app.max_input_length;
    if payload.message.chars().count() > max_len {
        return Err(ApiError::BadRequest(format!(
            "Message exceeds {} characters",
            max_len
        )));
    }

    let session = find_session(&state, &session_id).await?;

    // Run the turn on its own task so a dropped connection cannot leave
    // the history with a question and no answer.
    let outcome = tokio::spawn(async move {
        let mut orchestrator = session.lock().await;
        orchestrator.handle_turn(payload.message).await
    })
    .await
    .map_err(ApiError::internal)?;

    let turns: Vec<TurnView> = outcome.turns.iter().map(TurnView::from).collect();
    Ok(Json(json!({
        "turns": turns,
        "notices": outcome.notices,
        "sources": outcome.sources
    })))
}

async fn find_session(state: &AppState, raw_id: &str) -> Result<SharedSession, ApiError> {
    let id = parse_session_id(raw_id)?;
    state.sessions.get(&id).await.ok_or_else(session_not_found)
}

fn parse_session_id(raw_id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw_id).map_err(|_| session_not_found())
}

fn session_not_found() -> ApiError {
    ApiError::NotFound("Session not found".to_string())
}
