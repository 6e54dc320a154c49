//! Chat session endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::chat::ChatSession;
use crate::error::{Error, Result};
use crate::server::state::AppState;

/// GET /api/sessions/:id - Chat history for a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatSession>> {
    state
        .sessions()
        .get(&id)
        .map(Json)
        .ok_or_else(|| Error::SessionNotFound(id.to_string()))
}

/// DELETE /api/sessions/:id - Delete a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if state.sessions().delete(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::SessionNotFound(id.to_string()))
    }
}
