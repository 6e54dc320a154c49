//! API routes for the Q&A server

pub mod query;
pub mod sessions;
pub mod topics;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Topic selection
        .route("/topics", get(topics::list_topics))
        .route("/topics/:key/load", post(topics::load_topic))
        // Query
        .route("/query", post(query::query_topic))
        // Chat sessions
        .route("/sessions/:id", get(sessions::get_session))
        .route("/sessions/:id", delete(sessions::delete_session))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info(
    state: axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "enrollease",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document-grounded Q&A over college admissions PDFs",
        "llm": {
            "provider": state.llm().name(),
            "model": state.llm().model(),
        },
        "cache": state.cache().stats(),
        "endpoints": {
            "GET /api/topics": "List selectable topics",
            "POST /api/topics/:key/load": "Build (or rebuild) a topic index",
            "POST /api/query": "Ask a question against a topic",
            "GET /api/sessions/:id": "Get chat history for a session",
            "DELETE /api/sessions/:id": "Delete a chat session"
        }
    }))
}
