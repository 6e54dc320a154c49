//! Topic listing and preloading endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::response::TopicSummary;

/// Response for the topic listing
#[derive(Debug, Serialize)]
pub struct TopicListResponse {
    pub topics: Vec<TopicSummary>,
}

/// GET /api/topics - List selectable topics with load state
pub async fn list_topics(State(state): State<AppState>) -> Json<TopicListResponse> {
    Json(TopicListResponse {
        topics: state.registry().summaries(),
    })
}

/// Response for a topic load
#[derive(Debug, Serialize)]
pub struct LoadTopicResponse {
    pub key: String,
    pub filename: String,
    pub total_chunks: u32,
    pub total_pages: Option<u32>,
    pub built_at: chrono::DateTime<chrono::Utc>,
}

/// POST /api/topics/:key/load - Build (or rebuild) a topic index
pub async fn load_topic(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<LoadTopicResponse>> {
    let built = state.registry().reload(&key).await?;

    // A rebuilt index may contain different text
    state.cache().invalidate_topic(&key);

    Ok(Json(LoadTopicResponse {
        key: built.topic.key.clone(),
        filename: built.topic.filename.clone(),
        total_chunks: built.document.total_chunks,
        total_pages: built.document.total_pages,
        built_at: built.built_at,
    }))
}
