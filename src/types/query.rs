//! Query request types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query request against a selected topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Topic key to query (e.g. "admission_process")
    pub topic: String,

    /// The question to answer
    pub question: String,

    /// Number of chunks to retrieve (overrides config when set)
    #[serde(default)]
    pub top_k: Option<usize>,

    /// Minimum similarity threshold (overrides config when set)
    #[serde(default)]
    pub similarity_threshold: Option<f32>,

    /// Chat session to append this exchange to (created when absent)
    #[serde(default)]
    pub session_id: Option<Uuid>,

    /// Include raw retrieved chunks in the response
    #[serde(default)]
    pub include_chunks: bool,
}

impl QueryRequest {
    /// Create a new query
    pub fn new(topic: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            question: question.into(),
            top_k: None,
            similarity_threshold: None,
            session_id: None,
            include_chunks: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_request() {
        let request: QueryRequest =
            serde_json::from_str(r#"{"topic": "fees", "question": "What is the tuition fee?"}"#)
                .unwrap();
        assert_eq!(request.topic, "fees");
        assert!(request.top_k.is_none());
        assert!(request.session_id.is_none());
        assert!(!request.include_chunks);
    }
}
