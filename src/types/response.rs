//! Response types for queries and topic listings

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::Chunk;
use crate::generation::prompt::FALLBACK_ANSWER;

/// Citation from a source document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// Chunk ID
    pub chunk_id: Uuid,
    /// Document ID
    pub document_id: Uuid,
    /// Source filename
    pub filename: String,
    /// Page number (if attributable)
    pub page_number: Option<u32>,
    /// Exact snippet from the source
    pub snippet: String,
    /// Snippet with query terms wrapped in <mark> tags
    pub snippet_highlighted: String,
    /// Cosine similarity score (0.0-1.0)
    pub similarity_score: f32,
}

impl Citation {
    /// Create a citation from a chunk and similarity score
    pub fn from_chunk(chunk: &Chunk, similarity_score: f32) -> Self {
        Self {
            chunk_id: chunk.id,
            document_id: chunk.document_id,
            filename: chunk.source.filename.clone(),
            page_number: chunk.source.page_number,
            snippet: chunk.content.clone(),
            snippet_highlighted: chunk.content.clone(),
            similarity_score,
        }
    }

    /// Format citation for display in text
    pub fn format_inline(&self) -> String {
        match self.page_number {
            Some(page) => format!("[Source: {}, Page {}]", self.filename, page),
            None => format!("[Source: {}]", self.filename),
        }
    }

    /// Highlight query terms in the snippet with <mark> tags
    pub fn highlight_terms(&mut self, terms: &[&str]) {
        self.snippet_highlighted =
            crate::generation::citation::highlight_snippet(&self.snippet, terms);
    }
}

/// Response to a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer
    pub answer: String,
    /// Citations with source snippets
    pub citations: Vec<Citation>,
    /// Overall confidence score (0.0-1.0, mean citation similarity)
    pub confidence: f32,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Number of chunks retrieved before filtering
    pub chunks_retrieved: usize,
    /// Number of chunks used in the answer
    pub chunks_used: usize,
    /// Whether the answer came from the cache
    pub from_cache: bool,
    /// Chat session this exchange was recorded under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    /// Raw chunks (if include_chunks was set)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_chunks: Option<Vec<Chunk>>,
}

impl QueryResponse {
    /// Create a new query response
    pub fn new(answer: String, citations: Vec<Citation>, processing_time_ms: u64) -> Self {
        let confidence = if citations.is_empty() {
            0.0
        } else {
            citations.iter().map(|c| c.similarity_score).sum::<f32>() / citations.len() as f32
        };

        Self {
            answer,
            confidence,
            chunks_retrieved: citations.len(),
            chunks_used: citations.len(),
            citations,
            processing_time_ms,
            from_cache: false,
            session_id: None,
            raw_chunks: None,
        }
    }

    /// Response when no relevant chunks were found
    pub fn not_found(processing_time_ms: u64) -> Self {
        Self {
            answer: FALLBACK_ANSWER.to_string(),
            citations: Vec::new(),
            confidence: 0.0,
            processing_time_ms,
            chunks_retrieved: 0,
            chunks_used: 0,
            from_cache: false,
            session_id: None,
            raw_chunks: None,
        }
    }
}

/// Summary of a topic for the listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSummary {
    /// Topic key used in queries
    pub key: String,
    /// Human-readable title
    pub title: String,
    /// Source PDF filename
    pub filename: String,
    /// Whether the topic index has been built
    pub loaded: bool,
    /// Number of chunks in the index (when loaded)
    pub total_chunks: Option<u32>,
    /// Number of pages in the document (when loaded)
    pub total_pages: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::ChunkSource;

    fn test_chunk(content: &str, page: Option<u32>) -> Chunk {
        Chunk::new(
            Uuid::new_v4(),
            content.to_string(),
            ChunkSource {
                filename: "about_college.pdf".to_string(),
                page_number: page,
                page_count: Some(1),
            },
            0,
            content.len(),
            0,
        )
    }

    #[test]
    fn test_citation_format_inline() {
        let citation = Citation::from_chunk(&test_chunk("text", Some(2)), 0.8);
        assert_eq!(citation.format_inline(), "[Source: about_college.pdf, Page 2]");

        let citation = Citation::from_chunk(&test_chunk("text", None), 0.8);
        assert_eq!(citation.format_inline(), "[Source: about_college.pdf]");
    }

    #[test]
    fn test_confidence_is_mean_similarity() {
        let citations = vec![
            Citation::from_chunk(&test_chunk("a", None), 0.9),
            Citation::from_chunk(&test_chunk("b", None), 0.5),
        ];
        let response = QueryResponse::new("answer".to_string(), citations, 10);
        assert!((response.confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_not_found_uses_fallback_answer() {
        let response = QueryResponse::not_found(5);
        assert_eq!(response.answer, FALLBACK_ANSWER);
        assert_eq!(response.confidence, 0.0);
        assert!(response.citations.is_empty());
    }
}
