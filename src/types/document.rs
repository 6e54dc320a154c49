//! Document and chunk types with source tracking for citations

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// An ingested topic document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Topic key this document belongs to
    pub topic_key: String,
    /// Source PDF filename
    pub filename: String,
    /// Content hash of the extracted text
    pub content_hash: String,
    /// Total number of pages
    pub total_pages: Option<u32>,
    /// Total number of chunks created
    pub total_chunks: u32,
    /// File size in bytes
    pub file_size: u64,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document record
    pub fn new(
        topic_key: impl Into<String>,
        filename: impl Into<String>,
        content_hash: String,
        file_size: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic_key: topic_key.into(),
            filename: filename.into(),
            content_hash,
            total_pages: None,
            total_chunks: 0,
            file_size,
            ingested_at: chrono::Utc::now(),
        }
    }
}

/// Source information for a chunk (used for citations)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSource {
    /// Source filename
    pub filename: String,
    /// Page number (1-indexed, when attributable)
    pub page_number: Option<u32>,
    /// Total pages in the document
    pub page_count: Option<u32>,
}

impl ChunkSource {
    /// Format source for display
    pub fn format_citation(&self) -> String {
        match self.page_number {
            Some(page) => format!("{}, Page {}", self.filename, page),
            None => self.filename.clone(),
        }
    }
}

/// A chunk of text from a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Text content
    pub content: String,
    /// Embedding vector
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
    /// Source information for citations
    pub source: ChunkSource,
    /// Character position in the extracted document text
    pub char_start: usize,
    pub char_end: usize,
    /// Chunk index within the document
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a new chunk without an embedding
    pub fn new(
        document_id: Uuid,
        content: String,
        source: ChunkSource,
        char_start: usize,
        char_end: usize,
        chunk_index: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content,
            embedding: Vec::new(),
            source,
            char_start,
            char_end,
            chunk_index,
        }
    }
}

/// Hash extracted text for change detection
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
