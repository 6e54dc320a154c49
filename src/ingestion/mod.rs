//! Document ingestion: PDF parsing, chunking, and embedding

pub mod chunker;
pub mod parser;

pub use chunker::TextChunker;
pub use parser::{PdfParser, ParsedDocument};

use std::sync::Arc;

use crate::config::{ChunkingConfig, EmbeddingConfig};
use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::document::{Chunk, Document};

/// Parse, chunk, and embed a topic PDF
pub struct IngestPipeline {
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
}

impl IngestPipeline {
    /// Create a new pipeline
    pub fn new(
        chunking: &ChunkingConfig,
        embeddings: &EmbeddingConfig,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            chunker: TextChunker::new(
                chunking.chunk_size,
                chunking.chunk_overlap,
                chunking.min_chunk_size,
            ),
            embedder,
            batch_size: embeddings.batch_size.max(1),
        }
    }

    /// Embedding dimensions of the underlying provider
    pub fn dimensions(&self) -> usize {
        self.embedder.dimensions()
    }

    /// Run the full pipeline over raw PDF bytes
    pub async fn ingest(
        &self,
        topic_key: &str,
        filename: &str,
        data: &[u8],
    ) -> Result<(Document, Vec<Chunk>)> {
        let parsed = PdfParser::parse(filename, data)?;

        let mut document = Document::new(
            topic_key,
            filename,
            parsed.content_hash.clone(),
            data.len() as u64,
        );
        document.total_pages = parsed.total_pages;

        let mut chunks = self.chunker.chunk_document(&document, &parsed);
        if chunks.is_empty() {
            return Err(Error::file_parse(
                filename,
                "Document produced no chunks after splitting",
            ));
        }

        tracing::info!(
            "Parsed {} ({} chars, {} chunks), embedding with {}",
            filename,
            parsed.content.len(),
            chunks.len(),
            self.embedder.name()
        );

        for batch in chunks.chunks_mut(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            for (chunk, embedding) in batch.iter_mut().zip(embeddings) {
                chunk.embedding = embedding;
            }
        }

        document.total_chunks = chunks.len() as u32;

        Ok((document, chunks))
    }
}
