//! In-memory vector index with exact cosine search
//!
//! The corpus is a handful of small PDFs, so an exact flat index is both
//! simpler and exact-recall compared to an approximate structure.

use crate::error::{Error, Result};
use crate::types::document::Chunk;

/// A retrieved chunk with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity (0.0-1.0, higher is more similar)
    pub similarity: f32,
}

/// Flat vector index over chunk embeddings
#[derive(Debug)]
pub struct VectorIndex {
    /// Embedding dimension
    dimensions: usize,
    /// Stored chunks, each carrying its embedding
    chunks: Vec<Chunk>,
}

impl VectorIndex {
    /// Create a new index
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            chunks: Vec::new(),
        }
    }

    /// Insert a chunk with its embedding
    pub fn insert(&mut self, chunk: Chunk) -> Result<()> {
        if chunk.embedding.is_empty() {
            return Err(Error::Index("Chunk has no embedding".to_string()));
        }
        if chunk.embedding.len() != self.dimensions {
            return Err(Error::Index(format!(
                "Embedding dimension mismatch: expected {}, got {}",
                self.dimensions,
                chunk.embedding.len()
            )));
        }

        self.chunks.push(chunk);
        Ok(())
    }

    /// Insert multiple chunks
    pub fn insert_batch(&mut self, chunks: Vec<Chunk>) -> Result<()> {
        for chunk in chunks {
            self.insert(chunk)?;
        }
        Ok(())
    }

    /// Search for the k most similar chunks by cosine similarity
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if query_embedding.len() != self.dimensions {
            return Err(Error::Index(format!(
                "Query dimension mismatch: expected {}, got {}",
                self.dimensions,
                query_embedding.len()
            )));
        }

        let mut results: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                chunk: chunk.clone(),
                similarity: cosine_similarity(query_embedding, &chunk.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);

        Ok(results)
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::ChunkSource;
    use uuid::Uuid;

    fn chunk_with_embedding(content: &str, embedding: Vec<f32>) -> Chunk {
        let mut chunk = Chunk::new(
            Uuid::new_v4(),
            content.to_string(),
            ChunkSource {
                filename: "seatsmatrix.pdf".to_string(),
                page_number: None,
                page_count: None,
            },
            0,
            content.len(),
            0,
        );
        chunk.embedding = embedding;
        chunk
    }

    #[test]
    fn test_insert_and_len() {
        let mut index = VectorIndex::new(3);
        assert!(index.is_empty());

        index
            .insert(chunk_with_embedding("a", vec![1.0, 0.0, 0.0]))
            .unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_insert_rejects_missing_embedding() {
        let mut index = VectorIndex::new(3);
        let result = index.insert(chunk_with_embedding("a", vec![]));
        assert!(matches!(result, Err(Error::Index(_))));
    }

    #[test]
    fn test_insert_rejects_wrong_dimension() {
        let mut index = VectorIndex::new(3);
        let result = index.insert(chunk_with_embedding("a", vec![1.0, 0.0]));
        assert!(matches!(result, Err(Error::Index(_))));
    }

    #[test]
    fn test_search_ranks_by_cosine() {
        let mut index = VectorIndex::new(3);
        let north = chunk_with_embedding("north", vec![1.0, 0.0, 0.0]);
        let east = chunk_with_embedding("east", vec![0.0, 1.0, 0.0]);
        let diagonal = chunk_with_embedding("diagonal", vec![0.7071, 0.7071, 0.0]);

        let north_id = north.id;
        let diagonal_id = diagonal.id;

        index.insert_batch(vec![north, east, diagonal]).unwrap();

        let results = index.search(&[0.9, 0.1, 0.0], 10).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].chunk.id, north_id);
        assert_eq!(results[1].chunk.id, diagonal_id);
        assert!(results[0].similarity > results[1].similarity);
    }

    #[test]
    fn test_search_truncates_to_k() {
        let mut index = VectorIndex::new(2);
        for i in 0..10 {
            index
                .insert(chunk_with_embedding(
                    &format!("chunk {i}"),
                    vec![i as f32 + 1.0, 1.0],
                ))
                .unwrap();
        }

        let results = index.search(&[1.0, 1.0], 3).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_search_rejects_wrong_query_dimension() {
        let index = VectorIndex::new(3);
        assert!(index.search(&[1.0, 0.0], 5).is_err());
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let mut index = VectorIndex::new(2);
        index
            .insert(chunk_with_embedding("zero", vec![0.0, 0.0]))
            .unwrap();

        let results = index.search(&[1.0, 0.0], 1).unwrap();
        assert_eq!(results[0].similarity, 0.0);
    }
}
