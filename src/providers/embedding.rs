//! Embedding provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for generating text embeddings
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts
    ///
    /// Default implementation calls `embed` sequentially; implementations
    /// with native batch endpoints should override.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Embedding dimensions (768 for nomic-embed-text)
    fn dimensions(&self) -> usize;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32])
        }

        fn dimensions(&self) -> usize {
            1
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_default_embed_batch_preserves_order() {
        let embedder = CountingEmbedder;
        let texts = vec!["a".to_string(), "abc".to_string(), "ab".to_string()];

        let embeddings = tokio_test::block_on(embedder.embed_batch(&texts)).unwrap();

        assert_eq!(embeddings.len(), 3);
        assert_eq!(embeddings[0], vec![1.0]);
        assert_eq!(embeddings[1], vec![3.0]);
        assert_eq!(embeddings[2], vec![2.0]);
    }
}
