//! Fixed topic corpus: registry and per-topic vector indexes

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;

use crate::config::{CorpusConfig, TopicConfig};
use crate::error::{Error, Result};
use crate::index::VectorIndex;
use crate::ingestion::IngestPipeline;
use crate::types::document::Document;
use crate::types::response::TopicSummary;

/// A built index for one topic
pub struct TopicIndex {
    /// Topic this index belongs to
    pub topic: TopicConfig,
    /// Ingested document record
    pub document: Document,
    /// Vector index over the document's chunks
    pub index: VectorIndex,
    /// When the index was built
    pub built_at: chrono::DateTime<chrono::Utc>,
}

/// Registry of the fixed topics and their lazily built indexes
pub struct TopicRegistry {
    document_dir: PathBuf,
    topics: Vec<TopicConfig>,
    pipeline: IngestPipeline,
    indexes: DashMap<String, Arc<TopicIndex>>,
}

impl TopicRegistry {
    /// Create a registry from the corpus configuration
    pub fn new(config: &CorpusConfig, pipeline: IngestPipeline) -> Self {
        Self {
            document_dir: config.document_dir.clone(),
            topics: config.topics.clone(),
            pipeline,
            indexes: DashMap::new(),
        }
    }

    /// Look up a topic by key
    pub fn topic(&self, key: &str) -> Result<&TopicConfig> {
        self.topics
            .iter()
            .find(|t| t.key == key)
            .ok_or_else(|| Error::TopicNotFound(key.to_string()))
    }

    /// Get the index for a topic, building it on first use
    pub async fn ensure_loaded(&self, key: &str) -> Result<Arc<TopicIndex>> {
        if let Some(entry) = self.indexes.get(key) {
            return Ok(Arc::clone(&entry));
        }

        let topic = self.topic(key)?.clone();
        let built = self.build_index(&topic).await?;
        let built = Arc::new(built);

        // Concurrent first loads may both build; last insert wins
        if self.indexes.insert(key.to_string(), Arc::clone(&built)).is_some() {
            tracing::debug!("Index for topic '{}' was built concurrently", key);
        }

        Ok(built)
    }

    /// Rebuild a topic index from disk
    pub async fn reload(&self, key: &str) -> Result<Arc<TopicIndex>> {
        let topic = self.topic(key)?.clone();
        let built = Arc::new(self.build_index(&topic).await?);
        self.indexes.insert(key.to_string(), Arc::clone(&built));
        Ok(built)
    }

    async fn build_index(&self, topic: &TopicConfig) -> Result<TopicIndex> {
        let path = self.document_dir.join(&topic.filename);
        tracing::info!("Building index for topic '{}' from {}", topic.key, path.display());

        let data = tokio::fs::read(&path).await.map_err(|e| {
            Error::Config(format!(
                "Failed to read document for topic '{}' at {}: {}",
                topic.key,
                path.display(),
                e
            ))
        })?;

        let (document, chunks) = self
            .pipeline
            .ingest(&topic.key, &topic.filename, &data)
            .await?;

        let mut index = VectorIndex::new(self.pipeline.dimensions());
        index.insert_batch(chunks)?;

        tracing::info!(
            "Topic '{}' indexed: {} chunks, {} pages",
            topic.key,
            index.len(),
            document.total_pages.unwrap_or(0)
        );

        Ok(TopicIndex {
            topic: topic.clone(),
            document,
            index,
            built_at: chrono::Utc::now(),
        })
    }

    /// Summaries of all topics, including load state
    pub fn summaries(&self) -> Vec<TopicSummary> {
        self.topics
            .iter()
            .map(|t| {
                let loaded = self.indexes.get(&t.key);
                TopicSummary {
                    key: t.key.clone(),
                    title: t.title.clone(),
                    filename: t.filename.clone(),
                    loaded: loaded.is_some(),
                    total_chunks: loaded.as_ref().map(|i| i.document.total_chunks),
                    total_pages: loaded.as_ref().and_then(|i| i.document.total_pages),
                }
            })
            .collect()
    }
}
