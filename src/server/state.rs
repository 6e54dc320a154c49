//! Application state for the Q&A server

use std::sync::Arc;

use crate::cache::AnswerCache;
use crate::chat::SessionStore;
use crate::config::{AppConfig, LlmBackend};
use crate::corpus::TopicRegistry;
use crate::error::Result;
use crate::ingestion::IngestPipeline;
use crate::providers::{
    groq::GroqLlm,
    ollama::{OllamaClient, OllamaEmbedder, OllamaLlm},
    EmbeddingProvider, LlmProvider,
};

/// Turns of history kept per chat session
const MAX_SESSION_TURNS: usize = 50;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Topic registry with per-topic indexes
    registry: TopicRegistry,
    /// Embedding provider (Ollama)
    embedder: Arc<dyn EmbeddingProvider>,
    /// Answer generation provider (Groq or Ollama)
    llm: Arc<dyn LlmProvider>,
    /// Answer cache
    cache: AnswerCache,
    /// Chat session store
    sessions: SessionStore,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig) -> Result<Self> {
        tracing::info!(
            "Initializing application state (llm backend: {:?})...",
            config.llm.backend
        );

        let ollama = Arc::new(OllamaClient::new(&config.llm.ollama)?);
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OllamaEmbedder::new(
            Arc::clone(&ollama),
            config.embeddings.dimensions,
        ));
        tracing::info!(
            "Embedding provider initialized ({} via ollama)",
            config.llm.ollama.embed_model
        );

        let llm: Arc<dyn LlmProvider> = match config.llm.backend {
            LlmBackend::Groq => {
                let groq = GroqLlm::new(&config.llm.groq)?;
                tracing::info!("LLM provider initialized (groq, model {})", groq.model());
                Arc::new(groq)
            }
            LlmBackend::Ollama => {
                let llm = OllamaLlm::new(ollama, config.llm.ollama.generate_model.clone());
                tracing::info!("LLM provider initialized (ollama, model {})", llm.model());
                Arc::new(llm)
            }
        };

        let pipeline = IngestPipeline::new(
            &config.chunking,
            &config.embeddings,
            Arc::clone(&embedder),
        );
        let registry = TopicRegistry::new(&config.corpus, pipeline);
        tracing::info!(
            "Topic registry initialized ({} topics from {})",
            config.corpus.topics.len(),
            config.corpus.document_dir.display()
        );

        let cache = AnswerCache::new(config.cache.max_entries, config.cache.ttl_secs);
        let sessions = SessionStore::new(MAX_SESSION_TURNS);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                registry,
                embedder,
                llm,
                cache,
                sessions,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the topic registry
    pub fn registry(&self) -> &TopicRegistry {
        &self.inner.registry
    }

    /// Get the embedding provider
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedder
    }

    /// Get the LLM provider
    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm
    }

    /// Get the answer cache
    pub fn cache(&self) -> &AnswerCache {
        &self.inner.cache
    }

    /// Get the session store
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }
}
