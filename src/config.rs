//! Configuration for the Q&A service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Fixed document corpus
    #[serde(default)]
    pub corpus: CorpusConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Answer cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Load from the given path if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// A single topic in the fixed corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Stable key used in the API (e.g. "admission_process")
    pub key: String,
    /// Human-readable title
    pub title: String,
    /// PDF filename inside the document directory
    pub filename: String,
}

impl TopicConfig {
    fn new(key: &str, title: &str, filename: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            filename: filename.to_string(),
        }
    }
}

/// Fixed document corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory containing the topic PDFs
    pub document_dir: PathBuf,
    /// Topics available for selection
    #[serde(default = "default_topics")]
    pub topics: Vec<TopicConfig>,
}

fn default_topics() -> Vec<TopicConfig> {
    vec![
        TopicConfig::new("college_info", "About College", "about_college.pdf"),
        TopicConfig::new("admission_process", "Admission Process", "admissionprocess.pdf"),
        TopicConfig::new("cutoffs", "Cut-off", "cuttoffs.pdf"),
        TopicConfig::new("seat_matrix", "Seat Allotment", "seatsmatrix.pdf"),
        TopicConfig::new("fees", "Fees Structure", "feesstructure.pdf"),
    ]
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            document_dir: PathBuf::from("documents"),
            topics: default_topics(),
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
    /// Minimum chunk size (skip smaller chunks)
    pub min_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            min_chunk_size: 50,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per question
    pub top_k: usize,
    /// Minimum cosine similarity for a chunk to be used (0.0-1.0)
    pub similarity_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            similarity_threshold: 0.0,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding dimensions (768 for nomic-embed-text)
    pub dimensions: usize,
    /// Batch size for embedding generation during ingestion
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimensions: 768,
            batch_size: 32,
        }
    }
}

/// Which backend generates answers
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Hosted Groq chat-completions API
    #[default]
    Groq,
    /// Local Ollama server
    Ollama,
}

/// LLM configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Answer generation backend
    #[serde(default)]
    pub backend: LlmBackend,
    /// Groq configuration (used when backend = groq)
    #[serde(default)]
    pub groq: GroqConfig,
    /// Ollama configuration (embeddings always, generation when backend = ollama)
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Groq (OpenAI-compatible) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    /// API base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Environment variable holding the API key (never stored in the file)
    pub api_key_env: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "mixtral-8x7b-32768".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            temperature: 0.3,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Ollama configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "llama3.2:3b".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Answer cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached answers
    pub max_entries: usize,
    /// TTL for cache entries in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            ttl_secs: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_topics() {
        let config = AppConfig::default();
        assert_eq!(config.corpus.topics.len(), 5);
        assert!(config.corpus.topics.iter().any(|t| t.key == "fees"));
        assert!(config
            .corpus
            .topics
            .iter()
            .any(|t| t.filename == "about_college.pdf"));
    }

    #[test]
    fn test_chunking_defaults_match_original_splitter() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            enable_cors = false

            [llm]
            backend = "ollama"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.backend, LlmBackend::Ollama);
        // Unspecified sections fall back to defaults
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.llm.groq.model, "mixtral-8x7b-32768");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("/nonexistent/enrollease.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enrollease.toml");
        std::fs::write(
            &path,
            r#"
                [corpus]
                document_dir = "/srv/college-docs"

                [retrieval]
                top_k = 6
                similarity_threshold = 0.25
            "#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(
            config.corpus.document_dir,
            std::path::PathBuf::from("/srv/college-docs")
        );
        assert_eq!(config.retrieval.top_k, 6);
        // Topic list falls back to the default five
        assert_eq!(config.corpus.topics.len(), 5);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enrollease.toml");
        std::fs::write(&path, "server = \"not a table\"").unwrap();

        assert!(matches!(AppConfig::load(&path), Err(Error::Config(_))));
    }
}
