//! Provider abstractions for embeddings and answer generation
//!
//! Embeddings always come from a local Ollama server; answers can come from
//! the hosted Groq API or from Ollama.

pub mod embedding;
pub mod groq;
pub mod llm;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
