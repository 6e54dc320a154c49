//! LLM provider trait for answer generation

use async_trait::async_trait;

use crate::error::Result;
use crate::types::response::Citation;

/// Trait for LLM-based answer generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate an answer given a question, retrieved context, and citations
    async fn generate_answer(
        &self,
        question: &str,
        context: &str,
        citations: &[Citation],
    ) -> Result<String>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model being used
    fn model(&self) -> &str;
}
