//! Prompt templates for grounded answer generation

use crate::index::ScoredChunk;
use crate::types::response::Citation;

/// Answer returned when the documents do not cover the question
pub const FALLBACK_ANSWER: &str =
    "I am sorry, you might have to contact the college for more information on this.";

/// Prompt builder for document-grounded queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build context from retrieved chunks
    pub fn build_context(results: &[ScoredChunk]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!(
                "[{}] {}\n\nContent:\n{}\n\n---\n\n",
                i + 1,
                result.chunk.source.format_citation(),
                result.chunk.content
            ));
        }

        context
    }

    /// Grounding rules shared by both backends
    fn grounding_rules() -> String {
        format!(
            r#"You are an assistant answering questions about a college using ONLY the provided document excerpts.

RULES:
1. Use ONLY information that is EXPLICITLY stated in the CONTEXT
2. If the answer is not in the context, respond exactly with: "{fallback}"
3. NEVER use external knowledge or make assumptions beyond what is stated
4. Cite the source of each fact inline: [Source: filename] or [Source: filename, Page N]
5. Give correct and precise answers, staying close to the source text"#,
            fallback = FALLBACK_ANSWER
        )
    }

    /// System prompt for chat-style APIs (Groq)
    pub fn system_prompt() -> String {
        Self::grounding_rules()
    }

    /// User prompt for chat-style APIs: context, sources, and the question
    pub fn build_user_prompt(question: &str, context: &str, citations: &[Citation]) -> String {
        format!(
            r#"CONTEXT FROM THE SELECTED DOCUMENT:
{context}

AVAILABLE SOURCES:
{sources}

Question: {question}"#,
            context = context,
            sources = Self::format_sources_list(citations),
            question = question
        )
    }

    /// Full single-string prompt for completion-style APIs (Ollama)
    pub fn build_grounded_prompt(question: &str, context: &str, citations: &[Citation]) -> String {
        format!(
            "{rules}\n\n{user}\n\nAnswer using ONLY the document content above:",
            rules = Self::grounding_rules(),
            user = Self::build_user_prompt(question, context, citations)
        )
    }

    /// Format the numbered sources list
    fn format_sources_list(citations: &[Citation]) -> String {
        citations
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let mut source = format!("[{}] {}", i + 1, c.filename);
                if let Some(page) = c.page_number {
                    source.push_str(&format!(", Page {}", page));
                }
                source
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::{Chunk, ChunkSource};
    use uuid::Uuid;

    fn scored(content: &str, page: Option<u32>, similarity: f32) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk::new(
                Uuid::new_v4(),
                content.to_string(),
                ChunkSource {
                    filename: "admissionprocess.pdf".to_string(),
                    page_number: page,
                    page_count: Some(2),
                },
                0,
                content.len(),
                0,
            ),
            similarity,
        }
    }

    #[test]
    fn test_build_context_numbers_sources() {
        let results = vec![
            scored("Applications open in June.", Some(1), 0.9),
            scored("Submit transcripts by July.", Some(2), 0.8),
        ];
        let context = PromptBuilder::build_context(&results);

        assert!(context.contains("[1] admissionprocess.pdf, Page 1"));
        assert!(context.contains("[2] admissionprocess.pdf, Page 2"));
        assert!(context.contains("Applications open in June."));
    }

    #[test]
    fn test_grounded_prompt_carries_fallback_and_question() {
        let results = vec![scored("Fees are 50000 per year.", None, 0.9)];
        let citations: Vec<Citation> = results
            .iter()
            .map(|r| Citation::from_chunk(&r.chunk, r.similarity))
            .collect();
        let context = PromptBuilder::build_context(&results);
        let prompt =
            PromptBuilder::build_grounded_prompt("What are the fees?", &context, &citations);

        assert!(prompt.contains(FALLBACK_ANSWER));
        assert!(prompt.contains("Question: What are the fees?"));
        assert!(prompt.contains("Fees are 50000 per year."));
        assert!(prompt.contains("[1] admissionprocess.pdf"));
    }

    #[test]
    fn test_system_and_user_prompt_split() {
        let system = PromptBuilder::system_prompt();
        let user = PromptBuilder::build_user_prompt("When do applications open?", "ctx", &[]);

        assert!(system.contains("ONLY"));
        assert!(!system.contains("When do applications open?"));
        assert!(user.contains("When do applications open?"));
    }
}
