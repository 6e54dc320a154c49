//! Sentence-aware text chunking with overlap

use unicode_segmentation::UnicodeSegmentation;

use crate::types::document::{Chunk, ChunkSource, Document};

use super::parser::ParsedDocument;

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks
    overlap: usize,
    /// Minimum chunk size
    min_size: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize, min_size: usize) -> Self {
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size.saturating_sub(1)),
            min_size,
        }
    }

    /// Chunk a parsed document
    pub fn chunk_document(&self, doc: &Document, parsed: &ParsedDocument) -> Vec<Chunk> {
        // Extraction yields one text blob for the whole file; page numbers
        // are only attributable when the document has a single page.
        let page_number = match parsed.total_pages {
            Some(1) => Some(1),
            _ => None,
        };

        let source = ChunkSource {
            filename: doc.filename.clone(),
            page_number,
            page_count: parsed.total_pages,
        };

        self.chunk_text(&parsed.content, doc, &source)
    }

    /// Chunk raw text, accumulating sentences up to the target size
    fn chunk_text(&self, text: &str, doc: &Document, source: &ChunkSource) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        let mut current_chunk = String::new();
        let mut current_start = 0usize;
        let mut chunk_index = 0u32;
        let mut char_pos = 0usize;

        for sentence in text.split_sentence_bounds() {
            let sentence_len = sentence.len();

            if !current_chunk.is_empty() && current_chunk.len() + sentence_len > self.chunk_size {
                if current_chunk.len() >= self.min_size {
                    chunks.push(Chunk::new(
                        doc.id,
                        current_chunk.trim().to_string(),
                        source.clone(),
                        current_start,
                        char_pos,
                        chunk_index,
                    ));
                    chunk_index += 1;
                }

                // Start the next chunk with trailing overlap from this one
                current_chunk = self.overlap_text(&current_chunk);
                current_start = char_pos.saturating_sub(self.overlap);
            }

            current_chunk.push_str(sentence);
            char_pos += sentence_len;
        }

        if current_chunk.trim().len() >= self.min_size {
            chunks.push(Chunk::new(
                doc.id,
                current_chunk.trim().to_string(),
                source.clone(),
                current_start,
                char_pos,
                chunk_index,
            ));
        }

        chunks
    }

    /// Take the overlap tail of a chunk, snapped to a sentence or word boundary
    fn overlap_text(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }
        if text.len() <= self.overlap {
            return text.to_string();
        }

        let mut start = text.len().saturating_sub(self.overlap);
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }

        let tail = &text[start..];

        if let Some(pos) = tail.find(". ") {
            return tail[pos + 2..].to_string();
        }

        if let Some(pos) = tail.find(' ') {
            return tail[pos + 1..].to_string();
        }

        tail.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::hash_content;

    fn test_doc() -> Document {
        Document::new("college_info", "about_college.pdf", hash_content("x"), 100)
    }

    fn parsed(content: &str, pages: Option<u32>) -> ParsedDocument {
        ParsedDocument {
            content: content.to_string(),
            content_hash: hash_content(content),
            total_pages: pages,
        }
    }

    fn chunk_sizes(chunks: &[Chunk]) -> Vec<usize> {
        chunks.iter().map(|c| c.content.len()).collect()
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunker = TextChunker::new(1000, 200, 50);
        let doc = test_doc();
        let text = "The college was established in 1985. It offers engineering programs.";
        let chunks = chunker.chunk_document(&doc, &parsed(text, Some(1)));

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, text);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].source.page_number, Some(1));
    }

    #[test]
    fn test_long_text_respects_chunk_size() {
        let chunker = TextChunker::new(200, 40, 50);
        let doc = test_doc();
        let sentence = "Admission requires a valid entrance exam score. ";
        let text = sentence.repeat(30);
        let chunks = chunker.chunk_document(&doc, &parsed(&text, Some(3)));

        assert!(chunks.len() > 1);
        for size in chunk_sizes(&chunks) {
            // A chunk may exceed the target by at most one sentence
            assert!(size <= 200 + sentence.len());
        }
        // Indexes are sequential
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i as u32);
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let chunker = TextChunker::new(200, 60, 50);
        let doc = test_doc();
        let text = "Fee payment is due in July. Hostel fees are separate. \
                    Scholarships reduce tuition by half. Late payment incurs a fine. "
            .repeat(10);
        let chunks = chunker.chunk_document(&doc, &parsed(&text, Some(2)));

        assert!(chunks.len() > 1);
        // The final sentence of chunk N reappears in chunk N+1
        let first = &chunks[0].content;
        let second = &chunks[1].content;
        let last_sentence = first.rsplit(". ").next().unwrap();
        assert!(
            second.contains(last_sentence),
            "expected overlap between consecutive chunks"
        );
    }

    #[test]
    fn test_tiny_fragments_dropped() {
        let chunker = TextChunker::new(1000, 200, 50);
        let doc = test_doc();
        let chunks = chunker.chunk_document(&doc, &parsed("Short.", Some(1)));
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_empty_text() {
        let chunker = TextChunker::new(1000, 200, 50);
        let doc = test_doc();
        let chunks = chunker.chunk_document(&doc, &parsed("", None));
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_multipage_chunks_have_no_page_number() {
        let chunker = TextChunker::new(1000, 200, 50);
        let doc = test_doc();
        let text = "The seat matrix lists open and reserved category seats per branch.";
        let chunks = chunker.chunk_document(&doc, &parsed(text, Some(4)));

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source.page_number, None);
        assert_eq!(chunks[0].source.page_count, Some(4));
    }

    #[test]
    fn test_multibyte_text_no_panic() {
        let chunker = TextChunker::new(80, 20, 10);
        let doc = test_doc();
        let text = "प्रवेश प्रक्रिया जुलाई में शुरू होती है। शुल्क संरचना वेबसाइट पर उपलब्ध है। ".repeat(5);
        let chunks = chunker.chunk_document(&doc, &parsed(&text, Some(1)));
        assert!(!chunks.is_empty());
    }
}
