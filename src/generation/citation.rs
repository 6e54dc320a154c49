//! Citation extraction and linking

use regex::Regex;

use crate::types::response::Citation;

/// Extract `[Source: ...]` markers from an LLM answer and link them to the
/// retrieved citations. When the model cited nothing explicitly, the top
/// citations by similarity are appended as a sources list.
pub fn extract_and_link_citations(
    answer: &str,
    available_citations: &mut Vec<Citation>,
) -> (String, Vec<Citation>) {
    let citation_pattern =
        Regex::new(r"\[Source:\s*([^,\]]+)(?:,\s*Page\s*(\d+))?\]").expect("Invalid regex");

    let mut linked_citations = Vec::new();
    let mut clean_answer = answer.to_string();

    for cap in citation_pattern.captures_iter(answer) {
        let filename = cap.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        let page: Option<u32> = cap.get(2).and_then(|m| m.as_str().parse().ok());

        if let Some(citation) = find_matching_citation(available_citations, filename, page) {
            if !linked_citations
                .iter()
                .any(|c: &Citation| c.chunk_id == citation.chunk_id)
            {
                linked_citations.push(citation);
            }
        }
    }

    if linked_citations.is_empty() && !available_citations.is_empty() {
        available_citations.sort_by(|a, b| {
            b.similarity_score
                .partial_cmp(&a.similarity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for citation in available_citations.iter().take(3) {
            linked_citations.push(citation.clone());
        }

        clean_answer.push_str("\n\nSources used:");
        for citation in &linked_citations {
            clean_answer.push_str(&format!("\n- {}", citation.format_inline()));
        }
    }

    (clean_answer, linked_citations)
}

/// Find a citation matching filename and optional page
fn find_matching_citation(
    citations: &[Citation],
    filename: &str,
    page: Option<u32>,
) -> Option<Citation> {
    for citation in citations {
        let filename_matches = citation.filename.contains(filename)
            || filename.contains(&citation.filename)
            || filename.to_lowercase() == citation.filename.to_lowercase();

        if filename_matches {
            if let Some(p) = page {
                if citation.page_number == Some(p) {
                    return Some(citation.clone());
                }
            } else {
                return Some(citation.clone());
            }
        }
    }

    // Fall back to filename-only match when the page was wrong
    citations
        .iter()
        .find(|c| c.filename.contains(filename) || filename.contains(&c.filename))
        .cloned()
}

/// Highlight query terms in a snippet using <mark> tags
pub fn highlight_snippet(snippet: &str, query_terms: &[&str]) -> String {
    let mut highlighted = snippet.to_string();

    for term in query_terms {
        if term.len() < 3 {
            continue; // Skip very short terms
        }

        let re = regex::RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build();

        if let Ok(re) = re {
            highlighted = re
                .replace_all(&highlighted, |caps: &regex::Captures| {
                    format!("<mark>{}</mark>", &caps[0])
                })
                .to_string();
        }
    }

    highlighted
}

/// Truncate a snippet to a maximum length, preserving word boundaries
pub fn truncate_snippet(snippet: &str, max_len: usize) -> String {
    if snippet.len() <= max_len {
        return snippet.to_string();
    }

    let mut end = max_len;
    while end > 0 && !snippet.is_char_boundary(end) {
        end -= 1;
    }

    if let Some(pos) = snippet[..end].rfind(' ') {
        return format!("{}...", &snippet[..pos]);
    }

    format!("{}...", &snippet[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::{Chunk, ChunkSource};
    use uuid::Uuid;

    fn citation(filename: &str, page: Option<u32>, similarity: f32) -> Citation {
        let chunk = Chunk::new(
            Uuid::new_v4(),
            "snippet content".to_string(),
            ChunkSource {
                filename: filename.to_string(),
                page_number: page,
                page_count: None,
            },
            0,
            15,
            0,
        );
        Citation::from_chunk(&chunk, similarity)
    }

    #[test]
    fn test_extract_explicit_citation() {
        let mut available = vec![
            citation("feesstructure.pdf", Some(1), 0.9),
            citation("about_college.pdf", None, 0.7),
        ];
        let answer = "The annual fee is 50000 [Source: feesstructure.pdf, Page 1].";
        let (clean, linked) = extract_and_link_citations(answer, &mut available);

        assert_eq!(clean, answer);
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].filename, "feesstructure.pdf");
    }

    #[test]
    fn test_extract_citation_without_page() {
        let mut available = vec![citation("cuttoffs.pdf", None, 0.8)];
        let answer = "The cutoff for CS was 95 percent [Source: cuttoffs.pdf].";
        let (_, linked) = extract_and_link_citations(answer, &mut available);

        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].filename, "cuttoffs.pdf");
    }

    #[test]
    fn test_duplicate_citations_linked_once() {
        let mut available = vec![citation("seatsmatrix.pdf", Some(2), 0.8)];
        let answer = "Open seats: 60 [Source: seatsmatrix.pdf, Page 2]. \
                      Reserved seats: 30 [Source: seatsmatrix.pdf, Page 2].";
        let (_, linked) = extract_and_link_citations(answer, &mut available);

        assert_eq!(linked.len(), 1);
    }

    #[test]
    fn test_no_explicit_citations_appends_top_sources() {
        let mut available = vec![
            citation("about_college.pdf", None, 0.5),
            citation("about_college.pdf", None, 0.9),
        ];
        let answer = "The college was founded in 1985.";
        let (clean, linked) = extract_and_link_citations(answer, &mut available);

        assert!(clean.contains("Sources used:"));
        assert_eq!(linked.len(), 2);
        // Highest similarity first
        assert!(linked[0].similarity_score >= linked[1].similarity_score);
    }

    #[test]
    fn test_highlight_snippet() {
        let snippet = "The admission process starts in June with counselling rounds.";
        let highlighted = highlight_snippet(snippet, &["admission", "counselling"]);

        assert!(highlighted.contains("<mark>admission</mark>"));
        assert!(highlighted.contains("<mark>counselling</mark>"));
    }

    #[test]
    fn test_highlight_skips_short_terms() {
        let snippet = "fee is due";
        let highlighted = highlight_snippet(snippet, &["is"]);
        assert_eq!(highlighted, snippet);
    }

    #[test]
    fn test_truncate_snippet() {
        let snippet = "This is a very long snippet that needs to be truncated.";
        let truncated = truncate_snippet(snippet, 20);

        assert!(truncated.len() <= 23); // 20 + "..."
        assert!(truncated.ends_with("..."));
    }
}
