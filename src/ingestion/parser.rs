//! PDF text extraction

use crate::error::{Error, Result};
use crate::types::document::hash_content;

/// Parsed document with extracted text and metadata
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Extracted text content
    pub content: String,
    /// Content hash for change detection
    pub content_hash: String,
    /// Total pages
    pub total_pages: Option<u32>,
}

/// PDF parser: pdf-extract primary, lopdf content-stream fallback
pub struct PdfParser;

impl PdfParser {
    /// Parse a PDF file. The corpus is fixed PDFs, so other extensions are rejected.
    pub fn parse(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();
        if extension != "pdf" {
            return Err(Error::file_parse(
                filename,
                format!("Unsupported file type '{}', expected a PDF", extension),
            ));
        }

        let content = Self::extract_with_timeout(filename, data)?;

        // Normalize: drop null bytes, glyph artifacts, and blank lines
        let content = cleanup_pdf_text(&content);
        let content = content
            .replace('\0', "")
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if content.trim().is_empty() {
            return Err(Error::file_parse(
                filename,
                "No text content could be extracted from PDF",
            ));
        }

        let total_pages = match lopdf::Document::load_mem(data) {
            Ok(doc) => Some(doc.get_pages().len() as u32),
            Err(_) => None,
        };

        Ok(ParsedDocument {
            content_hash: hash_content(&content),
            content,
            total_pages,
        })
    }

    /// Extract text with a sync timeout to prevent hangs on problematic fonts
    fn extract_with_timeout(filename: &str, data: &[u8]) -> Result<String> {
        use std::sync::mpsc;
        use std::thread;
        use std::time::Duration;

        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem(&data_vec);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(Duration::from_secs(60)) {
            Ok(Ok(text)) => {
                let _ = handle.join();
                Ok(text)
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                tracing::warn!("pdf-extract failed for {}: {}, trying fallback", filename, e);
                Self::extract_fallback(filename, data)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // Thread may still be running; we can only abandon it
                tracing::error!(
                    "PDF extraction timeout after 60s for {} - PDF may have complex fonts",
                    filename
                );
                Self::extract_fallback(filename, data)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("PDF extraction thread crashed for {}", filename);
                Self::extract_fallback(filename, data)
            }
        }
    }

    /// Fallback extraction reading lopdf content streams directly
    fn extract_fallback(filename: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

        let mut all_text = String::new();

        for (page_num, page_id) in doc.get_pages() {
            match doc.get_page_content(page_id) {
                Ok(content) => {
                    let text = Self::extract_text_from_content(&content);
                    if !text.is_empty() {
                        all_text.push_str(&format!("\n--- Page {} ---\n", page_num));
                        all_text.push_str(&text);
                    }
                }
                Err(e) => {
                    tracing::debug!("Could not get content for page {}: {}", page_num, e);
                }
            }
        }

        if all_text.trim().is_empty() {
            return Err(Error::file_parse(
                filename,
                "PDF appears to be image-based or has no extractable text",
            ));
        }

        Ok(all_text)
    }

    /// Pull text show operators out of a PDF content stream
    fn extract_text_from_content(content: &[u8]) -> String {
        let content_str = String::from_utf8_lossy(content);
        let mut text = String::new();
        let mut in_text_block = false;
        let mut current_text = String::new();

        for line in content_str.lines() {
            let line = line.trim();

            if line == "BT" {
                in_text_block = true;
                continue;
            }

            if line == "ET" {
                in_text_block = false;
                if !current_text.is_empty() {
                    text.push_str(&current_text);
                    text.push(' ');
                    current_text.clear();
                }
                continue;
            }

            if in_text_block && (line.ends_with("Tj") || line.ends_with("TJ")) {
                if let Some(start) = line.find('(') {
                    if let Some(end) = line.rfind(')') {
                        if start + 1 <= end {
                            let extracted = &line[start + 1..end];
                            let decoded = extracted
                                .replace("\\n", "\n")
                                .replace("\\r", "\r")
                                .replace("\\t", "\t")
                                .replace("\\(", "(")
                                .replace("\\)", ")")
                                .replace("\\\\", "\\");
                            current_text.push_str(&decoded);
                        }
                    }
                }
            }
        }

        text
    }
}

/// Replace glyph-name leftovers and typographic characters that confuse
/// downstream chunking and retrieval
fn cleanup_pdf_text(text: &str) -> String {
    text.replace('\u{2010}', "-")
        .replace('\u{2011}', "-")
        .replace('\u{2013}', "-")
        .replace('\u{2014}', "--")
        .replace('\u{2018}', "'")
        .replace('\u{2019}', "'")
        .replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"")
        .replace('\u{2022}', "* ")
        .replace('\u{2026}', "...")
        .replace('\u{00A0}', " ")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB00}', "ff")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf() {
        let result = PdfParser::parse("notes.txt", b"plain text");
        assert!(matches!(result, Err(Error::FileParse { .. })));
    }

    #[test]
    fn test_cleanup_replaces_ligatures_and_quotes() {
        let input = "\u{FB01}rst \u{2018}quoted\u{2019} \u{2013} bullet \u{2022}item";
        let cleaned = cleanup_pdf_text(input);
        assert_eq!(cleaned, "first 'quoted' - bullet * item");
    }

    #[test]
    fn test_extract_text_from_content_stream() {
        let stream = b"BT\n(Hello World) Tj\nET\nBT\n(Second block) Tj\nET\n";
        let text = PdfParser::extract_text_from_content(stream);
        assert!(text.contains("Hello World"));
        assert!(text.contains("Second block"));
    }

    #[test]
    fn test_extract_text_decodes_escapes() {
        let stream = b"BT\n(Fees \\(per year\\)) Tj\nET\n";
        let text = PdfParser::extract_text_from_content(stream);
        assert!(text.contains("Fees (per year)"));
    }
}
