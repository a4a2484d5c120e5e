//! PDF text extraction.
//!
//! Extracts per-page text from a raw PDF byte stream. This is a pure
//! transform: bytes in, ordered `(page, text)` pairs out.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::PageText;
use crate::error::{QaError, Result};

static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Extract whitespace-normalized text for every page of a PDF.
///
/// Pages are 1-indexed. Pages without extractable text are returned with
/// empty text so page numbering stays aligned with the source document;
/// the chunker skips them later.
///
/// # Errors
///
/// Returns [`QaError::Parse`] if the byte stream is not a readable PDF
/// (corrupted or encrypted input), or if no page yields any text at all,
/// which usually means an image-only scan.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<PageText>> {
    let raw_pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| QaError::Parse(format!("failed to extract text: {e}")))?;

    let pages: Vec<PageText> = raw_pages
        .into_iter()
        .enumerate()
        .map(|(i, text)| PageText { page: i + 1, text: normalize_whitespace(&text) })
        .collect();

    if pages.iter().all(|p| p.text.is_empty()) {
        return Err(QaError::Parse(
            "no extractable text in any page (image-only or empty PDF)".to_string(),
        ));
    }

    Ok(pages)
}

/// Normalize whitespace for consistent, reproducible chunking.
///
/// Carriage returns become newlines, runs of spaces and tabs collapse to
/// a single space, and three or more consecutive newlines collapse to a
/// paragraph break.
fn normalize_whitespace(text: &str) -> String {
    let text = text.replace('\r', "\n");
    let text = SPACE_RUNS.replace_all(&text, " ");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_space_and_tab_runs() {
        assert_eq!(normalize_whitespace("a  \t b"), "a b");
    }

    #[test]
    fn carriage_returns_become_newlines() {
        assert_eq!(normalize_whitespace("a\r\nb"), "a\n\nb");
        assert_eq!(normalize_whitespace("a\rb"), "a\nb");
    }

    #[test]
    fn blank_line_runs_collapse_to_paragraph_break() {
        assert_eq!(normalize_whitespace("a\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize_whitespace("  hello  "), "hello");
    }

    #[test]
    fn garbage_bytes_fail_with_parse_error() {
        let err = extract_pages(b"definitely not a pdf").unwrap_err();
        assert_eq!(err.kind(), "parse_error");
    }
}
