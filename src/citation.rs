//! Citation extraction from generated answers.
//!
//! Parses `(Source: <document>, page <N>)` tokens out of generator output
//! and binds them back to the chunks the prompt was built from. A cited
//! identifier that was not part of the prompt context is dropped: a
//! fabricated citation must never reach the caller.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::document::{Citation, SearchResult};

/// Matches the citation tokens the prompt instructs the generator to emit,
/// tolerating `pages` plural, an optional colon, and `N-M` ranges.
static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*source\s*:\s*([^,()]+?)\s*,\s*pages?\s*:?\s*(\d+)(?:\s*[-\u{2013}]\s*(\d+))?\s*\)")
        .expect("citation pattern is valid")
});

/// Extract structured citations from answer text.
///
/// Only (document, page) pairs present in `context` survive; everything
/// else is filtered out silently. Duplicates are collapsed, keeping
/// first-seen order. Zero parseable citations is not an error — the
/// answer simply carries an empty citation list.
pub fn extract_citations(answer_text: &str, context: &[SearchResult]) -> Vec<Citation> {
    let mut seen: HashSet<(String, usize)> = HashSet::new();
    let mut citations = Vec::new();

    for captures in CITATION_RE.captures_iter(answer_text) {
        let document = captures[1].trim();
        let Ok(first) = captures[2].parse::<usize>() else { continue };
        let last = captures
            .get(3)
            .and_then(|m| m.as_str().parse::<usize>().ok())
            .unwrap_or(first);
        if last < first {
            continue;
        }

        // Walk the context rather than the numeric range, so a fuzzed
        // "page 1-999999999" costs nothing.
        for result in context {
            let chunk = &result.chunk;
            if chunk.document == document
                && (first..=last).contains(&chunk.page)
                && seen.insert((chunk.document.clone(), chunk.page))
            {
                citations.push(Citation { document: chunk.document.clone(), page: chunk.page });
            }
        }
    }

    citations
}
