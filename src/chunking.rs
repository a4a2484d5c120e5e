//! Page-bounded document chunking.
//!
//! Splits paged text into overlapping fixed-size passages. Chunks never
//! cross page boundaries, so every chunk maps to exactly one page and can
//! be cited as `(document, page)`.

use tracing::warn;

use crate::document::{Chunk, PageText};

/// A strategy for splitting a document's paged text into chunks.
///
/// Implementations produce [`Chunk`]s with text and provenance but no
/// embeddings. Embeddings are attached later by the ingestion pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document's pages into chunks.
    ///
    /// Must be deterministic: identical input and parameters produce an
    /// identical chunk sequence.
    fn chunk(&self, document: &str, pages: &[PageText]) -> Vec<Chunk>;
}

/// Slides a fixed-size window over each page's text with configurable overlap.
///
/// The window advances by `chunk_size - chunk_overlap` bytes. Window
/// edges are snapped to UTF-8 character boundaries so every chunk is a
/// valid slice of its page, at most `chunk_size` bytes long. Trailing
/// text shorter than `chunk_size`
/// becomes its own chunk if non-empty after trimming; pages that produce
/// no chunks are skipped with a warning.
///
/// Chunk IDs are generated as `{document}#p{page}.{index}` where `index`
/// is sequential across the whole document.
#[derive(Debug, Clone)]
pub struct PageChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl PageChunker {
    /// Create a new `PageChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum chunk size in bytes, snapped to character boundaries
    /// * `chunk_overlap` — overlap between consecutive chunks, in bytes
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

/// Largest character boundary at or below `index`.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Smallest character boundary at or above `index`.
fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

impl Chunker for PageChunker {
    fn chunk(&self, document: &str, pages: &[PageText]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut index = 0;

        for page in pages {
            let text = page.text.as_str();
            let before = chunks.len();
            let mut start = 0;

            while start < text.len() {
                let end = floor_char_boundary(text, start + self.chunk_size);
                let window = &text[start..end];
                let trimmed = window.trim();

                if !trimmed.is_empty() {
                    let lead = window.len() - window.trim_start().len();
                    let chunk_start = start + lead;
                    let chunk_end = chunk_start + trimmed.len();

                    chunks.push(Chunk {
                        id: format!("{document}#p{}.{index}", page.page),
                        document: document.to_string(),
                        page: page.page,
                        start: chunk_start,
                        end: chunk_end,
                        text: trimmed.to_string(),
                        embedding: Vec::new(),
                    });
                    index += 1;
                }

                if end >= text.len() {
                    break;
                }
                let step = self.chunk_size.saturating_sub(self.chunk_overlap).max(1);
                let next = ceil_char_boundary(text, start + step);
                if next <= start {
                    break;
                }
                start = next;
            }

            if chunks.len() == before {
                warn!(document, page = page.page, "page produced no chunks, skipping");
            }
        }

        chunks
    }
}
