//! Data types for pages, chunks, search results, and answers.

use serde::{Deserialize, Serialize};

/// The extracted text of a single PDF page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageText {
    /// Page number, 1-indexed.
    pub page: usize,
    /// Whitespace-normalized text content of the page.
    pub text: String,
}

/// A contiguous span of one page's text with its vector embedding.
///
/// Provenance round-trips: slicing the page text with `start..end` yields
/// exactly `text`. A chunk never crosses a page boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier within the corpus.
    pub id: String,
    /// Name of the source document.
    pub document: String,
    /// Source page number, 1-indexed.
    pub page: usize,
    /// Byte offset of the chunk start within the normalized page text.
    /// Always on a character boundary.
    pub start: usize,
    /// Byte offset of the chunk end within the normalized page text.
    /// Always on a character boundary.
    pub end: usize,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text. Empty until the
    /// ingestion pipeline attaches it.
    pub embedding: Vec<f32>,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The cosine similarity score (higher is more relevant).
    pub score: f32,
}

/// A reference from an answer claim back to a source passage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Citation {
    /// Name of the cited document.
    pub document: String,
    /// Cited page number, 1-indexed.
    pub page: usize,
}

/// A generated answer with structured citations.
///
/// Every citation references a chunk that was part of the context used to
/// build the prompt; identifiers the generator invented are filtered out
/// before the answer is returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The generated answer text.
    pub text: String,
    /// Citations bound to (document, page) pairs from the prompt context.
    pub citations: Vec<Citation>,
    /// Whether the answer is grounded in retrieved context (or corpus
    /// metadata). `false` means no relevant context was found and the
    /// text only says so.
    pub grounded: bool,
}
