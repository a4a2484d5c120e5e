//! Query-time retrieval: similarity search plus the corpus-metadata path.

use std::sync::Arc;

use tracing::{debug, error};
use uuid::Uuid;

use crate::corpus::Corpus;
use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::vectorstore::VectorIndex;

/// The ranked outcome of a retrieval, possibly empty.
///
/// Scores are monotonically non-increasing by rank and the length is at
/// most the configured top_k.
#[derive(Debug, Clone, Default)]
pub struct RetrievalResult {
    results: Vec<SearchResult>,
}

impl RetrievalResult {
    /// Wrap a ranked result list. Callers are expected to pass results
    /// already ordered by descending score.
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self { results }
    }

    /// The ranked results, best first.
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// Whether nothing relevant was retrieved.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of retrieved chunks.
    pub fn len(&self) -> usize {
        self.results.len()
    }
}

/// Embeds questions and ranks corpus chunks by similarity.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
    similarity_threshold: f32,
}

impl Retriever {
    /// Create a retriever over the given embedder and index.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        top_k: usize,
        similarity_threshold: f32,
    ) -> Self {
        Self { embedder, index, top_k, similarity_threshold }
    }

    /// Retrieve the chunks most relevant to `question` from a corpus.
    ///
    /// Embeds the question, queries the index for the top_k most similar
    /// chunks, and drops results below the similarity threshold. The
    /// result may be empty; the caller must not let the generator invent
    /// an answer in that case.
    ///
    /// # Errors
    ///
    /// Returns an embedding or index error if the respective backend
    /// fails. Neither is retried.
    pub async fn retrieve(&self, corpus_id: Uuid, question: &str) -> Result<RetrievalResult> {
        let query_embedding = self.embedder.embed(question).await.map_err(|e| {
            error!(error = %e, "question embedding failed");
            e
        })?;

        let results = self.index.query(corpus_id, &query_embedding, self.top_k).await.map_err(
            |e| {
                error!(%corpus_id, error = %e, "vector index query failed");
                e
            },
        )?;

        let kept: Vec<SearchResult> =
            results.into_iter().filter(|r| r.score >= self.similarity_threshold).collect();

        debug!(%corpus_id, kept = kept.len(), "retrieval completed");
        Ok(RetrievalResult::new(kept))
    }
}

/// Whether a question asks about corpus structure rather than content.
///
/// Questions like "how many documents have I given you" or "list the
/// files" must be answered from corpus metadata, not similarity search:
/// retrieval over chunks routinely drops documents and miscounts them.
/// Detection is deliberately conservative; a miss falls back to ordinary
/// retrieval.
pub fn is_corpus_question(question: &str) -> bool {
    let q = question.to_lowercase();
    let about_corpus = ["document", "file", "pdf"].iter().any(|w| q.contains(w));
    if !about_corpus {
        return false;
    }
    [
        "how many",
        "list the",
        "list all",
        "name the",
        "enumerate",
        "which documents",
        "what documents",
        "which files",
        "what files",
        "which pdfs",
        "what pdfs",
    ]
    .iter()
    .any(|p| q.contains(p))
}

/// Answer a corpus-structure question from metadata.
///
/// Enumerates every document by name with its page count, so counts are
/// exact by construction.
pub fn corpus_summary(corpus: &Corpus) -> String {
    let listing: Vec<String> = corpus
        .documents
        .iter()
        .map(|d| {
            let pages = if d.pages == 1 { "page" } else { "pages" };
            format!("{} ({} {pages})", d.name, d.pages)
        })
        .collect();

    let count = corpus.documents.len();
    let noun = if count == 1 { "document" } else { "documents" };
    format!("You have provided {count} {noun}: {}.", listing.join(", "))
}
