//! Vector index trait for storing and searching chunk embeddings.

use async_trait::async_trait;
use uuid::Uuid;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A storage backend for chunk embeddings with per-corpus namespaces.
///
/// Each corpus owns its namespace exclusively: a query against one corpus
/// never returns vectors ingested under another. Upserts must be visible
/// to subsequent queries on the same corpus (read-your-writes).
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Upsert chunks into a corpus namespace, creating it if needed.
    /// A chunk whose id already exists in the namespace is replaced, not
    /// duplicated. Chunks must have embeddings set.
    async fn upsert(&self, corpus_id: Uuid, chunks: &[Chunk]) -> Result<()>;

    /// Search a corpus namespace for the `top_k` chunks most similar to
    /// the given embedding.
    ///
    /// Similarity is cosine similarity; higher is more relevant. Results
    /// are ordered by descending score, and chunks with equal scores rank
    /// in insertion order so retrieval is deterministic.
    async fn query(
        &self,
        corpus_id: Uuid,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;

    /// Delete a corpus namespace and all its vectors.
    async fn delete_corpus(&self, corpus_id: Uuid) -> Result<()>;
}
