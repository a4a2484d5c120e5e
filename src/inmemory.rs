//! In-memory vector index using cosine similarity.
//!
//! This module provides [`InMemoryVectorIndex`], a zero-dependency index
//! backed by a `HashMap` protected by a `tokio::sync::RwLock`. It is the
//! reference implementation for development and testing, and the default
//! backing store for a single-process deployment.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;
use crate::vectorstore::VectorIndex;

/// An in-memory [`VectorIndex`] with deterministic ranking.
///
/// Each corpus namespace is a `Vec<Chunk>` in insertion order. Ranking
/// uses a stable sort by descending score, so chunks with equal scores
/// keep insertion order and repeated queries return identical rankings.
/// Upserting a chunk id that already exists replaces the stored chunk
/// in place.
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    namespaces: RwLock<HashMap<Uuid, Vec<Chunk>>>,
}

impl InMemoryVectorIndex {
    /// Create a new empty in-memory index.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn upsert(&self, corpus_id: Uuid, chunks: &[Chunk]) -> Result<()> {
        let mut namespaces = self.namespaces.write().await;
        let namespace = namespaces.entry(corpus_id).or_default();
        for chunk in chunks {
            // Replace in place so a re-upserted chunk keeps its original
            // rank position on score ties.
            match namespace.iter_mut().find(|existing| existing.id == chunk.id) {
                Some(existing) => *existing = chunk.clone(),
                None => namespace.push(chunk.clone()),
            }
        }
        Ok(())
    }

    async fn query(
        &self,
        corpus_id: Uuid,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let namespaces = self.namespaces.read().await;
        let Some(chunks) = namespaces.get(&corpus_id) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<SearchResult> = chunks
            .iter()
            .map(|chunk| {
                let score = cosine_similarity(&chunk.embedding, embedding);
                SearchResult { chunk: chunk.clone(), score }
            })
            .collect();

        // sort_by is stable: equal scores keep insertion order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn delete_corpus(&self, corpus_id: Uuid) -> Result<()> {
        let mut namespaces = self.namespaces.write().await;
        namespaces.remove(&corpus_id);
        Ok(())
    }
}
