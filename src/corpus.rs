//! Corpus metadata and the process-wide corpus registry.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::embedding::EmbedderIdentity;

/// Metadata for one ingested PDF document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentMeta {
    /// Original filename.
    pub name: String,
    /// Number of pages in the document.
    pub pages: usize,
    /// Raw byte size of the uploaded payload.
    pub bytes: usize,
}

/// One ingested document set, queried as a unit.
///
/// Immutable after creation: a corpus is written once at ingestion and
/// read many times at query. It owns its index namespace exclusively and
/// records the embedder it was built with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    /// Unique corpus identifier.
    pub id: Uuid,
    /// Ingested documents, in upload order.
    pub documents: Vec<DocumentMeta>,
    /// Total number of chunks indexed for this corpus.
    pub chunk_count: usize,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Identity of the embedding model used at ingestion. Queries with a
    /// different embedder are rejected.
    pub embedder: EmbedderIdentity,
}

/// Process-wide mapping of corpus id to corpus metadata.
///
/// Explicit state with a defined lifecycle: an entry appears only once
/// ingestion has fully succeeded, and disappears on explicit deletion.
/// Because registration happens last, a corpus id never refers to a
/// partially built index.
#[derive(Debug, Default)]
pub struct CorpusRegistry {
    entries: RwLock<HashMap<Uuid, Corpus>>,
}

impl CorpusRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fully ingested corpus.
    pub async fn insert(&self, corpus: Corpus) {
        let mut entries = self.entries.write().await;
        entries.insert(corpus.id, corpus);
    }

    /// Look up a corpus by id.
    pub async fn get(&self, id: Uuid) -> Option<Corpus> {
        let entries = self.entries.read().await;
        entries.get(&id).cloned()
    }

    /// Remove a corpus, returning its metadata if it existed.
    pub async fn remove(&self, id: Uuid) -> Option<Corpus> {
        let mut entries = self.entries.write().await;
        entries.remove(&id)
    }

    /// Number of registered corpora.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }

    /// Whether the registry holds no corpora.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
