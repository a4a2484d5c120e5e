//! Transport-agnostic service operations: Ingest, Ask, Health.
//!
//! [`QaService`] composes the capability interfaces — an
//! [`EmbeddingProvider`], a [`VectorIndex`], an [`AnswerGenerator`], and a
//! [`Chunker`] — into the two request-scoped workflows:
//!
//! - ingestion: parse → chunk → embed → index → register corpus
//! - query: embed question → retrieve → assemble prompt → generate → cite
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa::{InMemoryVectorIndex, QaConfig, QaService};
//!
//! let service = QaService::builder()
//!     .config(QaConfig::default())
//!     .embedder(Arc::new(my_embedder))
//!     .index(Arc::new(InMemoryVectorIndex::new()))
//!     .generator(Arc::new(my_generator))
//!     .build()?;
//!
//! let receipt = service.ingest(files).await?;
//! let response = service.ask(receipt.corpus_id, "what does chapter 2 say?").await?;
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::chunking::{Chunker, PageChunker};
use crate::citation::extract_citations;
use crate::config::QaConfig;
use crate::corpus::{Corpus, CorpusRegistry, DocumentMeta};
use crate::document::{Answer, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{QaError, Result};
use crate::generation::{AnswerGenerator, generate_with_timeout};
use crate::parser::extract_pages;
use crate::prompt::assemble;
use crate::retriever::{Retriever, corpus_summary, is_corpus_question};
use crate::vectorstore::VectorIndex;

/// Magic prefix every PDF payload must carry.
const PDF_MAGIC: &[u8] = b"%PDF";

/// The answer text returned when retrieval finds nothing relevant.
pub const NO_CONTEXT_ANSWER: &str =
    "I could not find relevant information in the uploaded documents for this question.";

/// One uploaded file: name plus raw bytes.
#[derive(Debug, Clone)]
pub struct FilePayload {
    /// Original filename.
    pub filename: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// The result of a successful ingestion.
///
/// Returned only once the whole batch is parsed, embedded, and indexed;
/// a corpus id never refers to a partial index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReceipt {
    /// Identifier of the newly created corpus.
    pub corpus_id: Uuid,
    /// Total number of chunks indexed across all files.
    pub chunk_count: usize,
}

/// The result of a question against a corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// The answer, with citations bound to prompt context.
    pub answer: Answer,
    /// The retrieved chunks that were included in the prompt, best first.
    pub context_used: Vec<SearchResult>,
}

/// Process readiness, independent of corpus state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Always `"ok"` for a live process.
    pub status: String,
}

/// The grounded question-answering service.
///
/// Stateless per request apart from the corpus registry and the index.
/// No lock is held across embedding or generation calls, and generation
/// never mutates the index, so cancelling an `ask` in flight is safe.
pub struct QaService {
    config: QaConfig,
    registry: Arc<CorpusRegistry>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn AnswerGenerator>,
    chunker: Arc<dyn Chunker>,
    retriever: Retriever,
}

impl QaService {
    /// Create a new [`QaServiceBuilder`].
    pub fn builder() -> QaServiceBuilder {
        QaServiceBuilder::default()
    }

    /// Return a reference to the service configuration.
    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    /// Return the corpus registry handle.
    pub fn registry(&self) -> &Arc<CorpusRegistry> {
        &self.registry
    }

    /// Look up corpus metadata by id.
    pub async fn corpus(&self, corpus_id: Uuid) -> Option<Corpus> {
        self.registry.get(corpus_id).await
    }

    /// Ingest a batch of PDFs into a new corpus.
    ///
    /// The batch is atomic: if any file fails to parse, the whole request
    /// fails and nothing is registered. Bounds and format are checked
    /// before any parsing starts.
    ///
    /// # Errors
    ///
    /// [`QaError::EmptyIngest`] for an empty batch, [`QaError::TooManyFiles`]
    /// above the configured limit, [`QaError::UnsupportedFormat`] for a
    /// payload without the PDF magic prefix, [`QaError::Parse`] for an
    /// unreadable file, and [`QaError::Embedding`] / [`QaError::Index`]
    /// for backend failures.
    pub async fn ingest(&self, files: Vec<FilePayload>) -> Result<IngestReceipt> {
        if files.is_empty() {
            return Err(QaError::EmptyIngest);
        }
        if files.len() > self.config.max_documents {
            return Err(QaError::TooManyFiles {
                count: files.len(),
                limit: self.config.max_documents,
            });
        }
        for file in &files {
            if !file.bytes.starts_with(PDF_MAGIC) {
                return Err(QaError::UnsupportedFormat(file.filename.clone()));
            }
        }

        let corpus_id = Uuid::new_v4();
        let mut documents = Vec::with_capacity(files.len());
        let mut chunks = Vec::new();

        // 1. Parse and chunk every file before touching any backend, so a
        //    bad sibling aborts the batch early.
        for file in &files {
            let pages = extract_pages(&file.bytes).map_err(|e| match e {
                QaError::Parse(message) => {
                    QaError::Parse(format!("{}: {message}", file.filename))
                }
                other => other,
            })?;
            documents.push(DocumentMeta {
                name: file.filename.clone(),
                pages: pages.len(),
                bytes: file.bytes.len(),
            });
            chunks.extend(self.chunker.chunk(&file.filename, &pages));
        }

        // 2. Embed all chunk texts in one batch.
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        // 3. Index, then register. Registration last keeps partially
        //    built corpora invisible.
        self.index.upsert(corpus_id, &chunks).await?;

        let chunk_count = chunks.len();
        self.registry
            .insert(Corpus {
                id: corpus_id,
                documents,
                chunk_count,
                created_at: Utc::now(),
                embedder: self.embedder.identity(),
            })
            .await;

        info!(%corpus_id, files = files.len(), chunk_count, "ingested corpus");
        Ok(IngestReceipt { corpus_id, chunk_count })
    }

    /// Answer a question against an ingested corpus.
    ///
    /// Corpus-structure questions ("how many documents", "list the
    /// files") are answered from corpus metadata directly. Content
    /// questions go through retrieval; if nothing scores above the
    /// threshold the answer says so and is flagged ungrounded, without
    /// calling the generator.
    ///
    /// # Errors
    ///
    /// [`QaError::CorpusNotFound`] for an unknown id,
    /// [`QaError::EmbedderMismatch`] if the corpus was built with a
    /// different embedding model, and [`QaError::Generation`] /
    /// [`QaError::GenerationTimeout`] from the generator (never retried
    /// here).
    pub async fn ask(&self, corpus_id: Uuid, question: &str) -> Result<AskResponse> {
        let corpus =
            self.registry.get(corpus_id).await.ok_or(QaError::CorpusNotFound(corpus_id))?;

        let query_identity = self.embedder.identity();
        if corpus.embedder != query_identity {
            return Err(QaError::EmbedderMismatch {
                corpus: corpus.embedder.to_string(),
                query: query_identity.to_string(),
            });
        }

        // Metadata path: corpus-structure questions never go through
        // similarity search.
        if is_corpus_question(question) {
            info!(%corpus_id, "answering from corpus metadata");
            return Ok(AskResponse {
                answer: Answer {
                    text: corpus_summary(&corpus),
                    citations: Vec::new(),
                    grounded: true,
                },
                context_used: Vec::new(),
            });
        }

        let retrieval = self.retriever.retrieve(corpus_id, question).await?;
        if retrieval.is_empty() {
            info!(%corpus_id, "no relevant context above threshold");
            return Ok(AskResponse {
                answer: Answer {
                    text: NO_CONTEXT_ANSWER.to_string(),
                    citations: Vec::new(),
                    grounded: false,
                },
                context_used: Vec::new(),
            });
        }

        let assembled = assemble(question, &retrieval, self.config.context_budget);
        let text = generate_with_timeout(
            self.generator.as_ref(),
            &assembled.prompt,
            self.config.generation_timeout,
        )
        .await?;

        let citations = extract_citations(&text, &assembled.context);
        info!(%corpus_id, citations = citations.len(), context = assembled.context.len(), "answered question");

        Ok(AskResponse {
            answer: Answer { text, citations, grounded: true },
            context_used: assembled.context,
        })
    }

    /// Delete a corpus: index namespace and registry entry.
    ///
    /// The namespace goes first. If the index backend fails, the registry
    /// entry is kept so the corpus stays visible and the delete can be
    /// retried.
    ///
    /// # Errors
    ///
    /// [`QaError::CorpusNotFound`] if the id is unknown, [`QaError::Index`]
    /// if the backend fails to drop the namespace.
    pub async fn delete_corpus(&self, corpus_id: Uuid) -> Result<()> {
        if self.registry.get(corpus_id).await.is_none() {
            return Err(QaError::CorpusNotFound(corpus_id));
        }
        self.index.delete_corpus(corpus_id).await?;
        self.registry.remove(corpus_id).await;
        info!(%corpus_id, "deleted corpus");
        Ok(())
    }

    /// Process readiness, independent of corpus state.
    pub fn health(&self) -> Health {
        Health { status: "ok".to_string() }
    }
}

/// Builder for constructing a [`QaService`].
///
/// `config`, `registry`, and `chunker` are optional (defaults: default
/// config, a fresh registry, and a [`PageChunker`] sized from the
/// config); the capability backends are required.
#[derive(Default)]
pub struct QaServiceBuilder {
    config: Option<QaConfig>,
    registry: Option<Arc<CorpusRegistry>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
    generator: Option<Arc<dyn AnswerGenerator>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl QaServiceBuilder {
    /// Set the service configuration.
    pub fn config(mut self, config: QaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Share an existing corpus registry (e.g. across services in tests).
    pub fn registry(mut self, registry: Arc<CorpusRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector index backend.
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the answer generator backend.
    pub fn generator(mut self, generator: Arc<dyn AnswerGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Override the default [`PageChunker`].
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`QaService`], validating that all backends are set.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Config`] if a required backend is missing.
    pub fn build(self) -> Result<QaService> {
        let config = self.config.unwrap_or_default();
        let embedder =
            self.embedder.ok_or_else(|| QaError::Config("embedder is required".to_string()))?;
        let index = self.index.ok_or_else(|| QaError::Config("index is required".to_string()))?;
        let generator =
            self.generator.ok_or_else(|| QaError::Config("generator is required".to_string()))?;
        let chunker = self
            .chunker
            .unwrap_or_else(|| Arc::new(PageChunker::new(config.chunk_size, config.chunk_overlap)));
        let registry = self.registry.unwrap_or_default();

        let retriever = Retriever::new(
            Arc::clone(&embedder),
            Arc::clone(&index),
            config.top_k,
            config.similarity_threshold,
        );

        Ok(QaService { config, registry, embedder, index, generator, chunker, retriever })
    }
}
