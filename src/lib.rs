//! Grounded question answering over user-supplied PDF documents.
//!
//! `docqa` implements a retrieval-augmented generation pipeline: PDFs are
//! parsed per page, split into overlapping page-bounded chunks, embedded,
//! and indexed under a corpus id. Questions are embedded with the same
//! model, matched against the corpus by cosine similarity, and answered
//! by a language model from a prompt that contains only retrieved
//! passages. Citations in the generated answer are parsed and validated
//! against that context, so an answer can never cite material it was not
//! shown.
//!
//! The external model and storage backends are capability traits:
//! [`EmbeddingProvider`], [`VectorIndex`], and [`AnswerGenerator`], with
//! hosted ([`openai`]) and local ([`ollama`]) implementations plus an
//! in-memory index for single-process use.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa::{FilePayload, InMemoryVectorIndex, QaConfig, QaService};
//! use docqa::ollama::{OllamaEmbedder, OllamaGenerator};
//!
//! let service = QaService::builder()
//!     .config(QaConfig::default())
//!     .embedder(Arc::new(OllamaEmbedder::local()))
//!     .index(Arc::new(InMemoryVectorIndex::new()))
//!     .generator(Arc::new(OllamaGenerator::local()))
//!     .build()?;
//!
//! let receipt = service
//!     .ingest(vec![FilePayload { filename: "report.pdf".into(), bytes }])
//!     .await?;
//! let response = service.ask(receipt.corpus_id, "what were the Q3 findings?").await?;
//! for citation in &response.answer.citations {
//!     println!("{} page {}", citation.document, citation.page);
//! }
//! ```

pub mod chunking;
pub mod citation;
pub mod config;
pub mod corpus;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod inmemory;
pub mod ollama;
pub mod openai;
pub mod parser;
pub mod prompt;
pub mod retriever;
pub mod service;
pub mod vectorstore;

pub use chunking::{Chunker, PageChunker};
pub use citation::extract_citations;
pub use config::{QaConfig, QaConfigBuilder};
pub use corpus::{Corpus, CorpusRegistry, DocumentMeta};
pub use document::{Answer, Chunk, Citation, PageText, SearchResult};
pub use embedding::{EmbedderIdentity, EmbeddingProvider};
pub use error::{QaError, Result};
pub use generation::{AnswerGenerator, generate_with_timeout};
pub use inmemory::InMemoryVectorIndex;
pub use parser::extract_pages;
pub use prompt::{AssembledPrompt, CITATION_FORMAT, assemble};
pub use retriever::{RetrievalResult, Retriever, corpus_summary, is_corpus_question};
pub use service::{
    AskResponse, FilePayload, Health, IngestReceipt, NO_CONTEXT_ANSWER, QaService,
    QaServiceBuilder,
};
pub use vectorstore::VectorIndex;
