//! Error types for the `docqa` crate.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ingestion or question answering.
#[derive(Debug, Error)]
pub enum QaError {
    /// The PDF could not be parsed, or yielded no extractable text.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// The uploaded payload is not a PDF.
    #[error("unsupported format for '{0}': expected a PDF payload")]
    UnsupportedFormat(String),

    /// More files were submitted than the configured limit allows.
    #[error("too many files: {count} exceeds the limit of {limit}")]
    TooManyFiles {
        /// Number of files in the request.
        count: usize,
        /// The configured maximum.
        limit: usize,
    },

    /// An ingestion request contained no files.
    #[error("no files supplied for ingestion")]
    EmptyIngest,

    /// An error occurred during embedding generation.
    #[error("embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector index backend.
    #[error("vector index error ({backend}): {message}")]
    Index {
        /// The index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The requested corpus does not exist (unknown or expired id).
    #[error("corpus '{0}' not found")]
    CorpusNotFound(Uuid),

    /// The query embedder does not match the embedder the corpus was built with.
    ///
    /// Mixing embedding spaces is a correctness bug, so this is rejected
    /// rather than silently degrading answer quality.
    #[error("embedder mismatch: corpus was built with '{corpus}', query uses '{query}'")]
    EmbedderMismatch {
        /// Identity of the embedder recorded on the corpus.
        corpus: String,
        /// Identity of the embedder attempting the query.
        query: String,
    },

    /// The answer generator failed upstream.
    #[error("generation error ({provider}): {message}")]
    Generation {
        /// The generator backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The answer generator exceeded its deadline. Not retried automatically;
    /// the caller may retry.
    #[error("generation timed out after {seconds}s")]
    GenerationTimeout {
        /// The deadline that elapsed, in seconds.
        seconds: u64,
    },

    /// A configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl QaError {
    /// A stable, machine-readable kind for this error.
    ///
    /// Transport layers map these to status codes and error payloads;
    /// the strings never change across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            QaError::Parse(_) => "parse_error",
            QaError::UnsupportedFormat(_) => "unsupported_format",
            QaError::TooManyFiles { .. } => "too_many_files",
            QaError::EmptyIngest => "empty_ingest",
            QaError::Embedding { .. } => "embedding_error",
            QaError::Index { .. } => "index_error",
            QaError::CorpusNotFound(_) => "corpus_not_found",
            QaError::EmbedderMismatch { .. } => "embedder_mismatch",
            QaError::Generation { .. } => "generation_error",
            QaError::GenerationTimeout { .. } => "generation_timeout",
            QaError::Config(_) => "config_error",
        }
    }
}

/// A convenience result type for QA operations.
pub type Result<T> = std::result::Result<T, QaError>;
