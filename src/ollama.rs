//! Ollama backends for embeddings and answer generation.
//!
//! The local-model counterpart to the OpenAI adapters, targeting an
//! Ollama server (default `http://localhost:11434`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::{EmbedderIdentity, EmbeddingProvider};
use crate::error::{QaError, Result};
use crate::generation::AnswerGenerator;

/// The default Ollama server URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// The default embedding model.
const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// The dimensionality of `nomic-embed-text` embeddings.
const DEFAULT_DIMENSIONS: usize = 768;

/// The default chat model for answer generation.
const DEFAULT_GENERATION_MODEL: &str = "mistral";

// ── Embeddings ─────────────────────────────────────────────────────

/// An [`EmbeddingProvider`] backed by a local Ollama server.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedder {
    /// Create a new embedder against the given base URL with the default
    /// model (`nomic-embed-text`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
        }
    }

    /// Create a new embedder against `http://localhost:11434`.
    pub fn local() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Set the model name and its output dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "ollama", model = %self.model, text_len = text.len(), "embedding text");

        let url = format!("{}/api/embeddings", self.base_url);
        let request_body = EmbeddingRequest { model: &self.model, prompt: text };

        let response =
            self.client.post(&url).json(&request_body).send().await.map_err(|e| {
                error!(provider = "ollama", error = %e, "embedding request failed");
                QaError::Embedding {
                    provider: "ollama".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(provider = "ollama", %status, "embeddings API error");
            return Err(QaError::Embedding {
                provider: "ollama".into(),
                message: format!("API returned {status}: {body}"),
            });
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            QaError::Embedding {
                provider: "ollama".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(embedding_response.embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn identity(&self) -> EmbedderIdentity {
        EmbedderIdentity::new("ollama", self.model.clone())
    }
}

// ── Generation ─────────────────────────────────────────────────────

/// An [`AnswerGenerator`] backed by a local Ollama server.
///
/// Uses the non-streaming `/api/generate` endpoint; the pipeline's
/// deadline applies to the complete response.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    /// Create a new generator against the given base URL with the default
    /// model (`mistral`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: DEFAULT_GENERATION_MODEL.into(),
        }
    }

    /// Create a new generator against `http://localhost:11434`.
    pub fn local() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Set the generation model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl AnswerGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(provider = "ollama", model = %self.model, prompt_len = prompt.len(), "generating answer");

        let url = format!("{}/api/generate", self.base_url);
        let request_body = GenerateRequest { model: &self.model, prompt, stream: false };

        let response =
            self.client.post(&url).json(&request_body).send().await.map_err(|e| {
                error!(provider = "ollama", error = %e, "generate request failed");
                QaError::Generation {
                    provider: "ollama".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(provider = "ollama", %status, "generate API error");
            return Err(QaError::Generation {
                provider: "ollama".into(),
                message: format!("API returned {status}: {body}"),
            });
        }

        let generate_response: GenerateResponse = response.json().await.map_err(|e| {
            QaError::Generation {
                provider: "ollama".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(generate_response.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
