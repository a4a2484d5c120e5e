//! Configuration for the QA pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{QaError, Result};

/// Configuration parameters for ingestion and question answering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QaConfig {
    /// Maximum chunk size in bytes. Chunk edges are snapped to UTF-8
    /// character boundaries, so multibyte text may yield slightly
    /// smaller chunks.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks, in bytes.
    pub chunk_overlap: usize,
    /// Number of top results to request from the vector index.
    pub top_k: usize,
    /// Minimum similarity score for retrieved chunks (results below this
    /// are filtered out).
    pub similarity_threshold: f32,
    /// Maximum total size, in bytes, of the context section of an
    /// assembled prompt.
    pub context_budget: usize,
    /// Maximum number of files accepted per ingestion request.
    pub max_documents: usize,
    /// Deadline for a single generation call.
    pub generation_timeout: Duration,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            chunk_overlap: 120,
            top_k: 6,
            similarity_threshold: 0.25,
            context_budget: 6000,
            max_documents: 5,
            generation_timeout: Duration::from_secs(120),
        }
    }
}

impl QaConfig {
    /// Create a new builder for constructing a [`QaConfig`].
    pub fn builder() -> QaConfigBuilder {
        QaConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`QaConfig`].
#[derive(Debug, Clone, Default)]
pub struct QaConfigBuilder {
    config: QaConfig,
}

impl QaConfigBuilder {
    /// Set the maximum chunk size in bytes.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in bytes.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of top results to request from the vector index.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum similarity threshold for filtering results.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Set the byte budget for the context section of a prompt.
    pub fn context_budget(mut self, budget: usize) -> Self {
        self.config.context_budget = budget;
        self
    }

    /// Set the maximum number of files accepted per ingestion request.
    pub fn max_documents(mut self, max: usize) -> Self {
        self.config.max_documents = max;
        self
    }

    /// Set the deadline for a single generation call.
    pub fn generation_timeout(mut self, timeout: Duration) -> Self {
        self.config.generation_timeout = timeout;
        self
    }

    /// Build the [`QaConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Config`] if:
    /// - `chunk_size == 0`
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    /// - `context_budget == 0`
    /// - `max_documents == 0`
    /// - `similarity_threshold` is outside `[-1.0, 1.0]`
    pub fn build(self) -> Result<QaConfig> {
        if self.config.chunk_size == 0 {
            return Err(QaError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(QaError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(QaError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.context_budget == 0 {
            return Err(QaError::Config("context_budget must be greater than zero".to_string()));
        }
        if self.config.max_documents == 0 {
            return Err(QaError::Config("max_documents must be greater than zero".to_string()));
        }
        if !(-1.0..=1.0).contains(&self.config.similarity_threshold) {
            return Err(QaError::Config(format!(
                "similarity_threshold ({}) must be within [-1.0, 1.0]",
                self.config.similarity_threshold
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = QaConfig::builder().build().unwrap();
        assert_eq!(config, QaConfig::default());
    }

    #[test]
    fn overlap_must_be_less_than_size() {
        let result = QaConfig::builder().chunk_size(100).chunk_overlap(100).build();
        assert!(matches!(result, Err(QaError::Config(_))));
    }

    #[test]
    fn zero_top_k_rejected() {
        let result = QaConfig::builder().top_k(0).build();
        assert!(matches!(result, Err(QaError::Config(_))));
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let result = QaConfig::builder().similarity_threshold(1.5).build();
        assert!(matches!(result, Err(QaError::Config(_))));
    }
}
