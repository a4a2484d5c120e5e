//! Answer generator trait with timeout semantics.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{QaError, Result};

/// A language model backend that produces answer text from a prompt.
///
/// Implementations wrap specific hosted or local LLMs. Generation is
/// blocking I/O from the pipeline's perspective; the deadline is enforced
/// by [`generate_with_timeout`], not by implementations. Generation never
/// mutates the index, so cancelling a pending call is always safe.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Generate answer text for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// The backend name, used in error messages.
    fn name(&self) -> &str;
}

/// Run a generation call under a hard deadline.
///
/// A timeout surfaces as [`QaError::GenerationTimeout`] and is never
/// retried here: retrying doubles latency on an already slow external
/// call, so the decision belongs to the caller.
pub async fn generate_with_timeout(
    generator: &dyn AnswerGenerator,
    prompt: &str,
    deadline: Duration,
) -> Result<String> {
    match tokio::time::timeout(deadline, generator.generate(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(QaError::GenerationTimeout { seconds: deadline.as_secs() }),
    }
}
