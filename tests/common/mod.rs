//! Shared fixtures for integration tests: a minimal PDF builder and
//! deterministic mock backends.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use docqa::document::{Chunk, SearchResult};
use docqa::embedding::{EmbedderIdentity, EmbeddingProvider};
use docqa::error::{QaError, Result};
use docqa::generation::AnswerGenerator;
use docqa::inmemory::InMemoryVectorIndex;
use docqa::vectorstore::VectorIndex;

/// Build a minimal uncompressed PDF with one line of text per page.
///
/// Text must not contain parentheses or backslashes.
pub fn simple_pdf(pages: &[&str]) -> Vec<u8> {
    let page_count = pages.len();
    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();

    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{}] /Count {page_count} >>", kids.join(" ")),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for (i, text) in pages.iter().enumerate() {
        let content = format!("BT /F1 12 Tf 72 712 Td ({text}) Tj ET");
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        objects.push(format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()));
    }

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
    }

    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    pdf.push_str("0000000000 65535 f \n");
    for offset in &offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF",
        objects.len() + 1
    ));
    pdf.into_bytes()
}

/// Embedding dimension used by [`BagOfWordsEmbedder`].
pub const DIM: usize = 64;

/// A deterministic bag-of-words embedder for tests.
///
/// Each lowercase word hashes to one of [`DIM`] buckets; the bucket
/// counts are L2-normalized. Texts sharing words get high cosine
/// similarity, and identical inputs always embed identically.
pub struct BagOfWordsEmbedder {
    identity: EmbedderIdentity,
}

impl BagOfWordsEmbedder {
    pub fn new(model: &str) -> Self {
        Self { identity: EmbedderIdentity::new("test", model) }
    }
}

fn bucket(word: &str) -> usize {
    word.bytes().fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize)) % DIM
}

fn vectorize(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; DIM];
    for word in text.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
        if !word.is_empty() {
            v[bucket(word)] += 1.0;
        }
    }
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

#[async_trait]
impl EmbeddingProvider for BagOfWordsEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(vectorize(text))
    }

    fn dimensions(&self) -> usize {
        DIM
    }

    fn identity(&self) -> EmbedderIdentity {
        self.identity.clone()
    }
}

/// An embedder whose backend is permanently down.
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(QaError::Embedding {
            provider: "test".to_string(),
            message: "backend unavailable".to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        DIM
    }

    fn identity(&self) -> EmbedderIdentity {
        EmbedderIdentity::new("test", "failing")
    }
}

/// An in-memory index that counts upserts and can be configured to fail
/// namespace deletion.
pub struct InstrumentedIndex {
    inner: InMemoryVectorIndex,
    fail_deletes: bool,
    upserts: AtomicUsize,
}

impl InstrumentedIndex {
    pub fn new() -> Self {
        Self {
            inner: InMemoryVectorIndex::new(),
            fail_deletes: false,
            upserts: AtomicUsize::new(0),
        }
    }

    pub fn failing_deletes() -> Self {
        Self { fail_deletes: true, ..Self::new() }
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorIndex for InstrumentedIndex {
    async fn upsert(&self, corpus_id: Uuid, chunks: &[Chunk]) -> Result<()> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert(corpus_id, chunks).await
    }

    async fn query(
        &self,
        corpus_id: Uuid,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        self.inner.query(corpus_id, embedding, top_k).await
    }

    async fn delete_corpus(&self, corpus_id: Uuid) -> Result<()> {
        if self.fail_deletes {
            return Err(QaError::Index {
                backend: "test".to_string(),
                message: "delete unavailable".to_string(),
            });
        }
        self.inner.delete_corpus(corpus_id).await
    }
}

/// A generator that ignores the prompt and replies with a fixed string.
pub struct ScriptedGenerator {
    reply: String,
}

impl ScriptedGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

#[async_trait]
impl AnswerGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A generator that sleeps far past any reasonable deadline.
pub struct StalledGenerator;

#[async_trait]
impl AnswerGenerator for StalledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Ok(String::new())
    }

    fn name(&self) -> &str {
        "stalled"
    }
}
