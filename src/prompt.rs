//! Grounded prompt assembly under a context budget.

use crate::document::SearchResult;
use crate::retriever::RetrievalResult;

/// The citation format the generator is instructed to emit.
///
/// The citation extractor parses exactly this shape back out of the
/// generated answer.
pub const CITATION_FORMAT: &str = "(Source: <document name>, page <N>)";

/// An assembled prompt together with the chunks that made it in.
///
/// `context` is the subset of the retrieval that fit the budget, in rank
/// order. Citations are validated against this subset, never against
/// chunks the model was not shown.
#[derive(Debug, Clone)]
pub struct AssembledPrompt {
    /// The full prompt string sent to the generator.
    pub prompt: String,
    /// The retrieved chunks included in the prompt, best first.
    pub context: Vec<SearchResult>,
}

/// Build a grounded prompt from retrieved chunks.
///
/// The instruction requires the generator to answer only from the
/// supplied context and to close with 2-4 citations in
/// [`CITATION_FORMAT`]. Context blocks appear in descending relevance
/// order, each tagged `[<document> | page <N>]`.
///
/// Budget policy: chunks are appended in rank order until the next block
/// would push the context section past `context_budget` bytes; the
/// first chunk that does not fit is dropped whole (never truncated, so a
/// partial passage can never be cited) and assembly stops there.
pub fn assemble(
    question: &str,
    retrieval: &RetrievalResult,
    context_budget: usize,
) -> AssembledPrompt {
    let mut context_section = String::new();
    let mut context = Vec::new();

    for result in retrieval.results() {
        let block = format!(
            "[{} | page {}]\n{}",
            result.chunk.document, result.chunk.page, result.chunk.text
        );
        let separator = if context_section.is_empty() { 0 } else { 2 };
        if context_section.len() + separator + block.len() > context_budget {
            break;
        }
        if separator > 0 {
            context_section.push_str("\n\n");
        }
        context_section.push_str(&block);
        context.push(result.clone());
    }

    let prompt = format!(
        "You are an assistant for analysing PDF documents. Work exclusively \
         with the context supplied below. If the requested information is not \
         in the context, say so clearly instead of guessing.\n\n\
         === AVAILABLE CONTEXT ===\n{context_section}\n\n\
         === QUESTION ===\n{question}\n\n\
         At the end of your answer, include 2-4 supporting citations in the \
         exact format: {CITATION_FORMAT}."
    );

    AssembledPrompt { prompt, context }
}
