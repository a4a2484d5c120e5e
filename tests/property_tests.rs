//! Property tests for chunking, prompt budgeting, citation soundness,
//! and retrieval ordering.

use std::collections::HashSet;

use docqa::chunking::{Chunker, PageChunker};
use docqa::citation::extract_citations;
use docqa::document::{Chunk, PageText, SearchResult};
use docqa::inmemory::InMemoryVectorIndex;
use docqa::prompt::assemble;
use docqa::retriever::RetrievalResult;
use docqa::vectorstore::VectorIndex;
use proptest::prelude::*;
use uuid::Uuid;

/// Chunk size and a strictly smaller overlap.
fn arb_chunk_params() -> impl Strategy<Value = (usize, usize)> {
    (4usize..64).prop_flat_map(|size| (Just(size), 0..size))
}

/// Page text mixing ASCII, whitespace, and multibyte characters.
fn arb_page_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9äöüñé \n]{0,200}"
}

fn arb_pages() -> impl Strategy<Value = Vec<PageText>> {
    proptest::collection::vec(arb_page_text(), 1..5).prop_map(|texts| {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageText { page: i + 1, text })
            .collect()
    })
}

proptest! {
    /// Same input and parameters always produce the same chunk sequence.
    #[test]
    fn chunking_is_deterministic(pages in arb_pages(), (size, overlap) in arb_chunk_params()) {
        let chunker = PageChunker::new(size, overlap);
        prop_assert_eq!(chunker.chunk("doc.pdf", &pages), chunker.chunk("doc.pdf", &pages));
    }

    /// Every chunk slices cleanly out of its page at the stored offsets,
    /// stays within the size limit, and never crosses a page boundary.
    #[test]
    fn chunk_provenance_round_trips(pages in arb_pages(), (size, overlap) in arb_chunk_params()) {
        let chunker = PageChunker::new(size, overlap);
        for chunk in chunker.chunk("doc.pdf", &pages) {
            prop_assert!(chunk.page >= 1 && chunk.page <= pages.len());
            let page = &pages[chunk.page - 1];
            prop_assert_eq!(&page.text[chunk.start..chunk.end], chunk.text.as_str());
            prop_assert!(chunk.text.len() <= size);
            prop_assert!(!chunk.text.trim().is_empty());
        }
    }
}

fn arb_search_results() -> impl Strategy<Value = Vec<SearchResult>> {
    proptest::collection::vec(("[a-c]\\.pdf", 1usize..6, "[a-z ]{0,80}", 0.0f32..1.0), 0..12)
        .prop_map(|entries| {
            let mut results: Vec<SearchResult> = entries
                .into_iter()
                .enumerate()
                .map(|(i, (document, page, text, score))| SearchResult {
                    chunk: Chunk {
                        id: format!("{document}#p{page}.{i}"),
                        document,
                        page,
                        start: 0,
                        end: text.len(),
                        text,
                        embedding: Vec::new(),
                    },
                    score,
                })
                .collect();
            results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
            results
        })
}

proptest! {
    /// The assembled context never exceeds the configured budget, for any
    /// retrieval size, and included chunks stay in rank order.
    #[test]
    fn context_budget_is_respected(results in arb_search_results(), budget in 1usize..2000) {
        let retrieval = RetrievalResult::new(results);
        let assembled = assemble("question?", &retrieval, budget);

        let blocks: Vec<String> = assembled
            .context
            .iter()
            .map(|r| format!("[{} | page {}]\n{}", r.chunk.document, r.chunk.page, r.chunk.text))
            .collect();
        let total = blocks.iter().map(String::len).sum::<usize>()
            + blocks.len().saturating_sub(1) * 2;
        prop_assert!(total <= budget, "context {total} exceeds budget {budget}");

        for window in assembled.context.windows(2) {
            prop_assert!(window[0].score >= window[1].score);
        }
    }
}

/// Either filler prose or a citation token for some (document, page),
/// in or out of context.
fn arb_answer_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z .]{0,30}",
        ("[a-e]\\.pdf|evil\\.pdf|unknown\\.pdf", 0usize..12)
            .prop_map(|(document, page)| format!("(Source: {document}, page {page})")),
        ("[a-e]\\.pdf", 1usize..12, 1usize..12)
            .prop_map(|(document, first, last)| format!(
                "(Source: {document}, pages {first}-{last})"
            )),
    ]
}

proptest! {
    /// Citations only ever reference identifiers present in the context,
    /// no matter what the generator emits.
    #[test]
    fn citations_are_always_in_context(
        context in arb_search_results(),
        fragments in proptest::collection::vec(arb_answer_fragment(), 0..10),
    ) {
        let answer = fragments.join(" ");
        let known: HashSet<(String, usize)> = context
            .iter()
            .map(|r| (r.chunk.document.clone(), r.chunk.page))
            .collect();

        let citations = extract_citations(&answer, &context);
        let mut seen = HashSet::new();
        for citation in citations {
            prop_assert!(
                known.contains(&(citation.document.clone(), citation.page)),
                "citation to ({}, {}) not in context",
                citation.document,
                citation.page,
            );
            prop_assert!(seen.insert((citation.document, citation.page)), "duplicate citation");
        }
    }
}

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

fn arb_embedded_chunk(dim: usize) -> impl Strategy<Value = Chunk> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(
        |(id, text, embedding)| Chunk {
            id,
            document: "doc.pdf".to_string(),
            page: 1,
            start: 0,
            end: 0,
            text,
            embedding,
        },
    )
}

mod prop_index_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Query results are ordered by descending score, bounded by
        /// top_k, and stable across repeated queries.
        #[test]
        fn results_ordered_bounded_and_stable(
            chunks in proptest::collection::vec(arb_embedded_chunk(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (first, second, count) = rt.block_on(async {
                let index = InMemoryVectorIndex::new();
                let corpus = Uuid::new_v4();
                index.upsert(corpus, &chunks).await.unwrap();
                let first = index.query(corpus, &query, top_k).await.unwrap();
                let second = index.query(corpus, &query, top_k).await.unwrap();
                (first, second, chunks.len())
            });

            prop_assert!(first.len() <= top_k);
            prop_assert!(first.len() <= count);

            for window in first.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }

            // Deterministic: repeated queries return the same ranking.
            let first_ids: Vec<&str> = first.iter().map(|r| r.chunk.id.as_str()).collect();
            let second_ids: Vec<&str> = second.iter().map(|r| r.chunk.id.as_str()).collect();
            prop_assert_eq!(first_ids, second_ids);
        }
    }
}
