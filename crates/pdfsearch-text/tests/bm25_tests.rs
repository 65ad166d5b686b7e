use pdfsearch_core::types::{Chunk, SearchMode};
use pdfsearch_text::{Analyzer, Bm25Params, LexicalIndex};

fn chunks(texts: &[&str]) -> Vec<Chunk> {
    texts
        .iter()
        .enumerate()
        .map(|(id, text)| Chunk { id, text: text.to_string(), source_document: "doc.pdf".into(), position: id })
        .collect()
}

fn index(texts: &[&str]) -> LexicalIndex {
    LexicalIndex::build(&chunks(texts), Bm25Params::default(), Analyzer::default())
}

#[test]
fn cat_query_excludes_chunk_without_overlap() {
    let index = index(&["the cat sat on the mat", "dogs bark loudly", "the cat and the dog played"]);
    let results = index.search("cat", 2);

    let ids: Vec<usize> = results.iter().map(|r| r.chunk_id).collect();
    assert_eq!(ids, vec![0, 2], "equal scores fall back to ascending chunk id");
    assert!(results.iter().all(|r| r.method == SearchMode::Lexical));
    assert!(results.iter().all(|r| r.raw_score > 0.0));
}

#[test]
fn never_returns_chunks_without_query_terms() {
    let texts = [
        "rust ownership and borrowing",
        "python garbage collection",
        "borrowing money from a bank",
        "ownership of property",
        "completely unrelated sentence",
    ];
    let analyzer = Analyzer::default();
    let index = index(&texts);
    for query in ["ownership", "borrowing rules", "bank python", "nothing matches here"] {
        let query_terms = analyzer.tokenize(query);
        for r in index.search(query, 10) {
            let chunk_terms = analyzer.tokenize(texts[r.chunk_id]);
            assert!(
                query_terms.iter().any(|t| chunk_terms.contains(t)),
                "chunk {} returned for '{}' without overlap",
                r.chunk_id,
                query
            );
        }
    }
}

#[test]
fn score_is_non_decreasing_in_term_frequency() {
    // Same length (4 tokens) with 1..=4 occurrences of "apple".
    let index = index(&[
        "apple kiwi lime mango",
        "apple apple lime mango",
        "apple apple apple mango",
        "apple apple apple apple",
        "pear plum fig date",
    ]);
    let results = index.search("apple", 10);
    let score_of = |id: usize| results.iter().find(|r| r.chunk_id == id).map(|r| r.raw_score).unwrap_or(0.0);
    for id in 0..3 {
        assert!(score_of(id + 1) >= score_of(id), "tf {} scored below tf {}", id + 2, id + 1);
    }
    assert_eq!(results.first().map(|r| r.chunk_id), Some(3));
}

#[test]
fn rarer_terms_weigh_more() {
    let index = index(&["common rare", "common", "common", "common"]);
    assert_eq!(index.doc_freq("common"), 4);
    assert_eq!(index.doc_freq("RARE"), 1);
    let results = index.search("rare common", 10);
    assert_eq!(results[0].chunk_id, 0);
}

#[test]
fn respects_top_k_and_orders_descending() {
    let texts: Vec<String> = (1..=8).map(|n| format!("{} filler words", "term ".repeat(n))).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let results = index(&refs).search("term", 3);
    assert_eq!(results.len(), 3);
    assert!(results.windows(2).all(|w| w[0].raw_score >= w[1].raw_score));
}

#[test]
fn empty_corpus_and_empty_queries_return_nothing() {
    let empty = index(&[]);
    assert!(empty.is_empty());
    assert!(empty.search("anything", 5).is_empty());

    let index = index(&["some text"]);
    assert!(index.search("the of and", 5).is_empty(), "stop words only");
    assert!(index.search("!!!", 5).is_empty());
    assert!(index.search("text", 0).is_empty());
}

#[test]
fn parameters_change_length_normalization() {
    let texts = ["needle", "needle hay hay hay hay hay hay hay"];
    let no_norm = LexicalIndex::build(&chunks(&texts), Bm25Params { k1: 1.5, b: 0.0 }, Analyzer::default());
    let results = no_norm.search("needle", 2);
    assert!((results[0].raw_score - results[1].raw_score).abs() < 1e-6, "b = 0 ignores length");

    let full_norm = index(&texts);
    let results = full_norm.search("needle", 2);
    assert_eq!(results[0].chunk_id, 0, "shorter chunk wins with length normalization");
    assert!(results[0].raw_score > results[1].raw_score);
}
