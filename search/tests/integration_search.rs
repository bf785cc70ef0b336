use sift_indexer::build_corpus;
use sift_search::QueryEngine;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn write_doc(dir: &Path, name: &str, url: &str, content: &str) {
    let json = serde_json::json!({ "url": url, "content": content });
    fs::write(dir.join(name), json.to_string()).unwrap();
}

/// Three documents: doc 1 has "cat" twice in its title and "dog" once in
/// the body, doc 2 has "dog" three times, doc 3 has neither term.
fn example_engine() -> (TempDir, TempDir, QueryEngine) {
    let corpus = tempdir().unwrap();
    let index = tempdir().unwrap();
    write_doc(
        corpus.path(),
        "a.json",
        "https://example.com/cats",
        "<html><head><title>cat cat</title></head><body><p>dog</p></body></html>",
    );
    write_doc(
        corpus.path(),
        "b.json",
        "https://example.com/dogs",
        "<html><body>dog dog dog</body></html>",
    );
    write_doc(
        corpus.path(),
        "c.json",
        "https://example.com/birds",
        "<html><body>bird</body></html>",
    );
    let stats = build_corpus(corpus.path(), index.path()).unwrap();
    assert_eq!(stats.num_docs, 3);
    let engine = QueryEngine::open(index.path()).unwrap();
    (corpus, index, engine)
}

#[test]
fn cat_query_returns_only_the_title_document() {
    let (_c, _i, engine) = example_engine();
    let hits = engine.search("cat", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_id, 1);
    assert_eq!(hits[0].url, "https://example.com/cats");
}

#[test]
fn dog_query_ranks_higher_weighted_tf_first() {
    let (_c, _i, engine) = example_engine();
    let hits = engine.search("dog", 10).unwrap();
    let urls: Vec<&str> = hits.iter().map(|h| h.url.as_str()).collect();
    assert_eq!(urls, vec!["https://example.com/dogs", "https://example.com/cats"]);

    // k caps the result list.
    let top1 = engine.search("dog", 1).unwrap();
    assert_eq!(top1.len(), 1);
    assert_eq!(top1[0].doc_id, 2);
}

#[test]
fn unknown_and_empty_queries_return_no_hits() {
    let (_c, _i, engine) = example_engine();
    assert!(engine.search("zzz", 10).unwrap().is_empty());
    assert!(engine.search("", 10).unwrap().is_empty());
    assert!(engine.search("   !!! ...", 10).unwrap().is_empty());
}

#[test]
fn repeated_queries_are_deterministic() {
    let (_c, _i, engine) = example_engine();
    let first = engine.search("cat dog", 10).unwrap();
    let second = engine.search("cat dog", 10).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn single_document_corpus_scores_zero_not_nan() {
    let corpus = tempdir().unwrap();
    let index = tempdir().unwrap();
    write_doc(
        corpus.path(),
        "only.json",
        "https://example.com/only",
        "<html><body>hello world</body></html>",
    );
    build_corpus(corpus.path(), index.path()).unwrap();
    let engine = QueryEngine::open(index.path()).unwrap();
    // With one document, idf is zero for every term, so both vectors
    // have zero magnitude; the defined fallback score is 0.0.
    let hits = engine.search("hello", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].score, 0.0);
    assert_eq!(hits[0].url, "https://example.com/only");
}

#[test]
fn engine_open_fails_without_artifacts() {
    let empty = tempdir().unwrap();
    assert!(QueryEngine::open(empty.path()).is_err());
}
