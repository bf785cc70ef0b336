use sift_core::tokenizer::tokenize;

#[test]
fn it_normalizes_and_stems() {
    let toks = tokenize("Running Runners RUN! The café's menu.");
    assert!(toks.contains(&"run".to_string()));
    // Unicode normalization + lowercasing: café -> cafe (stemmed)
    assert!(toks.iter().any(|t| t.starts_with("caf")));
}

#[test]
fn it_merges_contractions_and_drops_possessives() {
    let toks = tokenize("don't touch the cat's toy");
    // "do" + "n't" re-join into one token before stemming
    assert!(toks.iter().any(|t| t.contains('\'')));
    // the possessive fragment itself never survives as a term
    assert!(!toks.contains(&"'s".to_string()));
    assert!(toks.contains(&"cat".to_string()));
}

#[test]
fn it_keeps_only_alphanumeric_leading_tokens() {
    let toks = tokenize("hello, world... 42 --- !!!");
    assert_eq!(toks, vec!["hello", "world", "42"]);
}

#[test]
fn common_words_are_kept() {
    // No stopword removal: document frequency is what discounts them.
    let toks = tokenize("the cat and the dog");
    assert!(toks.contains(&"the".to_string()));
}
