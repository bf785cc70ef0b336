use std::collections::HashMap;

pub type TermId = u32;
pub type DocId = u32;

/// One document's weighted occurrence record for a term.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f64, // log-weighted tf in segments, tf-idf after merge
}

/// Insertion-ordered term -> postings map. A term enters the dictionary
/// the first time it is seen and is never removed; `reset_postings`
/// empties every posting list but keeps the keys and their order. As a
/// consequence, each spilled segment's term set is an exact,
/// order-preserving prefix of the next segment's, which is what lets the
/// merge read all segments in lockstep without comparing terms.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    dictionary: HashMap<String, TermId>,
    terms: Vec<String>,
    postings: Vec<Vec<Posting>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Look up a term's id, appending it to the dictionary if unseen.
    pub fn term_id(&mut self, term: &str) -> TermId {
        if let Some(&id) = self.dictionary.get(term) {
            return id;
        }
        let id = self.terms.len() as TermId;
        self.dictionary.insert(term.to_string(), id);
        self.terms.push(term.to_string());
        self.postings.push(Vec::new());
        id
    }

    pub fn push(&mut self, term: &str, posting: Posting) {
        let id = self.term_id(term);
        self.postings[id as usize].push(posting);
    }

    /// Terms and their postings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Posting])> {
        self.terms
            .iter()
            .zip(self.postings.iter())
            .map(|(t, p)| (t.as_str(), p.as_slice()))
    }

    /// Empty every posting list, keeping all term keys and their order.
    pub fn reset_postings(&mut self) {
        for list in self.postings.iter_mut() {
            list.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_keep_insertion_order() {
        let mut idx = InvertedIndex::new();
        idx.push("zebra", Posting { doc_id: 1, weight: 1.0 });
        idx.push("apple", Posting { doc_id: 1, weight: 1.0 });
        idx.push("zebra", Posting { doc_id: 2, weight: 1.5 });
        let terms: Vec<&str> = idx.iter().map(|(t, _)| t).collect();
        assert_eq!(terms, vec!["zebra", "apple"]);
    }

    #[test]
    fn reset_keeps_terms_but_clears_postings() {
        let mut idx = InvertedIndex::new();
        idx.push("cat", Posting { doc_id: 1, weight: 1.0 });
        idx.reset_postings();
        idx.push("dog", Posting { doc_id: 2, weight: 1.0 });
        let snapshot: Vec<(&str, usize)> = idx.iter().map(|(t, p)| (t, p.len())).collect();
        assert_eq!(snapshot, vec![("cat", 0), ("dog", 1)]);
        assert_eq!(idx.num_terms(), 2);
    }
}
