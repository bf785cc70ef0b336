use anyhow::{ensure, Context, Result};
use sift_core::persist::{load_docs, load_meta, load_terms, IndexPaths};
use sift_core::segment::parse_line;
use sift_core::tokenizer::tokenize;
use sift_core::{DocId, Posting};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    pub url: String,
}

/// Read-only query engine over the persisted artifacts: the final index
/// file plus the term and document directories. Term lookups seek the
/// index file by byte offset; no full scan happens at query time.
pub struct QueryEngine {
    paths: IndexPaths,
    terms: HashMap<String, u64>,
    docs: HashMap<DocId, String>,
    num_docs: u32,
}

impl QueryEngine {
    /// Load the directories and metadata. Missing or unreadable
    /// artifacts are fatal here, not at query time.
    pub fn open<P: AsRef<Path>>(index_dir: P) -> Result<Self> {
        let paths = IndexPaths::new(index_dir);
        let terms = load_terms(&paths)?;
        let docs = load_docs(&paths)?;
        let meta = load_meta(&paths)?;
        tracing::info!(
            num_docs = meta.num_docs,
            num_terms = terms.len(),
            "query engine ready"
        );
        Ok(Self { paths, terms, docs, num_docs: meta.num_docs })
    }

    /// Rank documents against `query` by cosine similarity over the
    /// query's term dimensions and return at most `k` hits. Unknown
    /// terms are silently dropped; a query with no known terms yields an
    /// empty result.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        // Distinct known terms in first-occurrence order, with counts.
        let mut terms: Vec<String> = Vec::new();
        let mut counts: HashMap<String, u32> = HashMap::new();
        for token in tokenize(query) {
            if !self.terms.contains_key(&token) {
                continue;
            }
            match counts.get_mut(&token) {
                Some(c) => *c += 1,
                None => {
                    counts.insert(token.clone(), 1);
                    terms.push(token);
                }
            }
        }
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let postings = self.retrieve(&terms)?;

        // Query vector, one dimension per distinct term.
        let n = f64::from(self.num_docs.max(1));
        let qvec: Vec<f64> = terms
            .iter()
            .zip(&postings)
            .map(|(term, ps)| {
                let tf = 1.0 + f64::from(counts[term]).log10();
                let idf = (n / ps.len().max(1) as f64).log10();
                tf * idf
            })
            .collect();

        // Document vectors over the query dimensions, zero-initialized,
        // kept in posting-discovery order.
        let dims = terms.len();
        let mut order: Vec<DocId> = Vec::new();
        let mut vectors: HashMap<DocId, Vec<f64>> = HashMap::new();
        for (dim, ps) in postings.iter().enumerate() {
            for p in ps {
                let v = vectors.entry(p.doc_id).or_insert_with(|| {
                    order.push(p.doc_id);
                    vec![0.0; dims]
                });
                v[dim] = p.weight;
            }
        }

        let qnorm = norm(&qvec);
        let mut scored: Vec<(DocId, f64, f64)> = order
            .iter()
            .map(|&doc_id| {
                let v = &vectors[&doc_id];
                let dot = qvec.iter().zip(v).map(|(a, b)| a * b).sum::<f64>();
                let dnorm = norm(v);
                // 0/0 is undefined; a zero-magnitude vector scores zero.
                let score = if qnorm == 0.0 || dnorm == 0.0 {
                    0.0
                } else {
                    dot / (qnorm * dnorm)
                };
                (doc_id, score, dot)
            })
            .collect();
        // Cosine ties (every single-term query ties at 1.0) fall back to
        // the unnormalized dot product; full ties keep discovery order.
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal))
        });
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .filter_map(|(doc_id, score, _)| {
                self.docs
                    .get(&doc_id)
                    .map(|url| SearchHit { doc_id, score, url: url.clone() })
            })
            .collect())
    }

    /// Seek the final index to each term's recorded offset and read
    /// exactly one line per term.
    fn retrieve(&self, terms: &[String]) -> Result<Vec<Vec<Posting>>> {
        let f = File::open(self.paths.index()).context("opening final index")?;
        let mut reader = BufReader::new(f);
        let mut out = Vec::with_capacity(terms.len());
        for term in terms {
            let offset = self.terms[term];
            reader.seek(SeekFrom::Start(offset))?;
            let mut line = String::new();
            reader.read_line(&mut line)?;
            let (found, postings) = parse_line(&line)?;
            ensure!(
                found == *term,
                "term directory points {term:?} at a line for {found:?}"
            );
            out.push(postings);
        }
        Ok(out)
    }
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}
