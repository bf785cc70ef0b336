use anyhow::{anyhow, ensure, Context, Result};
use serde::Deserialize;
use sift_core::extract::extract;
use sift_core::persist::{save_docs, save_meta, save_terms, IndexPaths, MetaFile};
use sift_core::segment::{parse_line, write_line, write_segment};
use sift_core::tokenizer::tokenize;
use sift_core::weight::round_up_2dp;
use sift_core::{DocId, InvertedIndex, Posting};
use walkdir::WalkDir;

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Bonus added per token occurrence in title/h1/h2/h3 tags.
const HEADING_BONUS: u32 = 2;
/// Bonus added per token occurrence in strong/b tags.
const EMPHASIS_BONUS: u32 = 1;

#[derive(Debug, Deserialize)]
struct InputDoc {
    url: String,
    content: String,
}

#[derive(Debug)]
pub struct BuildStats {
    pub num_docs: u32,
    pub num_terms: usize,
    pub num_segments: usize,
}

pub struct FinishedBuild {
    pub paths: IndexPaths,
    pub segments: Vec<PathBuf>,
    pub num_docs: u32,
    pub num_terms: usize,
}

/// Accumulates the in-memory inverted index across documents, spilling a
/// segment file every `threshold` documents, and fills the document
/// directory as a side effect of ingestion. The term dictionary only ever
/// grows; spilling resets posting lists, never term keys.
pub struct IndexBuilder {
    paths: IndexPaths,
    index: InvertedIndex,
    docs: HashMap<DocId, String>,
    next_doc_id: DocId,
    threshold: u32,
    since_spill: u32,
    segments: Vec<PathBuf>,
}

impl IndexBuilder {
    /// `expected_docs` is the upfront corpus size; the spill threshold is
    /// one tenth of it, rounded down. A zero threshold (fewer than ten
    /// documents) means the index is spilled exactly once, at the end.
    pub fn new<P: AsRef<Path>>(output: P, expected_docs: u32) -> Result<Self> {
        let paths = IndexPaths::new(output);
        fs::create_dir_all(&paths.root)?;
        Ok(Self {
            paths,
            index: InvertedIndex::new(),
            docs: HashMap::new(),
            next_doc_id: 0,
            threshold: expected_docs / 10,
            since_spill: 0,
            segments: Vec::new(),
        })
    }

    /// Ingest one document: record its URL in the document directory,
    /// compute field bonuses and log-weighted term frequencies, append a
    /// posting per distinct term, and spill if the interval is full.
    /// Returns the assigned document id, counted from 1.
    pub fn ingest(&mut self, url: &str, html: &str) -> Result<DocId> {
        self.next_doc_id += 1;
        let doc_id = self.next_doc_id;
        self.docs.insert(doc_id, url.to_string());

        let page = extract(html);
        let mut bonus: HashMap<String, u32> = HashMap::new();
        for term in tokenize(&page.headings) {
            *bonus.entry(term).or_insert(0) += HEADING_BONUS;
        }
        for term in tokenize(&page.emphasis) {
            *bonus.entry(term).or_insert(0) += EMPHASIS_BONUS;
        }

        // Raw count per term: the field bonus plus one per body
        // occurrence, tracked in first-occurrence order so new terms
        // enter the dictionary in the order the document mentions them.
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, u32> = HashMap::new();
        for term in tokenize(&page.body) {
            match counts.get_mut(&term) {
                Some(c) => *c += 1,
                None => {
                    let base = bonus.get(&term).copied().unwrap_or(0);
                    counts.insert(term.clone(), base + 1);
                    order.push(term);
                }
            }
        }

        for term in &order {
            let c = f64::from(counts[term]);
            let weight = round_up_2dp(1.0 + c.log10());
            self.index.push(term, Posting { doc_id, weight });
        }

        self.since_spill += 1;
        if self.threshold > 0 && self.since_spill == self.threshold {
            self.spill()?;
        }
        Ok(doc_id)
    }

    fn spill(&mut self) -> Result<()> {
        let path = self.paths.segment(self.segments.len() + 1);
        let f = File::create(&path)
            .with_context(|| format!("creating segment {}", path.display()))?;
        let mut w = BufWriter::new(f);
        write_segment(&mut w, &self.index)?;
        w.flush()?;
        self.index.reset_postings();
        self.since_spill = 0;
        tracing::info!(
            segment = %path.display(),
            terms = self.index.num_terms(),
            "spilled segment"
        );
        self.segments.push(path);
        Ok(())
    }

    pub fn num_docs(&self) -> u32 {
        self.next_doc_id
    }

    /// Spill whatever is pending (at least once over the whole build),
    /// persist the document directory and metadata, and hand the segment
    /// list to the merge.
    pub fn finish(mut self) -> Result<FinishedBuild> {
        if self.since_spill > 0 || self.segments.is_empty() {
            self.spill()?;
        }
        save_docs(&self.paths, &self.docs)?;
        let meta = MetaFile {
            num_docs: self.next_doc_id,
            created_at: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_default(),
            version: 1,
        };
        save_meta(&self.paths, &meta)?;
        Ok(FinishedBuild {
            num_docs: self.next_doc_id,
            num_terms: self.index.num_terms(),
            paths: self.paths,
            segments: self.segments,
        })
    }
}

/// Merge the spill segments into the final index with a synchronized
/// lockstep read: every still-open cursor's next line names the same term
/// (each segment's term set is an order-preserving prefix of the next
/// one's), so one round's postings are exactly one term's corpus-wide
/// posting list and their count is its document frequency. No term
/// comparison or sorting happens here. Consumed segments are deleted.
pub fn merge_segments(paths: &IndexPaths, segments: &[PathBuf], num_docs: u32) -> Result<()> {
    let mut cursors = Vec::with_capacity(segments.len());
    for path in segments {
        let f = File::open(path)
            .with_context(|| format!("opening segment {}", path.display()))?;
        cursors.push(Some(BufReader::new(f)));
    }
    let out_path = paths.index();
    let mut out = BufWriter::new(
        File::create(&out_path)
            .with_context(|| format!("creating final index {}", out_path.display()))?,
    );

    let n = f64::from(num_docs);
    let mut open = cursors.len();
    while open > 0 {
        let mut term: Option<String> = None;
        let mut postings: Vec<Posting> = Vec::new();
        for (i, slot) in cursors.iter_mut().enumerate() {
            let Some(reader) = slot else { continue };
            let mut line = String::new();
            let read = reader
                .read_line(&mut line)
                .with_context(|| format!("reading segment {}", segments[i].display()))?;
            if read == 0 {
                *slot = None;
                open -= 1;
                continue;
            }
            let (t, ps) =
                parse_line(&line).with_context(|| format!("in segment {}", segments[i].display()))?;
            match &term {
                None => term = Some(t),
                Some(current) => ensure!(
                    *current == t,
                    "segments out of step: expected term {current:?}, segment {} has {t:?}",
                    segments[i].display()
                ),
            }
            postings.extend(ps);
        }
        let Some(term) = term else { continue };
        // Each document lands in exactly one spill interval, so the union
        // gathered this round has one posting per containing document and
        // its length is the term's true document frequency.
        if !postings.is_empty() {
            let idf = (n / postings.len() as f64).log10();
            for p in postings.iter_mut() {
                p.weight = round_up_2dp(p.weight * idf);
            }
        }
        write_line(&mut out, &term, &postings)?;
    }
    out.flush()?;

    for path in segments {
        fs::remove_file(path)
            .with_context(|| format!("removing segment {}", path.display()))?;
    }
    Ok(())
}

/// Scan the final index once, recording each term's starting byte offset.
/// The scan is driven strictly by end-of-file: the number of lines equals
/// the number of distinct terms, which is unrelated to the document
/// count. Persists the directory and returns it.
pub fn build_term_directory(paths: &IndexPaths) -> Result<HashMap<String, u64>> {
    let f = File::open(paths.index()).context("opening final index")?;
    let mut reader = BufReader::new(f);
    let mut directory: HashMap<String, u64> = HashMap::new();
    let mut offset: u64 = 0;
    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            break;
        }
        let term = line
            .split_once(": ")
            .map(|(t, _)| t.to_string())
            .ok_or_else(|| anyhow!("malformed final index line at offset {offset}: {line:?}"))?;
        directory.insert(term, offset);
        offset += read as u64;
    }
    save_terms(paths, &directory)?;
    Ok(directory)
}

/// Walk `input` for `.json` documents ({url, content} records) and build
/// the full index under `output`: ingest, spill, merge, term directory.
pub fn build_corpus(input: &Path, output: &Path) -> Result<BuildStats> {
    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .map(|e| e.into_path())
        .collect();
    // Traversal order fixes DocId assignment; sort so builds are
    // reproducible across filesystems.
    files.sort();

    let total = files.len();
    let mut builder = IndexBuilder::new(output, total as u32)?;
    let mut finished = 0usize;
    for file in &files {
        let doc = match read_doc(file) {
            Ok(doc) => doc,
            Err(e) => {
                // A malformed document is skipped before any id is
                // assigned, so it can never sit in the index without a
                // document directory entry.
                tracing::warn!(file = %file.display(), error = %e, "skipping malformed document");
                continue;
            }
        };
        builder.ingest(&doc.url, &doc.content)?;
        finished += 1;
        tracing::debug!(progress = %format!("{finished}/{total}"), "indexed document");
    }

    let build = builder.finish()?;
    merge_segments(&build.paths, &build.segments, build.num_docs)?;
    let directory = build_term_directory(&build.paths)?;
    Ok(BuildStats {
        num_docs: build.num_docs,
        num_terms: directory.len(),
        num_segments: build.segments.len(),
    })
}

fn read_doc(path: &Path) -> Result<InputDoc> {
    let f = File::open(path)?;
    let doc = serde_json::from_reader(BufReader::new(f))?;
    Ok(doc)
}
