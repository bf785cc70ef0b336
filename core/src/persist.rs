use crate::DocId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    /// The final merged index, seekable by byte offset.
    pub fn index(&self) -> PathBuf { self.root.join("index.txt") }
    pub fn docs(&self) -> PathBuf { self.root.join("docs.bin") }
    pub fn terms(&self) -> PathBuf { self.root.join("terms.bin") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    /// Transient spill segment `n` (numbered from 1), deleted by the merge.
    pub fn segment(&self, n: usize) -> PathBuf { self.root.join(format!("segment-{n}.txt")) }
}

pub fn save_docs(paths: &IndexPaths, docs: &HashMap<DocId, String>) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.docs())?;
    let bytes = bincode::serialize(docs)?;
    f.write_all(&bytes)?;
    tracing::debug!(entries = docs.len(), "saved document directory");
    Ok(())
}

pub fn load_docs(paths: &IndexPaths) -> Result<HashMap<DocId, String>> {
    let mut f = File::open(paths.docs()).context("opening document directory")?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let docs = bincode::deserialize(&buf).context("decoding document directory")?;
    Ok(docs)
}

pub fn save_terms(paths: &IndexPaths, terms: &HashMap<String, u64>) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.terms())?;
    let bytes = bincode::serialize(terms)?;
    f.write_all(&bytes)?;
    tracing::debug!(entries = terms.len(), "saved term directory");
    Ok(())
}

pub fn load_terms(paths: &IndexPaths) -> Result<HashMap<String, u64>> {
    let mut f = File::open(paths.terms()).context("opening term directory")?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let terms = bincode::deserialize(&buf).context("decoding term directory")?;
    Ok(terms)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta()).context("opening index metadata")?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf).context("decoding index metadata")?;
    Ok(meta)
}
