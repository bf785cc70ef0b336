pub mod extract;
pub mod index;
pub mod persist;
pub mod segment;
pub mod tokenizer;
pub mod weight;

pub use index::{DocId, InvertedIndex, Posting, TermId};
