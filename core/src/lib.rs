//! In-memory keyword search over a small document corpus.
//!
//! Documents are tokenized into positional postings by a partitioned,
//! multi-threaded builder and published as an immutable [`IndexSnapshot`].
//! Queries run against the snapshot: boolean AND over corrected terms, BM25
//! (or TF-IDF) scoring with phrase and proximity boosts, and snippets taken
//! from the raw content. A prefix [`Trie`] over the vocabulary serves
//! autocomplete.

pub mod builder;
pub mod config;
pub mod engine;
pub mod index;
pub mod query;
pub mod sample;
pub mod scoring;
pub mod source;
pub mod spell;
pub mod tokenizer;
pub mod trie;

pub use builder::IndexSnapshot;
pub use config::{EngineConfig, ScoringModel};
pub use engine::{Document, DocumentOrigin, IndexState, SearchEngine};
pub use index::{CorpusStats, InvertedIndex, Posting};
pub use query::SearchResult;
pub use source::{ContentSource, FsContentSource};
pub use trie::Trie;

pub type DocId = u32;
