use crate::DocId;
use serde::Serialize;
use std::collections::HashMap;

/// Occurrences of one term in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Posting {
    pub frequency: u32,
    /// Token positions, strictly increasing.
    pub positions: Vec<usize>,
    /// Byte offsets into the raw content, aligned with `positions`.
    pub offsets: Vec<usize>,
}

impl Posting {
    pub fn record(&mut self, position: usize, offset: usize) {
        self.frequency += 1;
        self.positions.push(position);
        self.offsets.push(offset);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvertedIndex {
    postings: HashMap<String, HashMap<DocId, Posting>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn record(&mut self, term: String, doc_id: DocId, position: usize, offset: usize) {
        self.postings.entry(term).or_default().entry(doc_id).or_default().record(position, offset);
    }

    /// Move every posting of `other` into `self`, overwriting on (term, doc) collisions.
    pub fn merge(&mut self, other: InvertedIndex) {
        for (term, docs) in other.postings {
            self.postings.entry(term).or_default().extend(docs);
        }
    }

    pub fn contains(&self, term: &str) -> bool { self.postings.contains_key(term) }

    pub fn postings(&self, term: &str) -> Option<&HashMap<DocId, Posting>> { self.postings.get(term) }

    pub fn posting(&self, term: &str, doc_id: DocId) -> Option<&Posting> {
        self.postings.get(term)?.get(&doc_id)
    }

    /// Number of documents containing `term`.
    pub fn doc_freq(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, HashMap::len)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }
}

/// Corpus-wide numbers the rankers need.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusStats {
    /// Registered documents, including ones whose content could not be read.
    pub num_docs: usize,
    pub doc_lengths: HashMap<DocId, usize>,
    pub avg_doc_length: f64,
}

impl CorpusStats {
    pub fn new(num_docs: usize, doc_lengths: HashMap<DocId, usize>) -> Self {
        let avg_doc_length = if doc_lengths.is_empty() {
            0.0
        } else {
            doc_lengths.values().sum::<usize>() as f64 / doc_lengths.len() as f64
        };
        Self { num_docs, doc_lengths, avg_doc_length }
    }

    pub fn doc_length(&self, doc_id: DocId) -> usize {
        self.doc_lengths.get(&doc_id).copied().unwrap_or(0)
    }
}
