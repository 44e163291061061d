//! Partitioned, multi-threaded index construction.
//!
//! Documents are split into contiguous id ranges, one per worker. Each worker
//! tokenizes its own range into a private [`LocalIndex`]; nothing is shared
//! while workers run. After every worker has joined, the fragments are merged
//! on the calling thread. Since the id ranges are disjoint, the merge never
//! sees two writers for the same (term, document) pair and the outcome does
//! not depend on which worker finished first.

use crate::engine::{Document, DocumentOrigin};
use crate::index::{CorpusStats, InvertedIndex};
use crate::source::ContentSource;
use crate::tokenizer::tokenize;
use crate::trie::Trie;
use crate::DocId;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Worker count used when the platform cannot report its parallelism.
pub const DEFAULT_WORKERS: usize = 4;

/// Everything a query needs, built in one pass and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    pub index: InvertedIndex,
    pub stats: CorpusStats,
    pub trie: Trie,
    /// Raw text of every indexed document, for snippets.
    pub contents: HashMap<DocId, Arc<str>>,
    /// Display names, indexed by document id.
    pub names: Vec<String>,
}

impl IndexSnapshot {
    pub fn content(&self, doc_id: DocId) -> Option<&str> {
        self.contents.get(&doc_id).map(|c| &**c)
    }

    pub fn name(&self, doc_id: DocId) -> &str {
        self.names.get(doc_id as usize).map_or("", String::as_str)
    }
}

/// One worker's output.
#[derive(Debug, Default)]
pub struct LocalIndex {
    pub index: InvertedIndex,
    pub doc_lengths: HashMap<DocId, usize>,
    pub contents: HashMap<DocId, Arc<str>>,
}

/// Platform parallelism, falling back to [`DEFAULT_WORKERS`].
pub fn default_workers() -> usize {
    thread::available_parallelism().map_or(DEFAULT_WORKERS, |n| n.get())
}

/// Split `0..n` into contiguous ranges of `ceil(n / workers)` ids.
///
/// Trailing workers may receive nothing when `n` is small; those ranges are
/// omitted.
pub fn partition(n: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let chunk = n.div_ceil(workers).max(1);
    (0..n).step_by(chunk).map(|start| start..(start + chunk).min(n)).collect()
}

fn load(doc: &Document, source: &dyn ContentSource) -> Option<Arc<str>> {
    match &doc.origin {
        DocumentOrigin::Inline(content) => Some(Arc::clone(content)),
        DocumentOrigin::Path(path) => match source.read(path) {
            Ok(text) => Some(Arc::from(text)),
            Err(err) => {
                warn!(doc_id = doc.id, error = %err, "skipping unreadable document");
                None
            }
        },
    }
}

/// Tokenize `docs` into a private fragment. `docs` is one worker's range.
pub fn index_range(docs: &[Document], source: &dyn ContentSource) -> LocalIndex {
    let mut local = LocalIndex::default();
    for doc in docs {
        let Some(content) = load(doc, source) else { continue };
        let mut length = 0;
        for token in tokenize(&content) {
            local.index.record(token.term, doc.id, token.position, token.offset);
            length += 1;
        }
        local.doc_lengths.insert(doc.id, length);
        local.contents.insert(doc.id, content);
    }
    local
}

/// Fold worker fragments into the global structures.
pub fn merge(num_docs: usize, names: Vec<String>, fragments: Vec<LocalIndex>) -> IndexSnapshot {
    let mut index = InvertedIndex::new();
    let mut doc_lengths = HashMap::new();
    let mut contents = HashMap::new();
    for fragment in fragments {
        index.merge(fragment.index);
        doc_lengths.extend(fragment.doc_lengths);
        contents.extend(fragment.contents);
    }
    let stats = CorpusStats::new(num_docs, doc_lengths);
    let trie = index.terms().collect();
    IndexSnapshot { index, stats, trie, contents, names }
}

/// Build a complete snapshot of `docs` using up to `workers` threads.
pub fn build(docs: &[Document], workers: usize, source: &dyn ContentSource) -> IndexSnapshot {
    let start = Instant::now();
    let ranges = partition(docs.len(), workers);
    let fragments: Vec<LocalIndex> = thread::scope(|s| {
        let handles: Vec<_> = ranges
            .iter()
            .cloned()
            .enumerate()
            .map(|(worker, range)| {
                let slice = &docs[range.clone()];
                s.spawn(move || {
                    let local = index_range(slice, source);
                    debug!(worker, ?range, terms = local.index.num_terms(), "worker finished");
                    local
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    let names = docs.iter().map(|d| d.name.clone()).collect();
    let snapshot = merge(docs.len(), names, fragments);
    info!(
        num_docs = snapshot.stats.num_docs,
        indexed = snapshot.stats.doc_lengths.len(),
        num_terms = snapshot.index.num_terms(),
        avg_doc_length = snapshot.stats.avg_doc_length,
        workers = ranges.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "index build complete"
    );
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use std::path::{Path, PathBuf};

    struct MapSource(HashMap<PathBuf, String>);

    impl ContentSource for MapSource {
        fn read(&self, path: &Path) -> Result<String> {
            self.0.get(path).cloned().ok_or_else(|| anyhow!("missing {}", path.display()))
        }
    }

    fn inline_docs(texts: &[&str]) -> Vec<Document> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Document::inline(i as DocId, format!("doc{i}"), *t))
            .collect()
    }

    fn corpus() -> Vec<Document> {
        inline_docs(&[
            "the cat sat on the mat",
            "the cat ran fast",
            "dogs chase cats, cats chase mice",
            "C++ and Rust: systems languages",
            "",
            "mat mat mat",
            "rust rust cat",
        ])
    }

    #[test]
    fn partition_covers_every_id_once() {
        for n in 0..40 {
            for w in 1..10 {
                let ranges = partition(n, w);
                assert!(ranges.len() <= w);
                let mut seen = vec![0u8; n];
                for r in &ranges {
                    assert!(!r.is_empty());
                    for id in r.clone() {
                        seen[id] += 1;
                    }
                }
                assert!(seen.iter().all(|&c| c == 1), "n={n} w={w}");
            }
        }
    }

    #[test]
    fn worker_count_does_not_change_result() {
        let docs = corpus();
        let single = build(&docs, 1, &crate::FsContentSource);
        for w in [2, 3, 4, 16] {
            let multi = build(&docs, w, &crate::FsContentSource);
            assert_eq!(single.index, multi.index, "workers={w}");
            assert_eq!(single.stats, multi.stats, "workers={w}");
            assert_eq!(single.contents, multi.contents, "workers={w}");
        }
    }

    #[test]
    fn postings_are_well_formed() {
        let snapshot = build(&corpus(), 3, &crate::FsContentSource);
        for term in snapshot.index.terms() {
            for (doc_id, p) in snapshot.index.postings(term).unwrap() {
                assert_eq!(p.positions.len(), p.frequency as usize);
                assert_eq!(p.offsets.len(), p.frequency as usize);
                assert!(p.positions.windows(2).all(|w| w[0] < w[1]));
                let content = snapshot.content(*doc_id).unwrap();
                for &off in &p.offsets {
                    let word = content[off..].split_whitespace().next().unwrap();
                    assert_eq!(crate::tokenizer::normalize(word), term);
                }
            }
        }
        assert_eq!(snapshot.index.posting("cats", 2).unwrap().positions, vec![2, 3]);
    }

    #[test]
    fn rebuild_is_deterministic() {
        let docs = corpus();
        let a = build(&docs, 4, &crate::FsContentSource);
        let b = build(&docs, 4, &crate::FsContentSource);
        assert_eq!(a.index, b.index);
    }

    #[test]
    fn trie_matches_vocabulary() {
        let snapshot = build(&corpus(), 2, &crate::FsContentSource);
        let mut vocab: Vec<&str> = snapshot.index.terms().collect();
        vocab.sort_unstable();
        assert_eq!(snapshot.trie.autocomplete(""), vocab);
    }

    #[test]
    fn stats_follow_lengths() {
        let snapshot = build(&inline_docs(&["a b c", "d"]), 2, &crate::FsContentSource);
        assert_eq!(snapshot.stats.num_docs, 2);
        assert_eq!(snapshot.stats.doc_length(0), 3);
        assert_eq!(snapshot.stats.avg_doc_length, 2.0);
    }

    #[test]
    fn unreadable_documents_are_skipped() {
        let source = MapSource(HashMap::from([(PathBuf::from("a.txt"), "alpha beta".to_string())]));
        let docs = vec![
            Document::path(0, "a.txt"),
            Document::path(1, "missing.txt"),
        ];
        let snapshot = build(&docs, 2, &source);
        assert_eq!(snapshot.stats.num_docs, 2);
        assert_eq!(snapshot.stats.doc_lengths.len(), 1);
        assert_eq!(snapshot.stats.avg_doc_length, 2.0);
        assert!(snapshot.content(1).is_none());
        assert_eq!(snapshot.name(1), "missing.txt");
    }

    #[test]
    fn empty_corpus_builds_empty_snapshot() {
        let snapshot = build(&[], 4, &crate::FsContentSource);
        assert!(snapshot.index.is_empty());
        assert!(snapshot.trie.is_empty());
        assert_eq!(snapshot.stats.avg_doc_length, 0.0);
    }
}
