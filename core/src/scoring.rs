//! Relevance functions and positional adjacency scans.

use crate::index::Posting;

pub const K1: f64 = 1.5;
pub const B: f64 = 0.75;

pub const PHRASE_WEIGHT: f64 = 1.5;
pub const PROXIMITY_WEIGHT: f64 = 0.75;
/// Largest number of tokens allowed between two terms for a proximity hit.
pub const PROXIMITY_WINDOW: usize = 3;

/// Probabilistic IDF, always positive.
pub fn bm25_idf(num_docs: usize, doc_freq: usize) -> f64 {
    let n = num_docs as f64;
    let df = doc_freq as f64;
    (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
}

pub fn bm25(tf: u32, doc_freq: usize, doc_len: usize, num_docs: usize, avg_doc_len: f64) -> f64 {
    let tf = tf as f64;
    let len_ratio = if avg_doc_len > 0.0 { doc_len as f64 / avg_doc_len } else { 1.0 };
    let norm = tf + K1 * (1.0 - B + B * len_ratio);
    bm25_idf(num_docs, doc_freq) * (tf * (K1 + 1.0)) / norm
}

pub fn tf_idf(tf: u32, doc_freq: usize, num_docs: usize) -> f64 {
    if tf == 0 {
        return 0.0;
    }
    let df = doc_freq.max(1) as f64;
    let idf = (num_docs.max(1) as f64 / df).ln();
    (1.0 + (tf as f64).ln()) * idf
}

/// Result of scanning two posting lists side by side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairScan {
    pub count: usize,
    /// Byte offset of the earlier occurrence in the first matching pair.
    pub first_offset: Option<usize>,
}

/// Count places where `second` immediately follows `first`.
pub fn phrase_scan(first: &Posting, second: &Posting) -> PairScan {
    let (a, b) = (&first.positions, &second.positions);
    let mut scan = PairScan::default();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let target = a[i] + 1;
        if b[j] == target {
            scan.count += 1;
            scan.first_offset.get_or_insert(first.offsets[i]);
            i += 1;
            j += 1;
        } else if b[j] < target {
            j += 1;
        } else {
            i += 1;
        }
    }
    scan
}

/// Count pairs of occurrences at most [`PROXIMITY_WINDOW`] tokens apart, in
/// either order. Each occurrence takes part in at most one pair.
pub fn proximity_scan(first: &Posting, second: &Posting) -> PairScan {
    let (a, b) = (&first.positions, &second.positions);
    let mut scan = PairScan::default();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let gap = a[i].abs_diff(b[j]);
        if gap >= 1 && gap - 1 <= PROXIMITY_WINDOW {
            scan.count += 1;
            let offset = if a[i] < b[j] { first.offsets[i] } else { second.offsets[j] };
            scan.first_offset.get_or_insert(offset);
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
    }
    scan
}
