use crate::builder::IndexSnapshot;
use crate::config::ScoringModel;
use crate::index::Posting;
use crate::scoring::{self, PairScan};
use crate::spell::correct;
use crate::tokenizer::{normalize, terms};
use crate::DocId;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

/// Bytes of context kept before and after the snippet anchor.
pub const SNIPPET_BEFORE: usize = 60;
pub const SNIPPET_AFTER: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub doc_id: DocId,
    pub document: String,
    /// Occurrences of the first query term.
    pub frequency: u32,
    pub positions: Vec<usize>,
    pub offsets: Vec<usize>,
    pub score: f64,
    pub snippet: String,
    /// Corrected term when spelling correction kicked in, otherwise empty.
    pub suggestion: String,
}

/// Run `query` against `snapshot`: AND semantics over corrected terms, ranked
/// by score descending.
pub fn search(snapshot: &IndexSnapshot, query: &str, model: ScoringModel) -> Vec<SearchResult> {
    let mut query_terms = terms(query);
    if query_terms.is_empty() {
        return Vec::new();
    }

    let mut suggestion = String::new();
    for term in query_terms.iter_mut() {
        if snapshot.index.contains(term) {
            continue;
        }
        let corrected = correct(term, &snapshot.index);
        if corrected != *term {
            debug!(from = %term, to = %corrected, "corrected query term");
            suggestion.clone_from(&corrected);
            *term = corrected;
        }
    }

    let mut lists = Vec::with_capacity(query_terms.len());
    for term in &query_terms {
        match snapshot.index.postings(term) {
            Some(docs) => lists.push(docs),
            None => return Vec::new(),
        }
    }

    let mut results: Vec<SearchResult> = lists[0]
        .keys()
        .copied()
        .filter(|doc_id| lists[1..].iter().all(|docs| docs.contains_key(doc_id)))
        .map(|doc_id| {
            let hits: Vec<&Posting> = lists.iter().map(|docs| &docs[&doc_id]).collect();
            rank(snapshot, &query_terms, doc_id, &hits, model, &suggestion)
        })
        .collect();

    results.sort_by(|a, b| {
        b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal).then(a.doc_id.cmp(&b.doc_id))
    });
    results
}

fn rank(
    snapshot: &IndexSnapshot,
    query_terms: &[String],
    doc_id: DocId,
    hits: &[&Posting],
    model: ScoringModel,
    suggestion: &str,
) -> SearchResult {
    let stats = &snapshot.stats;
    let doc_len = stats.doc_length(doc_id);
    let mut score: f64 = query_terms
        .iter()
        .zip(hits)
        .map(|(term, posting)| {
            let df = snapshot.index.doc_freq(term);
            match model {
                ScoringModel::Bm25 => scoring::bm25(posting.frequency, df, doc_len, stats.num_docs, stats.avg_doc_length),
                ScoringModel::TfIdf => scoring::tf_idf(posting.frequency, df, stats.num_docs),
            }
        })
        .sum();

    let first = hits[0];
    let mut anchor = first.offsets.first().copied().unwrap_or(0);
    if let [a, b, ..] = hits {
        let phrase = scoring::phrase_scan(a, b);
        let near = scoring::proximity_scan(a, b);
        score += scoring::PHRASE_WEIGHT * phrase.count as f64 + scoring::PROXIMITY_WEIGHT * near.count as f64;
        if let PairScan { first_offset: Some(offset), .. } = if phrase.count > 0 { phrase } else { near } {
            anchor = offset;
        }
    }

    SearchResult {
        doc_id,
        document: snapshot.name(doc_id).to_string(),
        frequency: first.frequency,
        positions: first.positions.clone(),
        offsets: first.offsets.clone(),
        score,
        snippet: snapshot.content(doc_id).map(|c| snippet(c, anchor)).unwrap_or_default(),
        suggestion: suggestion.to_string(),
    }
}

/// Text around byte `offset`, widened outwards to character boundaries.
pub fn snippet(content: &str, offset: usize) -> String {
    let mut start = offset.saturating_sub(SNIPPET_BEFORE).min(content.len());
    let mut end = offset.saturating_add(SNIPPET_AFTER).min(content.len());
    while !content.is_char_boundary(start) {
        start -= 1;
    }
    while !content.is_char_boundary(end) {
        end += 1;
    }
    content[start..end].to_string()
}

/// Vocabulary terms beginning with the normalized `prefix`.
pub fn autocomplete(snapshot: &IndexSnapshot, prefix: &str) -> Vec<String> {
    snapshot.trie.autocomplete(&normalize(prefix))
}
