use crate::index::InvertedIndex;

/// Levenshtein distance over Unicode scalar values.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Closest vocabulary term to `term`.
///
/// Known terms come back unchanged. Otherwise every vocabulary term is
/// compared; ties on distance go to the term found in more documents, then to
/// the lexicographically smaller term. With an empty vocabulary the input is
/// returned as is.
pub fn correct(term: &str, index: &InvertedIndex) -> String {
    if index.contains(term) {
        return term.to_string();
    }
    let mut best: Option<(usize, usize, &str)> = None;
    for candidate in index.terms() {
        let distance = edit_distance(term, candidate);
        let df = index.doc_freq(candidate);
        let better = match best {
            None => true,
            Some((d, f, t)) => (distance, std::cmp::Reverse(df), candidate) < (d, std::cmp::Reverse(f), t),
        };
        if better {
            best = Some((distance, df, candidate));
        }
    }
    best.map_or_else(|| term.to_string(), |(_, _, t)| t.to_string())
}
