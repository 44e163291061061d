use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\S+").expect("valid regex");
}

/// Punctuation kept inside a word, e.g. `c++`, `node.js`, `key:value`.
const INNER_PUNCT: &[char] = &['+', '#', '.', '-', '_', ':'];

fn is_inner_punct(c: char) -> bool {
    INNER_PUNCT.contains(&c)
}

/// A normalized term together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    /// Index among emitted tokens, starting at 0.
    pub position: usize,
    /// Byte offset of the source word in the original text.
    pub offset: usize,
}

/// Normalize a single whitespace-delimited word.
///
/// Alphanumerics are lowercased, inner punctuation survives only after the
/// first alphanumeric, everything else is dropped. Trailing punctuation is
/// stripped. Returns an empty string when nothing searchable is left.
pub fn normalize(word: &str) -> String {
    let mut clean = String::with_capacity(word.len());
    let mut seen_alnum = false;
    for c in word.chars() {
        if c.is_alphanumeric() {
            clean.extend(c.to_lowercase());
            seen_alnum = true;
        } else if seen_alnum && is_inner_punct(c) {
            clean.push(c);
        }
    }
    let trimmed = clean.trim_end_matches(is_inner_punct);
    if trimmed.starts_with(is_inner_punct) {
        return String::new();
    }
    let keep = trimmed.len();
    clean.truncate(keep);
    clean
}

/// Lazy token stream over `text`. Cheap to clone; a clone resumes from the
/// same point.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    cursor: usize,
    position: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while let Some(word) = WORD.find_at(self.text, self.cursor) {
            self.cursor = word.end();
            let term = normalize(word.as_str());
            if term.is_empty() {
                continue;
            }
            let token = Token { term, position: self.position, offset: word.start() };
            self.position += 1;
            return Some(token);
        }
        self.cursor = self.text.len();
        None
    }
}

/// Tokenize text into normalized terms with positions and byte offsets.
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { text, cursor: 0, position: 0 }
}

/// Normalized terms only, in order. Used for queries.
pub fn terms(text: &str) -> Vec<String> {
    tokenize(text).map(|t| t.term).collect()
}
