use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    is_end: bool,
}

/// Prefix tree over the vocabulary.
#[derive(Debug, Clone, Default)]
pub struct Trie {
    root: TrieNode,
    words: usize,
}

impl Trie {
    pub fn new() -> Self { Self::default() }

    /// Insert `word`. Inserting the same word again is a no-op.
    pub fn insert(&mut self, word: &str) {
        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.children.entry(c).or_default();
        }
        if !node.is_end {
            node.is_end = true;
            self.words += 1;
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.find(word).is_some_and(|n| n.is_end)
    }

    /// Every stored word starting with `prefix`. An empty prefix yields the
    /// whole vocabulary.
    pub fn autocomplete(&self, prefix: &str) -> Vec<String> {
        let mut results = Vec::new();
        if let Some(node) = self.find(prefix) {
            let mut current = prefix.to_string();
            collect(node, &mut current, &mut results);
        }
        results
    }

    pub fn len(&self) -> usize { self.words }

    pub fn is_empty(&self) -> bool { self.words == 0 }

    fn find(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in prefix.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }
}

fn collect(node: &TrieNode, current: &mut String, results: &mut Vec<String>) {
    if node.is_end {
        results.push(current.clone());
    }
    for (&c, child) in &node.children {
        current.push(c);
        collect(child, current, results);
        current.pop();
    }
}

impl<'a> FromIterator<&'a str> for Trie {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut trie = Trie::new();
        for word in iter {
            trie.insert(word);
        }
        trie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autocomplete_finds_all_completions() {
        let trie: Trie = ["cat", "car", "cart", "dog"].into_iter().collect();
        let mut got = trie.autocomplete("ca");
        got.sort();
        assert_eq!(got, vec!["car", "cart", "cat"]);
        assert!(trie.autocomplete("x").is_empty());
        assert_eq!(trie.autocomplete("dog"), vec!["dog"]);
    }

    #[test]
    fn insert_is_idempotent() {
        let mut trie = Trie::new();
        trie.insert("cat");
        trie.insert("cat");
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.autocomplete("c"), vec!["cat"]);
    }

    #[test]
    fn every_prefix_reaches_word_once() {
        let words = ["search", "sea", "seal", "c++", "naïve"];
        let trie: Trie = words.into_iter().collect();
        for w in words {
            for (i, _) in w.char_indices().chain([(w.len(), ' ')]) {
                let hits = trie.autocomplete(&w[..i]);
                assert_eq!(hits.iter().filter(|h| h.as_str() == w).count(), 1, "prefix {:?}", &w[..i]);
            }
        }
    }

    #[test]
    fn empty_prefix_lists_vocabulary() {
        let trie: Trie = ["b", "a"].into_iter().collect();
        assert_eq!(trie.autocomplete(""), vec!["a", "b"]);
        assert!(Trie::new().autocomplete("").is_empty());
        assert!(trie.contains("a"));
        assert!(!trie.contains(""));
    }
}
