//! Built-in demo corpus.

pub const DOCUMENTS: &[(&str, &str)] = &[
    (
        "sample/rust.txt",
        "Rust is a systems programming language focused on safety, speed and concurrency. \
         The borrow checker enforces ownership rules at compile time, so data races are \
         rejected before the program ever runs. Cargo builds the code, runs the tests and \
         manages dependencies.",
    ),
    (
        "sample/search.txt",
        "A search engine builds an inverted index that maps every term to the documents \
         containing it. Ranking functions such as BM25 and TF-IDF score each matching \
         document, and phrase queries reward terms that appear next to each other.",
    ),
    (
        "sample/cpp.txt",
        "C++ gives the programmer direct control over memory. Templates enable generic \
         programming, and the standard library offers containers like std::vector and \
         std::unordered_map. Modern C++ favours smart pointers over raw pointers.",
    ),
    (
        "sample/trie.txt",
        "A trie is a tree of characters used for prefix lookups. Autocomplete walks the \
         trie along the typed prefix and then collects every word below that node. Tries \
         make suggestions fast even for a large vocabulary.",
    ),
    (
        "sample/concurrency.txt",
        "Concurrency lets a program make progress on several tasks at once. Worker threads \
         can index separate partitions of a document collection in parallel, and a final \
         merge step combines their local results into one global index.",
    ),
    (
        "sample/spelling.txt",
        "Spelling correction compares an unknown query word against the vocabulary using \
         edit distance. The Levenshtein distance counts the insertions, deletions and \
         substitutions needed to turn one word into another.",
    ),
];
