use crate::builder::{self, IndexSnapshot};
use crate::config::EngineConfig;
use crate::query::{self, SearchResult};
use crate::sample;
use crate::source::{ContentSource, FsContentSource};
use crate::DocId;
use parking_lot::{Mutex, RwLock};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Where a document's text comes from.
#[derive(Debug, Clone)]
pub enum DocumentOrigin {
    /// Read through the [`ContentSource`] on every build.
    Path(PathBuf),
    Inline(Arc<str>),
}

#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocId,
    pub name: String,
    pub origin: DocumentOrigin,
}

impl Document {
    pub fn path<P: Into<PathBuf>>(id: DocId, path: P) -> Self {
        let path = path.into();
        Self { id, name: path.display().to_string(), origin: DocumentOrigin::Path(path) }
    }

    pub fn inline<N: Into<String>, C: Into<Arc<str>>>(id: DocId, name: N, content: C) -> Self {
        Self { id, name: name.into(), origin: DocumentOrigin::Inline(content.into()) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Empty,
    Building,
    Ready,
}

#[derive(Default)]
struct Corpus {
    documents: Vec<Document>,
    using_sample: bool,
}

impl Corpus {
    fn next_id(&self) -> DocId {
        self.documents.len() as DocId
    }

    fn reset(&mut self) {
        self.documents.clear();
        self.using_sample = false;
    }

    /// User documents never share the corpus with the sample set.
    fn drop_sample(&mut self) {
        if self.using_sample {
            info!("replacing sample corpus with user documents");
            self.reset();
        }
    }
}

/// Owns the document set and publishes index snapshots.
///
/// Mutations (registering documents, building, clearing) are serialized on
/// an internal lock. Queries never wait for a build: they run against the
/// last published snapshot.
pub struct SearchEngine {
    config: EngineConfig,
    source: Arc<dyn ContentSource>,
    corpus: Mutex<Corpus>,
    snapshot: RwLock<Arc<IndexSnapshot>>,
    state: RwLock<IndexState>,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SearchEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_source(config, Arc::new(FsContentSource))
    }

    pub fn with_source(config: EngineConfig, source: Arc<dyn ContentSource>) -> Self {
        Self {
            config,
            source,
            corpus: Mutex::new(Corpus::default()),
            snapshot: RwLock::new(Arc::new(IndexSnapshot::default())),
            state: RwLock::new(IndexState::Empty),
        }
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    /// Register a file without indexing it. Call [`build_index`](Self::build_index) afterwards.
    /// A loaded sample corpus is dropped first, as with uploaded content.
    pub fn add_document<P: Into<PathBuf>>(&self, path: P) -> DocId {
        let mut corpus = self.corpus.lock();
        corpus.drop_sample();
        let id = corpus.next_id();
        corpus.documents.push(Document::path(id, path));
        id
    }

    /// Register in-memory content and rebuild. A loaded sample corpus is
    /// dropped first, so user content replaces it.
    pub fn add_document_content(&self, name: &str, content: &str) -> DocId {
        let mut corpus = self.corpus.lock();
        corpus.drop_sample();
        let id = corpus.next_id();
        corpus.documents.push(Document::inline(id, name, content));
        self.rebuild(&corpus);
        id
    }

    /// Full rebuild over every registered document.
    pub fn build_index(&self) {
        let corpus = self.corpus.lock();
        self.rebuild(&corpus);
    }

    pub fn clear_index(&self) {
        let mut corpus = self.corpus.lock();
        corpus.reset();
        *self.snapshot.write() = Arc::new(IndexSnapshot::default());
        *self.state.write() = IndexState::Empty;
        info!("index cleared");
    }

    /// Replace the corpus with the built-in demo documents. No-op when they
    /// are already loaded.
    pub fn load_sample_dataset(&self) {
        let mut corpus = self.corpus.lock();
        if corpus.using_sample {
            return;
        }
        corpus.reset();
        for (name, content) in sample::DOCUMENTS {
            let id = corpus.next_id();
            corpus.documents.push(Document::inline(id, *name, *content));
        }
        corpus.using_sample = true;
        self.rebuild(&corpus);
    }

    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        query::search(&self.snapshot(), query, self.config.scoring)
    }

    pub fn autocomplete(&self, prefix: &str) -> Vec<String> {
        query::autocomplete(&self.snapshot(), prefix)
    }

    /// The most recently published index.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        Arc::clone(&self.snapshot.read())
    }

    pub fn state(&self) -> IndexState { *self.state.read() }

    /// Registered documents, indexed or not.
    pub fn document_count(&self) -> usize { self.corpus.lock().documents.len() }

    pub fn is_sample_loaded(&self) -> bool { self.corpus.lock().using_sample }

    fn rebuild(&self, corpus: &Corpus) {
        *self.state.write() = IndexState::Building;
        let snapshot = builder::build(&corpus.documents, self.config.workers(), self.source.as_ref());
        *self.snapshot.write() = Arc::new(snapshot);
        let state = if corpus.documents.is_empty() { IndexState::Empty } else { IndexState::Ready };
        *self.state.write() = state;
    }
}
