use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Base relevance function applied to each query term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringModel {
    #[default]
    Bm25,
    /// Log-scaled term frequency times `ln(N / df)`.
    TfIdf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Index build threads. `None` uses the platform's parallelism hint.
    pub workers: Option<usize>,
    pub scoring: ScoringModel,
}

impl EngineConfig {
    /// Load from a JSON file, e.g. `{"workers": 8, "scoring": "tfidf"}`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let mut buf = String::new();
        f.read_to_string(&mut buf)?;
        let config = serde_json::from_str(&buf).with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn workers(&self) -> usize {
        self.workers.filter(|&w| w > 0).unwrap_or_else(crate::builder::default_workers)
    }
}
