use anyhow::{Context, Result};
use std::path::Path;

/// Supplies the text of path-registered documents at build time.
///
/// An error means the document is skipped for this build; it is never fatal.
pub trait ContentSource: Send + Sync {
    fn read(&self, path: &Path) -> Result<String>;
}

/// Reads documents from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsContentSource;

impl ContentSource for FsContentSource {
    fn read(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}
