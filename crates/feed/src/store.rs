use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::FeedError;

/// Plain-text list of candidate URLs, one per line
///
/// Overwritten in full by feed ingestion each run and read back unmodified
/// by the orchestrator.
#[derive(Debug, Clone)]
pub struct CandidateStore {
    path: PathBuf,
}

impl CandidateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the store contents; no trailing newline after the last id
    pub async fn write(&self, ids: &[String]) -> Result<(), FeedError> {
        tokio::fs::write(&self.path, ids.join("\n")).await?;
        debug!(path = %self.path.display(), count = ids.len(), "Candidate store written");
        Ok(())
    }

    /// Non-blank lines in file order. A missing or unreadable file reads as empty.
    pub async fn read(&self) -> Vec<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read candidate store");
                Vec::new()
            }
        }
    }
}
