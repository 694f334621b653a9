//! Metadata stored alongside each cache entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::errors::{IconError, IconResult};

/// Describes how a hash-keyed entry was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntryMetadata {
    /// Digest of the decoded source pixels
    pub content_hash: String,
    pub source_width: u32,
    pub source_height: u32,
    /// Files written into the entry, including the packed container
    pub files: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl CacheEntryMetadata {
    /// Metadata file name in the entry directory
    pub const FILENAME: &'static str = "cache-entry.json";

    pub fn new(content_hash: &str, source_width: u32, source_height: u32, files: Vec<String>) -> Self {
        Self {
            content_hash: content_hash.to_string(),
            source_width,
            source_height,
            files,
            created_at: Utc::now(),
        }
    }

    pub async fn write_to(&self, entry_dir: &Path) -> IconResult<()> {
        let path = entry_dir.join(Self::FILENAME);
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| IconError::cache_write(&path, format!("failed to serialize metadata: {e}")))?;
        fs::write(&path, json)
            .await
            .map_err(|e| IconError::cache_write(&path, e.to_string()))
    }

    /// Read metadata from an entry; `None` when the entry has none
    pub async fn read_from(entry_dir: &Path) -> Option<Self> {
        let content = fs::read_to_string(entry_dir.join(Self::FILENAME)).await.ok()?;
        serde_json::from_str(&content).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_metadata_written_and_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let metadata = CacheEntryMetadata::new(
            "abc123",
            1024,
            768,
            vec!["favicon-16x16.png".to_string(), "favicon.ico".to_string()],
        );

        metadata.write_to(temp_dir.path()).await.unwrap();
        let loaded = CacheEntryMetadata::read_from(temp_dir.path()).await.unwrap();
        assert_eq!(loaded, metadata);
    }

    #[tokio::test]
    async fn test_missing_metadata_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        assert!(CacheEntryMetadata::read_from(temp_dir.path()).await.is_none());
    }
}
