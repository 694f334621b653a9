//! Directory-backed cache store

use async_trait::async_trait;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::metadata::CacheEntryMetadata;
use crate::errors::{IconError, IconResult};
use crate::models::VersionKey;

/// Subdirectory of the cache root holding icon entries
pub const ICONS_DIR: &str = "icons";

/// Subdirectory of `icons/` where entries are assembled before publishing
pub const STAGING_DIR: &str = ".staging";

/// Staging directories untouched for this long belong to runs that died
pub const STALE_STAGING_AGE: Duration = Duration::from_secs(60 * 60);

/// Key of a cache entry in one of the two key spaces
///
/// Content hashes are lowercase hex and versions are `x.y.z` or `dev`, so
/// the two spaces can share a directory without colliding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    ContentHash(String),
    Version(VersionKey),
}

impl CacheKey {
    pub fn content_hash<S: Into<String>>(hash: S) -> Self {
        Self::ContentHash(hash.into())
    }

    pub fn version(version: &VersionKey) -> Self {
        Self::Version(version.clone())
    }

    /// Directory name of the entry under `icons/`
    pub fn dir_name(&self) -> &str {
        match self {
            Self::ContentHash(hash) => hash,
            Self::Version(version) => version.as_str(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Storage contract for rendered variant sets
///
/// Writers only ever publish complete entries; an entry that `exists` is
/// never modified afterwards except by `invalidate`.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Whether a complete entry is published under `key`
    async fn exists(&self, key: &CacheKey) -> bool;

    /// Location of the published entry for `key`
    fn entry_path(&self, key: &CacheKey) -> PathBuf;

    /// Create an empty private directory to assemble an entry for `key`
    async fn begin_entry(&self, key: &CacheKey) -> IconResult<PathBuf>;

    /// Publish a staged directory under `key`
    ///
    /// If `key` is already published the staged copy is discarded and the
    /// existing entry is left untouched.
    async fn commit_entry(&self, key: &CacheKey, staging: &Path) -> IconResult<()>;

    /// Remove a staged directory that will not be committed
    async fn discard_entry(&self, staging: &Path);

    /// Copy the hash-keyed entry to the version-keyed location
    async fn promote(&self, content_hash: &str, version: &VersionKey) -> IconResult<()>;

    /// Remove a version-keyed entry if present
    async fn invalidate(&self, version: &VersionKey) -> IconResult<()>;

    /// Metadata of a published entry, if it has any
    async fn metadata(&self, key: &CacheKey) -> Option<CacheEntryMetadata>;
}

/// `CacheStore` on the local filesystem under `<cache_root>/icons`
#[derive(Debug, Clone)]
pub struct FsCacheStore {
    icons_root: PathBuf,
}

impl FsCacheStore {
    pub fn new(cache_root: impl AsRef<Path>) -> Self {
        Self {
            icons_root: cache_root.as_ref().join(ICONS_DIR),
        }
    }

    pub fn icons_root(&self) -> &Path {
        &self.icons_root
    }

    fn staging_root(&self) -> PathBuf {
        self.icons_root.join(STAGING_DIR)
    }

    async fn is_dir(path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false)
    }

    /// Remove staging directories left behind by killed runs
    ///
    /// Live runs keep touching their directory, so only entries older than
    /// [`STALE_STAGING_AGE`] are removed.
    async fn sweep_stale_staging(&self, staging_root: &Path) {
        let Ok(mut entries) = fs::read_dir(staging_root).await else {
            return;
        };
        let now = SystemTime::now();

        while let Ok(Some(entry)) = entries.next_entry().await {
            let Ok(modified) = entry.metadata().await.and_then(|m| m.modified()) else {
                continue;
            };
            if now.duration_since(modified).unwrap_or_default() >= STALE_STAGING_AGE {
                warn!("Removing abandoned staging directory {}", entry.path().display());
                self.discard_entry(&entry.path()).await;
            }
        }
    }

    /// Copy a directory tree into an existing empty directory
    async fn copy_tree(from: &Path, to: &Path) -> std::io::Result<u64> {
        let mut copied_bytes = 0;
        let mut pending = vec![(from.to_path_buf(), to.to_path_buf())];

        while let Some((source_dir, target_dir)) = pending.pop() {
            let mut entries = fs::read_dir(&source_dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let target = target_dir.join(entry.file_name());
                if entry.file_type().await?.is_dir() {
                    fs::create_dir(&target).await?;
                    pending.push((entry.path(), target));
                } else {
                    copied_bytes += fs::copy(entry.path(), &target).await?;
                }
            }
        }

        Ok(copied_bytes)
    }
}

#[async_trait]
impl CacheStore for FsCacheStore {
    async fn exists(&self, key: &CacheKey) -> bool {
        Self::is_dir(&self.entry_path(key)).await
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.icons_root.join(key.dir_name())
    }

    async fn begin_entry(&self, key: &CacheKey) -> IconResult<PathBuf> {
        let staging_root = self.staging_root();
        fs::create_dir_all(&staging_root)
            .await
            .map_err(|e| IconError::cache_write(&staging_root, e.to_string()))?;
        self.sweep_stale_staging(&staging_root).await;

        let staging = staging_root.join(format!("{}-{}", key, Uuid::new_v4().simple()));
        fs::create_dir(&staging)
            .await
            .map_err(|e| IconError::cache_write(&staging, e.to_string()))?;

        debug!("Staging cache entry {} in {}", key, staging.display());
        Ok(staging)
    }

    async fn commit_entry(&self, key: &CacheKey, staging: &Path) -> IconResult<()> {
        let target = self.entry_path(key);

        if Self::is_dir(&target).await {
            debug!("Cache entry {} already published, discarding staged copy", key);
            self.discard_entry(staging).await;
            return Ok(());
        }

        if let Err(e) = fs::rename(staging, &target).await {
            self.discard_entry(staging).await;
            // Lost a race against another writer for the same key.
            if Self::is_dir(&target).await {
                return Ok(());
            }
            return Err(IconError::cache_write(&target, e.to_string()));
        }

        debug!("Published cache entry {}", key);
        Ok(())
    }

    async fn discard_entry(&self, staging: &Path) {
        if let Err(e) = fs::remove_dir_all(staging).await
            && e.kind() != ErrorKind::NotFound
        {
            warn!("Failed to remove staging directory {}: {}", staging.display(), e);
        }
    }

    async fn promote(&self, content_hash: &str, version: &VersionKey) -> IconResult<()> {
        let hash_key = CacheKey::content_hash(content_hash);
        let version_key = CacheKey::version(version);
        let source = self.entry_path(&hash_key);

        if !Self::is_dir(&source).await {
            return Err(IconError::cache_write(
                &source,
                format!("no cache entry for content hash {content_hash}"),
            ));
        }
        if self.exists(&version_key).await {
            debug!("Version {} already cached, nothing to promote", version);
            return Ok(());
        }

        let staging = self.begin_entry(&version_key).await?;
        let copied_bytes = match Self::copy_tree(&source, &staging).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.discard_entry(&staging).await;
                return Err(IconError::cache_write(&self.entry_path(&version_key), e.to_string()));
            }
        };
        self.commit_entry(&version_key, &staging).await?;

        info!(
            "Cached icons for version {} from {} ({} bytes)",
            version, content_hash, copied_bytes
        );
        Ok(())
    }

    async fn invalidate(&self, version: &VersionKey) -> IconResult<()> {
        let path = self.entry_path(&CacheKey::version(version));
        match fs::remove_dir_all(&path).await {
            Ok(()) => {
                info!("Removed cached icons for version {}", version);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(IconError::cache_write(&path, e.to_string())),
        }
    }

    async fn metadata(&self, key: &CacheKey) -> Option<CacheEntryMetadata> {
        CacheEntryMetadata::read_from(&self.entry_path(key)).await
    }
}
