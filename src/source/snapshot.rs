//! Lookup of a release's source icon in the build snapshot cache

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

use super::ICON_FILENAME;
use crate::errors::{IconError, IconResult};
use crate::models::VersionKey;

/// Resolves the absolute path of the source icon belonging to a version
#[async_trait]
pub trait SnapshotResolver: Send + Sync {
    async fn resolve_icon(&self, version: &VersionKey) -> IconResult<PathBuf>;
}

/// Snapshot lookup in `<root>/build-<version>/app/icon.png`
///
/// An optional command is run first to materialize the snapshot. It receives
/// `--name build-<version>` as its final arguments.
#[derive(Debug, Clone)]
pub struct SnapshotDirectoryResolver {
    snapshot_root: PathBuf,
    command: Option<Vec<String>>,
}

impl SnapshotDirectoryResolver {
    pub fn new(snapshot_root: PathBuf) -> Self {
        Self {
            snapshot_root,
            command: None,
        }
    }

    /// Run `program args... --name build-<version>` before each lookup
    pub fn with_command(mut self, command: Vec<String>) -> Self {
        self.command = if command.is_empty() { None } else { Some(command) };
        self
    }

    /// Where the icon of a version's snapshot is expected
    pub fn icon_path(&self, version: &VersionKey) -> PathBuf {
        self.snapshot_root
            .join(version.snapshot_name())
            .join("app")
            .join(ICON_FILENAME)
    }

    async fn ensure_snapshot(&self, version: &VersionKey) -> IconResult<()> {
        let Some((program, args)) = self.command.as_ref().and_then(|c| c.split_first()) else {
            return Ok(());
        };

        info!("Ensuring snapshot {} via {}", version.snapshot_name(), program);
        let status = Command::new(program)
            .args(args)
            .arg("--name")
            .arg(version.snapshot_name())
            .status()
            .await
            .map_err(|e| {
                IconError::source_not_found(
                    version.as_str(),
                    format!("failed to run snapshot command '{program}': {e}"),
                )
            })?;

        if !status.success() {
            return Err(IconError::source_not_found(
                version.as_str(),
                format!("snapshot command '{program}' exited with {status}"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotResolver for SnapshotDirectoryResolver {
    async fn resolve_icon(&self, version: &VersionKey) -> IconResult<PathBuf> {
        self.ensure_snapshot(version).await?;

        let icon_path = self.icon_path(version);
        match fs::metadata(&icon_path).await {
            Ok(metadata) if metadata.is_file() => {
                debug!("Resolved snapshot icon: {}", icon_path.display());
                Ok(icon_path)
            }
            _ => Err(IconError::source_not_found(
                version.as_str(),
                format!("no snapshot icon at {}", icon_path.display()),
            )),
        }
    }
}
