use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

pub mod defaults;

use crate::icons::{BackgroundColor, ResizeFilter};
use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub icons: IconConfig,
    #[serde(default)]
    pub snapshots: SnapshotConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root of the cache; icon entries live under `<cache_path>/icons`
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
    /// Working copy; `dev` runs prefer `<app_path>/icon.png`
    #[serde(default = "default_app_path")]
    pub app_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconConfig {
    /// Canvas color for filled variants (`#rgb` or `#rrggbb`)
    #[serde(default = "default_background_color")]
    pub background_color: BackgroundColor,
    #[serde(default)]
    pub resize_filter: ResizeFilter,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Snapshot root, defaults to `<cache_path>/snapshots`
    pub path: Option<PathBuf>,
    /// Program and arguments run before a snapshot lookup
    pub command: Option<Vec<String>>,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_PATH)
}

fn default_app_path() -> PathBuf {
    PathBuf::from(DEFAULT_APP_PATH)
}

fn default_background_color() -> BackgroundColor {
    DEFAULT_BACKGROUND_COLOR
        .parse()
        .unwrap_or(BackgroundColor::WHITE)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
            app_path: default_app_path(),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
            resize_filter: ResizeFilter::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)
                .with_context(|| format!("Failed to read config file {config_file}"))?;
            Self::from_toml(&contents).with_context(|| format!("Invalid config file {config_file}"))
        } else {
            info!("Config file {} not found, using defaults", config_file);
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Snapshot root, falling back to `<cache_path>/snapshots`
    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshots
            .path
            .clone()
            .unwrap_or_else(|| self.storage.cache_path.join(DEFAULT_SNAPSHOTS_SUBDIR))
    }
}
