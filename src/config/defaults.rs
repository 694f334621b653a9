/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
pub const DEFAULT_CONFIG_FILE: &str = "icon-cache.toml";

// Storage defaults
pub const DEFAULT_CACHE_PATH: &str = "./cache";
pub const DEFAULT_APP_PATH: &str = "./app";

// Snapshot defaults (relative to the cache path)
pub const DEFAULT_SNAPSHOTS_SUBDIR: &str = "snapshots";

// Icon rendering defaults
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

// Logging defaults
pub const DEFAULT_LOG_LEVEL: &str = "info";
