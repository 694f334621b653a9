//! Release version identifiers used as secondary cache keys

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::errors::IconError;

/// Literal pseudo-version for the working copy
pub const DEV_VERSION: &str = "dev";

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]+\.[0-9]+\.[0-9]+|dev)$").expect("version pattern is a valid regex")
});

/// A validated `x.y.z` release identifier or the literal `dev`
///
/// The string is kept exactly as given (including leading zeros) because it
/// names the version-keyed cache directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionKey(String);

impl VersionKey {
    /// Validate a raw `--version` value
    pub fn parse(raw: &str) -> Result<Self, IconError> {
        if VERSION_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(IconError::invalid_argument(format!(
                "Given argument --version must be \"x.y.z\" or \"dev\" (got \"{raw}\")"
            )))
        }
    }

    /// The `dev` pseudo-version, which is never served from a stale cache
    pub fn dev() -> Self {
        Self(DEV_VERSION.to_string())
    }

    pub fn is_dev(&self) -> bool {
        self.0 == DEV_VERSION
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Snapshot name used by the build-artifact lookup
    pub fn snapshot_name(&self) -> String {
        format!("build-{}", self.0)
    }
}

impl FromStr for VersionKey {
    type Err = IconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
