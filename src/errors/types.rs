//! Error type definitions for the icon generation pipeline

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error type for icon generation
///
/// Each variant corresponds to one class of fatal failure. Callers only ever
/// see the rendered message; there is no recovery path.
#[derive(Error, Debug)]
pub enum IconError {
    /// Malformed `--version` argument
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// No source icon could be resolved for the version
    #[error("Icon file not found for version \"{version}\": {message}")]
    SourceNotFound { version: String, message: String },

    /// Source bytes could not be read or are not a valid image
    #[error("Failed to read icon file \"{path}\": {message}")]
    Decode { path: PathBuf, message: String },

    /// Resize, composite or write failure for one variant
    #[error("Failed to render icon \"{variant}\": {message}")]
    Render { variant: String, message: String },

    /// Missing favicon input or container write failure
    #[error("Failed to create favicon.ico: {message}")]
    Pack { message: String },

    /// Cache directory creation, copy or rename failure
    #[error("Failed to cache icons at \"{path}\": {message}")]
    CacheWrite { path: PathBuf, message: String },

    /// Malformed configuration value
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Convenience methods for creating common error types
impl IconError {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a source not found error for a version
    pub fn source_not_found<V: Into<String>, M: Into<String>>(version: V, message: M) -> Self {
        Self::SourceNotFound {
            version: version.into(),
            message: message.into(),
        }
    }

    /// Create a decode error for a source file
    pub fn decode<M: Into<String>>(path: &Path, message: M) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a render error for a specific variant
    pub fn render<V: Into<String>, M: Into<String>>(variant: V, message: M) -> Self {
        Self::Render {
            variant: variant.into(),
            message: message.into(),
        }
    }

    /// Create a pack error
    pub fn pack<M: Into<String>>(message: M) -> Self {
        Self::Pack {
            message: message.into(),
        }
    }

    /// Create a cache write error
    pub fn cache_write<M: Into<String>>(path: &Path, message: M) -> Self {
        Self::CacheWrite {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<M: Into<String>>(message: M) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Short machine-friendly name of the error class
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::SourceNotFound { .. } => "source_not_found",
            Self::Decode { .. } => "decode_error",
            Self::Render { .. } => "render_error",
            Self::Pack { .. } => "pack_error",
            Self::CacheWrite { .. } => "cache_write_error",
            Self::Configuration { .. } => "configuration_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failing_item() {
        let err = IconError::render("favicon-16x16.png", "disk full");
        assert_eq!(
            err.to_string(),
            "Failed to render icon \"favicon-16x16.png\": disk full"
        );

        let err = IconError::source_not_found("1.2.3", "no snapshot");
        assert!(err.to_string().contains("\"1.2.3\""));
        assert_eq!(err.kind(), "source_not_found");
    }
}
