//! Source icon resolution and decoding
//!
//! The source image for a release comes from a build snapshot; the `dev`
//! pseudo-version may use the working copy instead. Once decoded, the image
//! is identified by a digest of its pixels so identical artwork always maps
//! to the same cache entry.

pub mod loader;
pub mod snapshot;

pub use loader::SourceImage;
pub use snapshot::{SnapshotDirectoryResolver, SnapshotResolver};

/// File name of the source icon inside an app directory
pub const ICON_FILENAME: &str = "icon.png";
