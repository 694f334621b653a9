//! Content-addressed and version-keyed icon cache
//!
//! Entries live under `<cache_root>/icons/` in two sibling key spaces:
//! `<content_hash>/` holds the rendered variant set for one source image and
//! `<version>/` is a verbatim copy of exactly one hash entry. Entries are
//! assembled in `.staging/` and renamed into place, so an entry that exists
//! is always complete.

pub mod metadata;
pub mod store;

pub use metadata::CacheEntryMetadata;
pub use store::{CacheKey, CacheStore, FsCacheStore, ICONS_DIR, STAGING_DIR};
