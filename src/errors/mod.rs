//! Centralized error handling for icon generation
//!
//! Every failure in the pipeline is fatal: there is no retry and no partial
//! output. The variants mirror the stages that can fail so the message shown
//! to the user names the failing variant, file or version.
//!
//! # Usage
//!
//! ```rust
//! use icon_cache::errors::{IconError, IconResult};
//!
//! fn example_function(version: &str) -> IconResult<()> {
//!     if version.is_empty() {
//!         return Err(IconError::invalid_argument("version must not be empty"));
//!     }
//!     Ok(())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using IconError
pub type IconResult<T> = Result<T, IconError>;
