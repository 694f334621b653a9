pub mod version;

pub use version::VersionKey;
