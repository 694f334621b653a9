//! Icon and launch-screen variant generation
//!
//! - **catalog**: declarative list of variant templates and its landscape expansion
//! - **geometry**: per-variant canvas/content/offset planning
//! - **renderer**: transparent and filled compositing to PNG
//! - **packer**: multi-resolution `favicon.ico` assembly

pub mod catalog;
pub mod geometry;
pub mod packer;
pub mod renderer;

pub use catalog::{VariantTemplate, expand, expand_from};
pub use geometry::{RenderPlan, plan};
pub use packer::{FAVICON_SIZES, ICO_FILENAME, IconPacker};
pub use renderer::{BackgroundColor, ResizeFilter, VariantRenderer};
