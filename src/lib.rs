pub mod cache;
pub mod config;
pub mod errors;
pub mod icons;
pub mod models;
pub mod pipeline;
pub mod source;
