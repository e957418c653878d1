// probity-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod compiler;
pub mod config;
pub mod error;
pub mod fs;
pub mod logs;
pub mod store;

pub use logs::LogArtifact;
pub use store::ResultStore;
