//! Filesystem module.
//!
//! Provides:
//! - Deterministic archive filenames
//! - The creator-scoped archive store

pub mod naming;
pub mod store;

pub use naming::{sanitize_title, validate_component};
pub use store::ArchiveStore;
