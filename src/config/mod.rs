//! Configuration module for the fanbox-archiver.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - CLI argument merging (see `cli`)
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{Config, OptionsConfig, SessionConfig};
pub use validation::{parse_creator_id, validate_config};
