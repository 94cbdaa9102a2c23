//! FANBOX Archiver - incremental mirroring of a FANBOX creator's posts
//!
//! This library archives a creator's posts, rendered text and attachments into
//! a local directory, reusing the session of a logged-in browser.
//!
//! # Features
//!
//! - Post listing and per-post metadata snapshots
//! - Plain-text rendering of text, block and legacy post bodies
//! - Image, file and cover image downloads
//! - Resumable runs: files already on disk are never fetched again
//! - Cleanup of metadata for posts that became paywalled
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use fanbox_archiver::{
//!     sync_creator, AssetFetcher, Config, CookieSession, FanboxApi, HttpTransport, SyncState,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let session = CookieSession::establish(&config, "somecreator").await?;
//!     let api = FanboxApi::new(session);
//!     let transport = HttpTransport::new(&config.session.user_agent)?;
//!     let fetcher = AssetFetcher::new(Arc::new(transport), config.retry_policy());
//!
//!     let mut state = SyncState::new("somecreator");
//!     sync_creator(&api, &fetcher, &config, &mut state).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;
pub mod post;

// Re-exports for convenience
pub use api::{CookieSession, FanboxApi, Session, SessionToken};
pub use config::Config;
pub use download::{sync_creator, AssetFetcher, HttpTransport, RetryPolicy, SyncState, Transport};
pub use error::{Error, Result};
pub use post::{AssetDescriptor, AssetKind};
