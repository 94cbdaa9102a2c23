//! Download module for creator archiving.
//!
//! This module provides:
//! - Sync run state tracking
//! - The incremental creator sync
//! - Asset fetching with an explicit retry policy

pub mod fetcher;
pub mod state;
pub mod sync;

pub use fetcher::{AssetFetcher, HttpTransport, RetryPolicy, Transport};
pub use state::SyncState;
pub use sync::sync_creator;
