//! Sync run state tracking.

use std::path::PathBuf;

/// Per-run statistics for one creator.
#[derive(Debug, Default)]
pub struct SyncState {
    pub creator_id: String,
    pub base_path: Option<PathBuf>,

    // Posts
    pub posts_listed: u64,
    pub details_requested: u64,
    pub posts_cached: u64,
    pub posts_missing: u64,
    pub posts_paywalled: u64,
    pub stale_metadata_removed: u64,

    // Outputs
    pub texts_written: u64,
    pub assets_downloaded: u64,
    pub assets_skipped: u64,
    pub covers_downloaded: u64,
    pub diagnostics: u64,
    pub asset_failures: u64,
}

impl SyncState {
    pub fn new(creator_id: impl Into<String>) -> Self {
        Self {
            creator_id: creator_id.into(),
            ..Default::default()
        }
    }

    /// Files written this run, excluding the listing snapshot.
    pub fn files_written(&self) -> u64 {
        self.texts_written + self.assets_downloaded + self.covers_downloaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_written() {
        let mut state = SyncState::new("someone");
        state.texts_written = 2;
        state.assets_downloaded = 5;
        state.covers_downloaded = 1;
        state.assets_skipped = 9;
        assert_eq!(state.creator_id, "someone");
        assert_eq!(state.files_written(), 8);
    }
}
