//! Creator-scoped archive store.
//!
//! Existence of a file is the cache: there is no in-memory index. Every write
//! lands in a `.part` sibling first and is renamed into place, so an
//! interrupted run never leaves a truncated file behind that a later run
//! would mistake for a finished one.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tokio::fs;

use crate::api::types::PostSummary;
use crate::config::Config;
use crate::error::Result;
use crate::fs::naming::{
    asset_filename, metadata_filename, text_filename, validate_component, LISTING_FILENAME,
    PARTIAL_SUFFIX,
};
use crate::post::AssetDescriptor;

/// On-disk archive of one creator.
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    root: PathBuf,
}

impl ArchiveStore {
    /// Store rooted at an explicit directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store for a creator under the configured archive directory.
    pub fn for_creator(config: &Config, creator_id: &str) -> Result<Self> {
        let creator = validate_component(creator_id)?;
        Ok(Self::new(config.download_directory().join(creator)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the creator directory if needed.
    pub async fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn listing_path(&self) -> PathBuf {
        self.root.join(LISTING_FILENAME)
    }

    pub fn metadata_path(&self, summary: &PostSummary) -> Result<PathBuf> {
        Ok(self.root.join(metadata_filename(summary)?))
    }

    pub fn text_path(&self, summary: &PostSummary) -> Result<PathBuf> {
        Ok(self.root.join(text_filename(summary)?))
    }

    pub fn asset_path(&self, asset: &AssetDescriptor) -> Result<PathBuf> {
        Ok(self.root.join(asset_filename(asset)?))
    }

    pub async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(fs::try_exists(path).await?)
    }

    pub async fn read_json(&self, path: &Path) -> Result<Value> {
        let content = fs::read(path).await?;
        Ok(serde_json::from_slice(&content)?)
    }

    /// Write indented JSON.
    pub async fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let content = serde_json::to_vec_pretty(value)?;
        self.write_bytes(path, &content).await
    }

    pub async fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        self.write_bytes(path, text.as_bytes()).await
    }

    pub async fn write_bytes(&self, path: &Path, data: &[u8]) -> Result<()> {
        let partial = partial_path(path);
        fs::write(&partial, data).await?;
        fs::rename(&partial, path).await?;
        Ok(())
    }

    /// Remove a file. Missing files are not an error.
    pub async fn remove(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}
