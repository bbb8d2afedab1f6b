//! Per-page image attachments

use std::fs;
use std::path::{Path, PathBuf};

use super::sanitize_title;
use crate::error::Result;

/// Stores at most one image per page title, as `<dir>/<title>.png`
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of the image for a title
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.root.join(format!("{}.png", sanitize_title(title)))
    }

    /// Whether an image has been stored for the title
    pub fn exists(&self, title: &str) -> bool {
        self.path_for(title).exists()
    }

    /// Write the image, creating the upload directory if needed and
    /// replacing any earlier image for the same title
    pub fn store(&self, title: &str, data: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(title);
        fs::write(&path, data)?;
        tracing::debug!("Stored {} bytes at {:?}", data.len(), path);
        Ok(path)
    }
}
