//! Wiki configuration (wiki.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main wiki configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    // Storage
    pub pages_dir: String,
    pub upload_dir: String,
    pub image_dir: String,
    pub stylesheet: String,

    // Feature service
    pub service_url: String,
    pub service_timeout_secs: Option<u64>,

    // Credentials
    pub credential_db: String,

    // Rendering
    pub highlight_theme: String,
    pub line_numbers: bool,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            pages_dir: ".".to_string(),
            upload_dir: "uploads".to_string(),
            image_dir: "images".to_string(),
            stylesheet: "templates/view.css".to_string(),

            service_url: "http://127.0.0.1:5000".to_string(),
            service_timeout_secs: None,

            credential_db: "users.db".to_string(),

            highlight_theme: "base16-ocean.dark".to_string(),
            line_numbers: false,
        }
    }
}

impl WikiConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: WikiConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Outbound timeout for the feature service, if one is configured
    pub fn service_timeout(&self) -> Option<Duration> {
        self.service_timeout_secs.map(Duration::from_secs)
    }
}
