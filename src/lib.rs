//! mdwiki: a small Markdown wiki served over HTTP
//!
//! Pages are flat files holding their Markdown source next to the rendered
//! HTML. Each page may carry one image. A handful of feature forms are
//! proxied to an external JSON service, and registrations are written to a
//! SQLite credential table.

pub mod commands;
pub mod config;
pub mod content;
pub mod credentials;
pub mod error;
pub mod routing;
pub mod server;
pub mod service;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{AssetStore, MarkdownRenderer, PageStore};
use credentials::CredentialStore;

/// Name of the optional configuration file in the base directory
pub const CONFIG_FILE: &str = "wiki.yml";

/// The main wiki application
#[derive(Clone)]
pub struct Wiki {
    /// Wiki configuration
    pub config: config::WikiConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Page records directory
    pub pages_dir: PathBuf,
    /// Uploaded page images
    pub upload_dir: PathBuf,
    /// Static images
    pub image_dir: PathBuf,
    /// Stylesheet served at /templates/view.css
    pub stylesheet: PathBuf,
    /// SQLite credential database
    pub credential_db: PathBuf,
}

impl Wiki {
    /// Create a new Wiki instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::WikiConfig::load(&config_path)?
        } else {
            config::WikiConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Wiki from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::WikiConfig) -> Self {
        let pages_dir = base_dir.join(&config.pages_dir);
        let upload_dir = base_dir.join(&config.upload_dir);
        let image_dir = base_dir.join(&config.image_dir);
        let stylesheet = base_dir.join(&config.stylesheet);
        let credential_db = base_dir.join(&config.credential_db);

        Self {
            config,
            base_dir,
            pages_dir,
            upload_dir,
            image_dir,
            stylesheet,
            credential_db,
        }
    }

    pub fn page_store(&self) -> PageStore {
        PageStore::new(&self.pages_dir)
    }

    pub fn asset_store(&self) -> AssetStore {
        AssetStore::new(&self.upload_dir)
    }

    pub fn credential_store(&self) -> CredentialStore {
        CredentialStore::new(&self.credential_db)
    }

    /// Markdown renderer configured from the highlight settings
    pub fn markdown_renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::with_options(&self.config.highlight_theme, self.config.line_numbers)
    }

    /// List saved pages
    pub fn list(&self) -> Result<()> {
        commands::list::run(self)
    }

    /// Create a page from a Markdown file, or an empty page
    pub fn new_page(&self, title: &str, source: Option<&Path>) -> Result<PathBuf> {
        commands::new::create_page(self, title, source)
    }
}
