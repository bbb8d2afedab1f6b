//! Create a page from the command line

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::Page;
use crate::Wiki;

/// Save a new page, rendering its Markdown the same way the web form does
pub fn create_page(wiki: &Wiki, title: &str, source: Option<&Path>) -> Result<PathBuf> {
    if title.is_empty() {
        anyhow::bail!("Title cannot be empty");
    }

    let store = wiki.page_store();
    if store.exists(title) {
        anyhow::bail!("Page already exists: {:?}", store.path_for(title));
    }

    let markdown = match source {
        Some(path) => fs::read(path)?,
        None => Vec::new(),
    };
    let body = wiki.markdown_renderer().render_bytes(&markdown);

    let page = Page::with_content(title, markdown, body);
    store.save(&page)?;

    let path = store.path_for(title);
    println!("Created: {:?}", path);

    Ok(path)
}
