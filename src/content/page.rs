//! Flat-file page store
//!
//! Every page lives in `<title>.txt` inside the pages directory. The record is
//! the raw Markdown source, the delimiter, and the rendered HTML body, with
//! nothing before or after.

use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, WikiError};

/// Separates the Markdown source from the rendered body in a page record
pub const DELIMITER: &[u8] = b"---ENDOFMARKDOWN---";

/// File extension of page records
const PAGE_EXTENSION: &str = "txt";

/// Flatten hierarchical-looking titles (`a/b` becomes `a-b`)
pub fn sanitize_title(title: &str) -> String {
    title.replace('/', "-")
}

/// A wiki page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Page title, also the file key
    pub title: String,

    /// Raw Markdown source
    pub markdown: Vec<u8>,

    /// Rendered HTML body
    pub body: Vec<u8>,
}

impl Page {
    /// An empty page shell carrying only its title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Build a page from its Markdown source and rendered HTML
    pub fn with_content(
        title: impl Into<String>,
        markdown: impl Into<Vec<u8>>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            title: title.into(),
            markdown: markdown.into(),
            body: body.into(),
        }
    }

    /// Encode the on-disk record
    pub fn to_record(&self) -> Vec<u8> {
        let mut record = Vec::with_capacity(self.markdown.len() + DELIMITER.len() + self.body.len());
        record.extend_from_slice(&self.markdown);
        record.extend_from_slice(DELIMITER);
        record.extend_from_slice(&self.body);
        record
    }

    /// Decode an on-disk record.
    ///
    /// A record that does not split into exactly two parts is kept whole as
    /// the body, with an empty Markdown source.
    pub fn from_record(title: impl Into<String>, record: &[u8]) -> Self {
        let title = title.into();
        match split_record(record) {
            Some((markdown, body)) => Self::with_content(title, markdown, body),
            None => Self::with_content(title, Vec::new(), record),
        }
    }

    /// Markdown source as text
    pub fn markdown_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.markdown)
    }

    /// Rendered body as text
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Split a record on the delimiter, only if it occurs exactly once
fn split_record(record: &[u8]) -> Option<(&[u8], &[u8])> {
    let first = find(record, DELIMITER)?;
    let rest = &record[first + DELIMITER.len()..];
    // Occurrences are counted without overlap
    if find(rest, DELIMITER).is_some() {
        return None;
    }
    Some((&record[..first], rest))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Page persistence keyed by title
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    /// Create a store rooted at the pages directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of the record for a title
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", sanitize_title(title), PAGE_EXTENSION))
    }

    /// Load a page, failing with `PageNotFound` if it has no record
    pub fn load(&self, title: &str) -> Result<Page> {
        let title = sanitize_title(title);
        match fs::read(self.path_for(&title)) {
            Ok(record) => Ok(Page::from_record(title, &record)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(WikiError::PageNotFound(title)),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a record exists for the title
    pub fn exists(&self, title: &str) -> bool {
        self.path_for(title).is_file()
    }

    /// Write a page, replacing any previous record wholesale
    pub fn save(&self, page: &Page) -> Result<()> {
        let path = self.path_for(&page.title);
        fs::write(&path, page.to_record())?;
        tracing::debug!("Saved page {:?}", path);
        Ok(())
    }

    /// Remove a page record
    pub fn delete(&self, title: &str) -> Result<()> {
        let path = self.path_for(title);
        fs::remove_file(&path)?;
        tracing::debug!("Deleted page {:?}", path);
        Ok(())
    }

    /// Titles of every saved page, in directory listing order
    pub fn list(&self) -> Result<Vec<String>> {
        let mut titles = Vec::new();

        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::new(ErrorKind::Other, "directory loop"))
            })?;
            let path = entry.path();

            let is_page = path
                .extension()
                .map(|ext| ext == PAGE_EXTENSION)
                .unwrap_or(false);
            if !entry.file_type().is_file() || !is_page {
                continue;
            }

            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                titles.push(stem.to_string());
            }
        }

        Ok(titles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, PageStore) {
        let dir = TempDir::new().unwrap();
        let store = PageStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_dir, store) = store();
        let page = Page::with_content("Home", "# Home\n\nHello", "<h1>Home</h1>\n<p>Hello</p>\n");
        store.save(&page).unwrap();

        let loaded = store.load("Home").unwrap();
        assert_eq!(loaded, page);
    }

    #[test]
    fn test_record_layout_on_disk() {
        let (_dir, store) = store();
        store
            .save(&Page::with_content("Notes", "*a*", "<p><em>a</em></p>"))
            .unwrap();

        let raw = fs::read(store.path_for("Notes")).unwrap();
        assert_eq!(raw, b"*a*---ENDOFMARKDOWN---<p><em>a</em></p>".to_vec());
    }

    #[test]
    fn test_second_save_replaces_first() {
        let (_dir, store) = store();
        store.save(&Page::with_content("Log", "first", "<p>first</p>")).unwrap();
        store.save(&Page::with_content("Log", "second", "<p>second</p>")).unwrap();

        let loaded = store.load("Log").unwrap();
        assert_eq!(loaded.markdown, b"second");
        assert_eq!(loaded.body, b"<p>second</p>");
    }

    #[test]
    fn test_load_missing_page() {
        let (_dir, store) = store();
        match store.load("Nowhere") {
            Err(WikiError::PageNotFound(title)) => assert_eq!(title, "Nowhere"),
            other => panic!("expected PageNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_record_without_delimiter_is_all_body() {
        let (_dir, store) = store();
        fs::write(store.path_for("Legacy"), "<p>old page</p>").unwrap();

        let page = store.load("Legacy").unwrap();
        assert!(page.markdown.is_empty());
        assert_eq!(page.body, b"<p>old page</p>");
    }

    #[test]
    fn test_record_with_two_delimiters_is_all_body() {
        let record = b"a---ENDOFMARKDOWN---b---ENDOFMARKDOWN---c";
        let page = Page::from_record("Odd", record);
        assert!(page.markdown.is_empty());
        assert_eq!(page.body, record.to_vec());
    }

    #[test]
    fn test_slashes_collapse_to_hyphens() {
        let (_dir, store) = store();
        store
            .save(&Page::with_content("guides/rust", "x", "<p>x</p>"))
            .unwrap();

        assert!(store.path_for("guides-rust").is_file());
        assert_eq!(store.load("guides/rust").unwrap(), store.load("guides-rust").unwrap());
        assert_eq!(store.list().unwrap(), vec!["guides-rust".to_string()]);
    }

    #[test]
    fn test_list_only_page_records() {
        let (dir, store) = store();
        store.save(&Page::with_content("Alpha", "", "")).unwrap();
        store.save(&Page::with_content("Beta", "", "")).unwrap();
        fs::write(dir.path().join("wiki.yml"), "pages_dir: .").unwrap();
        fs::create_dir(dir.path().join("uploads.txt")).unwrap();

        let mut titles = store.list().unwrap();
        titles.sort();
        assert_eq!(titles, vec!["Alpha".to_string(), "Beta".to_string()]);
    }

    #[test]
    fn test_delimiter_matches_do_not_overlap() {
        // The delimiter starts and ends with "---"; the second hit shares
        // those dashes with the first and does not count
        let record = b"---ENDOFMARKDOWN---ENDOFMARKDOWN---";
        let page = Page::from_record("Dashes", record);
        assert!(page.markdown.is_empty());
        assert_eq!(page.body, b"ENDOFMARKDOWN---");
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = store();
        store.save(&Page::with_content("Gone", "", "")).unwrap();
        assert!(store.exists("Gone"));

        store.delete("Gone").unwrap();
        assert!(!store.exists("Gone"));
        assert!(matches!(store.delete("Gone"), Err(WikiError::Io(_))));
    }
}
