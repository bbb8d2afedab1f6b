//! Content module - pages, their attached images, and Markdown rendering

mod asset;
mod markdown;
mod page;

pub use asset::AssetStore;
pub use markdown::MarkdownRenderer;
pub use page::{sanitize_title, Page, PageStore, DELIMITER};
