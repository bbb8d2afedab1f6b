//! CLI commands that work on the page store directly

pub mod list;
pub mod new;
