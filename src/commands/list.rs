//! List saved pages

use anyhow::Result;

use crate::Wiki;

/// Print every saved page title
pub fn run(wiki: &Wiki) -> Result<()> {
    let store = wiki.page_store();
    let assets = wiki.asset_store();

    let mut titles = store.list()?;
    titles.sort();

    println!("Pages ({}):", titles.len());
    for title in titles {
        if assets.exists(&title) {
            println!("  {} [image]", title);
        } else {
            println!("  {}", title);
        }
    }

    Ok(())
}
