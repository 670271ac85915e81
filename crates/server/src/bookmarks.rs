//! Bookmark list loading.
//!
//! The dashboard consumes a flat list of bookmarks from a TOML file; the
//! coordinator only ever needs the url of each entry.

use std::path::Path;

use keydash_core::Error;
use serde::Deserialize;

/// One launchable bookmark row.
#[derive(Debug, Clone, Deserialize)]
pub struct Bookmark {
    /// Single-key shortcut that opens this site.
    pub key: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct BookmarkFile {
    #[serde(default)]
    bookmarks: Vec<Bookmark>,
}

/// Parse a bookmarks document.
pub fn parse(raw: &str) -> Result<Vec<Bookmark>, Error> {
    let file: BookmarkFile = toml::from_str(raw).map_err(|e| Error::InvalidInput(format!("invalid bookmarks file: {e}")))?;
    Ok(file.bookmarks)
}

/// Load bookmarks from a TOML file.
pub fn load(path: &Path) -> Result<Vec<Bookmark>, Error> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::InvalidInput(format!("cannot read {}: {}", path.display(), e)))?;
    parse(&raw)
}
