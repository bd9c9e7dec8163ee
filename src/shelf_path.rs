//! Purpose: Default catalog-file path resolution for the `shelf` CLI.
//! Exports: `default_shelf_file`.
//! Role: Keep CLI invocations pointing at one catalog unless told otherwise.
//! Invariants: Default catalog file remains `~/.shelf/catalog.shelf`.
//! Invariants: A non-empty `SHELF_FILE` overrides the home-directory default.

use std::path::PathBuf;

pub(crate) fn default_shelf_file() -> PathBuf {
    if let Some(path) = std::env::var_os("SHELF_FILE") {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    let home = std::env::var_os("HOME").unwrap_or_default();
    PathBuf::from(home).join(".shelf").join("catalog.shelf")
}
