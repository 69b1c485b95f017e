//! Path helpers for the Zellij sandbox.
//!
//! Inside the sandbox the host's home directory is reachable as `/host`, so
//! user-facing paths such as `~/.config/shelfview/catalog.json` must be
//! rewritten before they can be opened.

use std::path::{Path, PathBuf};

/// File name of the saved-books library inside the data directory.
const LIBRARY_FILE: &str = "library.json";

/// Directory holding cached ASCII cover art, one `<cover>.txt` per cover.
const COVERS_DIR: &str = "covers";

/// Returns the data directory for Shelfview storage.
///
/// Resolves to `~/.local/share/zellij/shelfview` on the host.
///
/// # Examples
///
/// ```
/// use shelfview::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert_eq!(data_dir.to_str().unwrap(), "/host/.local/share/zellij/shelfview");
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("shelfview")
}

/// Location of the saved-books library under `data_dir`.
#[must_use]
pub fn library_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LIBRARY_FILE)
}

/// Location of the cover art cache under `data_dir`.
#[must_use]
pub fn covers_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(COVERS_DIR)
}

/// Expands tilde paths to use the `/host` prefix for Zellij sandbox.
///
/// # Examples
///
/// ```
/// use shelfview::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/books"), "/host/books");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}

/// Removes the `/host` prefix from sandbox paths for display purposes.
///
/// # Examples
///
/// ```
/// use shelfview::infrastructure::strip_host_prefix;
///
/// assert_eq!(strip_host_prefix("/host/.config/shelfview/catalog.json"), "/.config/shelfview/catalog.json");
/// assert_eq!(strip_host_prefix("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn strip_host_prefix(path: &str) -> String {
    path.strip_prefix("/host").unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_files_live_under_the_data_dir() {
        let dir = PathBuf::from("/tmp/shelf");
        assert_eq!(library_path(&dir), PathBuf::from("/tmp/shelf/library.json"));
        assert_eq!(covers_dir(&dir), PathBuf::from("/tmp/shelf/covers"));
    }

    #[test]
    fn tilde_only_expands_at_the_start() {
        assert_eq!(expand_tilde("a/~/b"), "a/~/b");
        assert_eq!(expand_tilde("~user/x"), "~user/x");
    }
}
