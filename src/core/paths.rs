//! Path normalization utilities
//!
//! Ensures all paths are normalized to use '/' as separator and are relative to root.

use std::path::{Path, PathBuf};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Display form of a page path: relative to root when possible, else as given
pub fn display_path(path: &Path, root: &Path) -> String {
    make_relative(path, root)
        .filter(|rel| !rel.is_empty())
        .unwrap_or_else(|| normalize_path(path))
}

/// Resolve a user-supplied path against root; absolute paths are kept
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Whether a file name looks like an HTML page
pub fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("docs/index.html")), "docs/index.html");
    }

    #[test]
    fn test_make_relative() {
        let root = Path::new("/site");
        let path = Path::new("/site/docs/index.html");
        assert_eq!(make_relative(path, root), Some("docs/index.html".to_string()));
    }

    #[test]
    fn test_make_relative_not_under_root() {
        let root = Path::new("/site");
        assert_eq!(make_relative(Path::new("/other/index.html"), root), None);
    }

    #[test]
    fn test_display_path_falls_back_to_given_path() {
        let root = Path::new("/site");
        assert_eq!(display_path(Path::new("/site/a.html"), root), "a.html");
        assert_eq!(display_path(Path::new("/other/a.html"), root), "/other/a.html");
        assert_eq!(display_path(Path::new("/site"), root), "/site");
    }

    #[test]
    fn test_resolve() {
        let root = Path::new("/site");
        assert_eq!(resolve(root, Path::new("a.html")), PathBuf::from("/site/a.html"));
        assert_eq!(resolve(root, Path::new("/abs/a.html")), PathBuf::from("/abs/a.html"));
    }

    #[test]
    fn test_is_html() {
        assert!(is_html(Path::new("index.html")));
        assert!(is_html(Path::new("OLD.HTM")));
        assert!(!is_html(Path::new("style.css")));
        assert!(!is_html(Path::new("README")));
    }
}
