//! Path resolution utilities.
//!
//! Helpers for turning user- or environment-supplied paths into absolute,
//! canonical ones.

use std::path::{Component, Path, PathBuf};

/// Makes `path` absolute relative to `cwd` and resolves symlinks.
///
/// A leading `~` is an ordinary path component here, as it is for git.
///
/// When the path does not exist the lexically normalised absolute path is
/// returned instead, so a not-yet-created `GIT_DIR` still canonicalises.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use lfs_core::util::paths::canonicalize_path;
///
/// let path = canonicalize_path("missing/../dir", Path::new("/no/such/root"));
/// assert_eq!(path, Path::new("/no/such/root/dir"));
/// ```
pub fn canonicalize_path<P: AsRef<Path>>(path: P, cwd: &Path) -> PathBuf {
    let path = path.as_ref().to_path_buf();
    let absolute = if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    };

    match absolute.canonicalize() {
        Ok(resolved) => resolved,
        Err(_) => normalize(&absolute),
    }
}

/// Removes `.` and `..` components without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Expands `~` to the user's home directory.
///
/// If the path starts with `~`, replaces it with the user's home directory.
/// Otherwise returns the path unchanged.
///
/// # Example
///
/// ```
/// use lfs_core::util::paths::expand_tilde;
///
/// let expanded = expand_tilde("~/documents");
/// assert!(!expanded.starts_with("~"));
/// ```
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde_with_tilde() {
        let path = expand_tilde("~/test/path");
        assert!(!path.starts_with("~"), "Tilde should be expanded");
        if let Some(home) = dirs::home_dir() {
            assert!(path.starts_with(&home), "Path should start with home dir");
            assert!(path.ends_with("test/path"), "Path should preserve suffix");
        }
    }

    #[test]
    fn test_expand_tilde_without_tilde() {
        let original = PathBuf::from("/absolute/path");
        assert_eq!(expand_tilde(&original), original);
    }

    #[test]
    fn test_normalize_parent_and_current() {
        assert_eq!(
            normalize(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
    }

    #[test]
    fn test_canonicalize_relative_missing() {
        let path = canonicalize_path(".git", Path::new("/nonexistent/repo"));
        assert_eq!(path, PathBuf::from("/nonexistent/repo/.git"));
    }

    #[test]
    fn test_canonicalize_absolute_missing() {
        let path = canonicalize_path("/nonexistent/x/../y", Path::new("/ignored"));
        assert_eq!(path, PathBuf::from("/nonexistent/y"));
    }

    #[test]
    fn test_canonicalize_keeps_tilde_literal() {
        let path = canonicalize_path("~/repo/.git", Path::new("/nonexistent/cwd"));
        assert_eq!(path, PathBuf::from("/nonexistent/cwd/~/repo/.git"));
    }

    #[test]
    fn test_canonicalize_existing_resolves() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("repo")).unwrap();
        let path = canonicalize_path("repo", dir.path());
        assert_eq!(path, dir.path().join("repo").canonicalize().unwrap());
    }
}
