//! Environment snapshots and canonicalisation.
//!
//! The runner captures the process environment once, canonicalises the git
//! path variables, and hands the resulting [`Environment`] to everything that
//! needs environment-derived settings (configuration, the diagnostics
//! toggle). Nothing downstream reads `std::env` directly, which keeps the
//! lifecycle testable without mutating process state.

use std::collections::BTreeMap;
use std::path::Path;

use crate::util::paths::canonicalize_path;

/// Git variables holding paths that must be absolute before any subcommand
/// changes directory.
pub const CANONICAL_PATH_VARS: &[&str] = &[
    "GIT_INDEX_FILE",
    "GIT_OBJECT_DIRECTORY",
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_COMMON_DIR",
];

/// Immutable snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Build a snapshot from explicit key/value pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// A toggle is on when the variable is set to any non-empty value.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }

    /// Return a copy with `key` set to `value`.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Rewrite the git path variables as absolute, symlink-resolved paths.
    ///
    /// Relative values are resolved against `cwd`. Empty values are left
    /// untouched.
    pub fn canonicalize(mut self, cwd: &Path) -> Self {
        for key in CANONICAL_PATH_VARS {
            let Some(value) = self.vars.get_mut(*key) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            let canonical = canonicalize_path(value.as_str(), cwd);
            tracing::trace!(var = key, from = %value, to = %canonical.display(), "canonicalized");
            *value = canonical.to_string_lossy().into_owned();
        }
        self
    }

    /// Canonicalise against the process working directory.
    ///
    /// If the working directory cannot be determined the snapshot is returned
    /// unchanged.
    pub fn canonicalize_from_cwd(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.canonicalize(&cwd),
            Err(e) => {
                tracing::warn!("cannot canonicalize environment: {e}");
                self
            }
        }
    }
}
