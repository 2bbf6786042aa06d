//! Collaborator traits consumed by the command layer.
//!
//! The dispatch layer never looks inside the configuration object or the
//! API client. It only needs the narrow capabilities described here:
//!
//! - [`ConfigProvider`]: where the tool keeps its local state and logs
//! - [`ApiClient`]: attach an HTTP statistics sink, and shut down

use std::io::Write;
use std::path::PathBuf;

use crate::Result;

/// Trait for the shared configuration object.
///
/// # Bounds
///
/// - `Send + Sync`: Configuration is shared with hooks and run functions
/// - `'static`: Configuration lifetime is not borrowed
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use lfs_core::traits::ConfigProvider;
/// use lfs_core::Result;
///
/// struct RepoConfig {
///     git_dir: PathBuf,
/// }
///
/// impl ConfigProvider for RepoConfig {
///     fn local_storage_dir(&self) -> Result<PathBuf> {
///         Ok(self.git_dir.join("lfs"))
///     }
/// }
///
/// let config = RepoConfig { git_dir: PathBuf::from("/repo/.git") };
/// assert_eq!(config.local_log_dir().unwrap(), PathBuf::from("/repo/.git/lfs/logs"));
/// ```
pub trait ConfigProvider: Send + Sync + 'static {
    /// Root of the tool's local state (objects, temp files, logs).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be determined, e.g. the
    /// working directory is unavailable.
    fn local_storage_dir(&self) -> Result<PathBuf>;

    /// Directory for local log files.
    fn local_log_dir(&self) -> Result<PathBuf> {
        Ok(self.local_storage_dir()?.join("logs"))
    }
}

/// The shared network client.
///
/// The command layer only attaches a statistics sink to it (from the
/// diagnostics hook) and closes it once the command has finished.
pub trait ApiClient: Send + Sync {
    /// Start recording request/response statistics into `sink`.
    fn log_http_stats(&self, sink: Box<dyn Write + Send>);

    /// Release the client. Called exactly once per process.
    fn close(&self);
}
