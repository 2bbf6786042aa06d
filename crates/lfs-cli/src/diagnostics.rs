//! HTTP statistics logging, switched on by `GIT_LOG_STATS`.
//!
//! The hook is attached to every subcommand and runs just before the
//! command body. When the toggle is on it opens a fresh
//! `<log_dir>/http/http-<unix seconds>.log` and hands it to the API client,
//! so the client records every request the command makes. The log directory
//! is only resolved once the toggle is known to be on.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use lfs_core::{ApiClient, ConfigProvider, Environment, Translator};

use crate::command::{Invocation, PreRunHook};

/// Toggle for HTTP statistics. Any non-empty value turns it on.
pub const HTTP_STATS_ENV: &str = "GIT_LOG_STATS";

/// Pre-run hook that attaches an HTTP statistics file to the API client.
pub struct HttpStatsHook {
    enabled: bool,
    config: Arc<dyn ConfigProvider>,
    client: Arc<dyn ApiClient>,
    translator: Translator,
    fired: AtomicBool,
}

impl HttpStatsHook {
    /// Create the hook. `environment` is read once, here.
    pub fn new(
        environment: &Environment,
        config: Arc<dyn ConfigProvider>,
        client: Arc<dyn ApiClient>,
    ) -> Self {
        Self {
            enabled: environment.is_truthy(HTTP_STATS_ENV),
            config,
            client,
            translator: Translator::identity(),
            fired: AtomicBool::new(false),
        }
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = translator;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Fire the hook using the current time.
    ///
    /// Returns the path of the file handed to the client, if any.
    pub fn fire(&self, err: &mut dyn Write) -> Option<PathBuf> {
        self.fire_at(chrono::Utc::now().timestamp(), err)
    }

    /// Fire the hook as if the current time were `unix_seconds`.
    ///
    /// Only the first call does anything.
    pub fn fire_at(&self, unix_seconds: i64, err: &mut dyn Write) -> Option<PathBuf> {
        if self.fired.swap(true, Ordering::SeqCst) || !self.enabled {
            return None;
        }

        let dir = match self.config.local_log_dir() {
            Ok(log_dir) => log_dir.join("http"),
            Err(e) => {
                self.warn(err, &e);
                return None;
            }
        };
        if let Err(e) = fs::create_dir_all(&dir) {
            self.warn(err, &e);
            return None;
        }

        let path = dir.join(format!("http-{unix_seconds}.log"));
        let file = match File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                self.warn(err, &e);
                return None;
            }
        };

        tracing::debug!(path = %path.display(), "logging HTTP stats");
        self.client.log_http_stats(Box::new(file));
        Some(path)
    }

    fn warn(&self, err: &mut dyn Write, cause: &dyn Display) {
        tracing::debug!("cannot open HTTP stats log: {cause}");
        let msg = self.translator.get("Error logging HTTP stats: {}", &[cause]);
        // Nothing useful to do if the error stream itself is broken.
        let _ = writeln!(err, "{msg}");
    }

    /// Wrap the hook for attachment to command nodes.
    pub fn into_pre_run(self) -> PreRunHook {
        let hook = Arc::new(self);
        Arc::new(move |invocation: &mut Invocation<'_>| {
            hook.fire(&mut *invocation.err);
        })
    }
}

impl std::fmt::Debug for HttpStatsHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStatsHook")
            .field("enabled", &self.enabled)
            .field("fired", &self.fired.load(Ordering::SeqCst))
            .finish()
    }
}

/// `true` if `path` looks like a file this hook would create.
pub fn is_stats_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_prefix("http-"))
        .and_then(|n| n.strip_suffix(".log"))
        .is_some_and(|secs| !secs.is_empty() && secs.bytes().all(|b| b.is_ascii_digit()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockApiClient;
    use lfs_core::{Error, Result};

    /// Log directory fixed to one path.
    struct LogDir(PathBuf);

    impl ConfigProvider for LogDir {
        fn local_storage_dir(&self) -> Result<PathBuf> {
            Ok(self.0.clone())
        }

        fn local_log_dir(&self) -> Result<PathBuf> {
            Ok(self.0.clone())
        }
    }

    /// Storage location that cannot be determined.
    struct NoStorage;

    impl ConfigProvider for NoStorage {
        fn local_storage_dir(&self) -> Result<PathBuf> {
            Err(Error::config("Could not determine storage directory"))
        }
    }

    fn stats_env() -> Environment {
        Environment::from_vars([(HTTP_STATS_ENV, "1")])
    }

    fn hook(env: &Environment, log_dir: &Path, client: &Arc<MockApiClient>) -> HttpStatsHook {
        HttpStatsHook::new(env, Arc::new(LogDir(log_dir.to_path_buf())), client.clone())
    }

    fn entries(dir: &Path) -> Vec<PathBuf> {
        match fs::read_dir(dir) {
            Ok(rd) => rd.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn test_disabled_does_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let client = Arc::new(MockApiClient::default());
        let hook = hook(&Environment::default(), dir.path(), &client);

        let mut err = Vec::new();
        assert!(hook.fire(&mut err).is_none());
        assert!(!dir.path().join("http").exists());
        assert_eq!(client.sinks_attached(), 0);
        assert!(err.is_empty());
    }

    #[test]
    fn test_empty_toggle_is_off() {
        let env = Environment::from_vars([(HTTP_STATS_ENV, "")]);
        let client = Arc::new(MockApiClient::default());
        assert!(!hook(&env, Path::new("/nonexistent"), &client).is_enabled());
    }

    #[test]
    fn test_disabled_never_resolves_log_dir() {
        let client = Arc::new(MockApiClient::default());
        let hook = HttpStatsHook::new(&Environment::default(), Arc::new(NoStorage), client.clone());

        let mut err = Vec::new();
        assert!(hook.fire(&mut err).is_none());
        assert!(err.is_empty());
    }

    #[test]
    fn test_unresolvable_log_dir_warns() {
        let client = Arc::new(MockApiClient::default());
        let hook = HttpStatsHook::new(&stats_env(), Arc::new(NoStorage), client.clone());

        let mut err = Vec::new();
        assert!(hook.fire(&mut err).is_none());
        let text = String::from_utf8(err).unwrap();
        assert!(text.starts_with("Error logging HTTP stats: "));
        assert!(text.contains("Could not determine storage directory"));
        assert_eq!(client.sinks_attached(), 0);
    }

    #[test]
    fn test_enabled_creates_one_file_and_attaches_sink() {
        let dir = tempfile::TempDir::new().unwrap();
        let client = Arc::new(MockApiClient::default());
        let hook = hook(&stats_env(), dir.path(), &client);

        let mut err = Vec::new();
        let path = hook.fire_at(1_700_000_000, &mut err).unwrap();
        assert_eq!(path, dir.path().join("http").join("http-1700000000.log"));
        assert!(path.is_file());
        assert_eq!(entries(&dir.path().join("http")), vec![path]);
        assert_eq!(client.sinks_attached(), 1);
        assert!(err.is_empty());
    }

    #[test]
    fn test_fires_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let client = Arc::new(MockApiClient::default());
        let hook = hook(&stats_env(), dir.path(), &client);

        let mut err = Vec::new();
        assert!(hook.fire_at(1, &mut err).is_some());
        assert!(hook.fire_at(2, &mut err).is_none());
        assert_eq!(entries(&dir.path().join("http")).len(), 1);
        assert_eq!(client.sinks_attached(), 1);
    }

    #[test]
    fn test_directory_failure_warns() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("logs");
        fs::write(&blocker, "not a directory").unwrap();
        let client = Arc::new(MockApiClient::default());
        let hook = hook(&stats_env(), &blocker, &client);

        let mut err = Vec::new();
        assert!(hook.fire_at(5, &mut err).is_none());
        let text = String::from_utf8(err).unwrap();
        assert!(text.starts_with("Error logging HTTP stats: "));
        assert_eq!(client.sinks_attached(), 0);
    }

    #[test]
    fn test_file_failure_warns() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("http").join("http-42.log")).unwrap();
        let client = Arc::new(MockApiClient::default());
        let hook = hook(&stats_env(), dir.path(), &client);

        let mut err = Vec::new();
        assert!(hook.fire_at(42, &mut err).is_none());
        let text = String::from_utf8(err).unwrap();
        assert!(text.starts_with("Error logging HTTP stats: "));
        assert_eq!(client.sinks_attached(), 0);
    }

    #[test]
    fn test_warning_is_translated() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("logs");
        fs::write(&blocker, "").unwrap();
        let tr = Translator::from_json(r#"{"Error logging HTTP stats: {}": "HTTP-Statistik: {}"}"#)
            .unwrap();
        let client = Arc::new(MockApiClient::default());
        let hook = hook(&stats_env(), &blocker, &client).with_translator(tr);

        let mut err = Vec::new();
        hook.fire_at(1, &mut err);
        assert!(String::from_utf8(err).unwrap().starts_with("HTTP-Statistik: "));
    }

    #[test]
    fn test_is_stats_file() {
        assert!(is_stats_file(Path::new("/x/http/http-1700000000.log")));
        assert!(!is_stats_file(Path::new("http-.log")));
        assert!(!is_stats_file(Path::new("http-12a.log")));
        assert!(!is_stats_file(Path::new("trace-1.log")));
    }
}
