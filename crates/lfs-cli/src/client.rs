//! A minimal API client that records HTTP statistics.
//!
//! Transfers themselves live elsewhere; this client only owns the statistics
//! sink and the shutdown step the runner performs after every command.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use lfs_core::ApiClient;

type Sink = Box<dyn Write + Send>;

/// Records one line per HTTP request into the attached sink.
#[derive(Default)]
pub struct StatsClient {
    sink: Mutex<Option<Sink>>,
    closed: AtomicBool,
}

impl StatsClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn sink(&self) -> MutexGuard<'_, Option<Sink>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a statistics sink is attached.
    pub fn is_logging(&self) -> bool {
        self.sink().is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Record a finished request. A no-op when nothing is attached.
    pub fn record(&self, method: &str, url: &str, status: u16, elapsed: Duration) {
        let mut guard = self.sink();
        let Some(sink) = guard.as_mut() else {
            return;
        };
        let line = format!(
            "{} {method} {url} status={status} duration_ms={}",
            chrono::Utc::now().to_rfc3339(),
            elapsed.as_millis()
        );
        if let Err(e) = writeln!(sink, "{line}") {
            tracing::warn!("dropping HTTP stats sink: {e}");
            *guard = None;
        }
    }
}

impl ApiClient for StatsClient {
    fn log_http_stats(&self, sink: Box<dyn Write + Send>) {
        if self.is_closed() {
            tracing::warn!("HTTP stats sink attached after close; ignoring it");
            return;
        }
        *self.sink() = Some(sink);
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(mut sink) = self.sink().take() {
            if let Err(e) = sink.flush() {
                tracing::warn!("flushing HTTP stats: {e}");
            }
        }
        tracing::trace!("API client closed");
    }
}

impl std::fmt::Debug for StatsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsClient")
            .field("logging", &self.is_logging())
            .field("closed", &self.is_closed())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
