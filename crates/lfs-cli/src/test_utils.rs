//! Shared test doubles.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lfs_core::ApiClient;

/// In-memory writer whose clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock().unwrap()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.lock().unwrap().is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// API client that counts calls and keeps an ordered event log.
#[derive(Debug, Default)]
pub struct MockApiClient {
    sinks: AtomicUsize,
    closes: AtomicUsize,
    events: Mutex<Vec<String>>,
}

impl MockApiClient {
    pub fn sinks_attached(&self) -> usize {
        self.sinks.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Append an event from outside the client (e.g. a command body).
    pub fn note(&self, event: &str) {
        self.events.lock().unwrap().push(event.to_string());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ApiClient for MockApiClient {
    fn log_http_stats(&self, _sink: Box<dyn Write + Send>) {
        self.sinks.fetch_add(1, Ordering::SeqCst);
        self.note("log_http_stats");
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.note("close");
    }
}
