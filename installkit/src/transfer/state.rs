//! Shared byte counters for a single transfer.
//!
//! A [`TransferState`] is written by the transport task and read by the
//! progress reporter, so every field is atomic.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Progress and terminal flags of one remote fetch.
#[derive(Debug)]
pub struct TransferState {
    source_url: String,
    destination: PathBuf,
    bytes_transferred: AtomicU64,
    /// Zero until the response headers announce a length.
    total_bytes: AtomicU64,
    failed: AtomicBool,
    finished: AtomicBool,
}

impl TransferState {
    /// Create the state for a fetch of `source_url` into `destination`.
    pub fn new(source_url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_url: source_url.into(),
            destination: destination.into(),
            bytes_transferred: AtomicU64::new(0),
            total_bytes: AtomicU64::new(0),
            failed: AtomicBool::new(false),
            finished: AtomicBool::new(false),
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Record the expected size, once known.
    pub fn set_total(&self, total: u64) {
        self.total_bytes.store(total, Ordering::SeqCst);
    }

    /// Add freshly written bytes.
    pub fn add_bytes(&self, count: u64) {
        self.bytes_transferred.fetch_add(count, Ordering::SeqCst);
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred.load(Ordering::SeqCst)
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes.load(Ordering::SeqCst)
    }

    /// Mark the transfer as terminated, successfully or not.
    pub fn finish(&self, failed: bool) {
        self.failed.store(failed, Ordering::SeqCst);
        self.finished.store(true, Ordering::SeqCst);
    }

    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Integer completion percentage in `0..=100`.
    ///
    /// With an unknown total the transfer reads 0% until it finishes
    /// successfully, then 100%.
    pub fn percent(&self) -> u8 {
        let total = self.total_bytes();
        if total == 0 {
            return if self.is_finished() && !self.is_failed() {
                100
            } else {
                0
            };
        }
        let bytes = self.bytes_transferred();
        (bytes.saturating_mul(100) / total).min(100) as u8
    }

    /// Bytes transferred so far, in megabytes.
    pub fn current_mb(&self) -> f64 {
        self.bytes_transferred() as f64 / BYTES_PER_MB
    }

    /// Expected size in megabytes, 0 when unknown.
    pub fn total_mb(&self) -> f64 {
        self.total_bytes() as f64 / BYTES_PER_MB
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> TransferState {
        TransferState::new("http://example.com/a.zip", "/tmp/a.zip")
    }

    #[test]
    fn test_percent_with_known_total() {
        let s = state();
        s.set_total(200);
        assert_eq!(s.percent(), 0);
        s.add_bytes(50);
        assert_eq!(s.percent(), 25);
        s.add_bytes(150);
        assert_eq!(s.percent(), 100);
    }

    #[test]
    fn test_percent_is_clamped() {
        let s = state();
        s.set_total(10);
        s.add_bytes(25);
        assert_eq!(s.percent(), 100);
    }

    #[test]
    fn test_percent_unknown_total() {
        let s = state();
        s.add_bytes(4096);
        assert_eq!(s.percent(), 0);
        s.finish(false);
        assert_eq!(s.percent(), 100);
    }

    #[test]
    fn test_failed_unknown_total_stays_at_zero() {
        let s = state();
        s.finish(true);
        assert!(s.is_finished());
        assert!(s.is_failed());
        assert_eq!(s.percent(), 0);
    }

    #[test]
    fn test_megabytes() {
        let s = state();
        s.set_total(2 * 1024 * 1024);
        s.add_bytes(512 * 1024);
        assert!((s.current_mb() - 0.5).abs() < f64::EPSILON);
        assert!((s.total_mb() - 2.0).abs() < f64::EPSILON);
    }
}
