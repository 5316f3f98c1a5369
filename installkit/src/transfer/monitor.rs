//! Background fetch with an awaitable terminal signal.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::{TransferState, Transport};

/// Terminal outcome of a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Whether the transfer ended in failure.
    pub failed: bool,
    /// Bytes written to the destination.
    pub bytes: u64,
    /// Transport error text when `failed` is set.
    pub error: Option<String>,
}

impl TransferOutcome {
    fn lost() -> Self {
        Self {
            failed: true,
            bytes: 0,
            error: Some("transfer task ended without reporting".to_string()),
        }
    }
}

/// Resolves once, when the transfer reaches its terminal outcome.
#[derive(Debug)]
pub struct TerminalSignal {
    rx: oneshot::Receiver<TransferOutcome>,
}

impl TerminalSignal {
    /// Wait for the transfer to end.
    ///
    /// A transfer task that dies without reporting counts as failed.
    pub async fn wait(self) -> TransferOutcome {
        self.rx.await.unwrap_or_else(|_| TransferOutcome::lost())
    }
}

/// Observes a single remote fetch.
///
/// The monitor owns the [`TransferState`] shared with the fetch task and
/// any progress reporter. Accessors are safe to call at any time, including
/// before [`start`](Self::start).
pub struct TransferMonitor {
    state: Arc<TransferState>,
    transport: Option<Arc<dyn Transport>>,
}

impl TransferMonitor {
    /// Create a monitor for fetching `url` into `destination`.
    pub fn new(
        url: impl Into<String>,
        destination: impl Into<PathBuf>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            state: Arc::new(TransferState::new(url, destination)),
            transport: Some(transport),
        }
    }

    /// Spawn the fetch.
    ///
    /// Returns the terminal signal on the first call. Later calls return
    /// `None` and start nothing.
    pub fn start(&mut self) -> Option<TerminalSignal> {
        let transport = self.transport.take()?;
        let state = Arc::clone(&self.state);
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let url = state.source_url().to_string();
            debug!(url = %url, path = %state.destination().display(), "Transfer started");

            let result = transport.fetch(&url, state.destination(), &state).await;
            let outcome = match result {
                Ok(bytes) => TransferOutcome {
                    failed: false,
                    bytes,
                    error: None,
                },
                Err(e) => {
                    warn!(url = %url, error = %e, "Transfer failed");
                    TransferOutcome {
                        failed: true,
                        bytes: state.bytes_transferred(),
                        error: Some(e.to_string()),
                    }
                }
            };

            state.finish(outcome.failed);
            // The receiver may already be gone; nothing is waiting then.
            let _ = tx.send(outcome);
        });

        Some(TerminalSignal { rx })
    }

    /// Shared state, for progress observers.
    pub fn state(&self) -> Arc<TransferState> {
        Arc::clone(&self.state)
    }

    pub fn current_percent(&self) -> u8 {
        self.state.percent()
    }

    pub fn current_mb(&self) -> f64 {
        self.state.current_mb()
    }

    pub fn total_mb(&self) -> f64 {
        self.state.total_mb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransferError;
    use crate::host::BoxFuture;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedTransport {
        payload: Option<Vec<u8>>,
        calls: AtomicUsize,
    }

    impl Transport for FixedTransport {
        fn fetch<'a>(
            &'a self,
            url: &'a str,
            _dest: &'a Path,
            state: &'a TransferState,
        ) -> BoxFuture<'a, Result<u64, TransferError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                match &self.payload {
                    Some(bytes) => {
                        state.set_total(bytes.len() as u64);
                        state.add_bytes(bytes.len() as u64);
                        Ok(bytes.len() as u64)
                    }
                    None => Err(TransferError::Unreachable(url.to_string())),
                }
            })
        }
    }

    struct PanickingTransport;

    impl Transport for PanickingTransport {
        fn fetch<'a>(
            &'a self,
            _url: &'a str,
            _dest: &'a Path,
            _state: &'a TransferState,
        ) -> BoxFuture<'a, Result<u64, TransferError>> {
            Box::pin(async {
                if std::hint::black_box(true) {
                    panic!("transport exploded");
                }
                Ok::<u64, TransferError>(0)
            })
        }
    }

    #[tokio::test]
    async fn test_successful_transfer() {
        let transport = Arc::new(FixedTransport {
            payload: Some(vec![0; 300]),
            calls: AtomicUsize::new(0),
        });
        let mut monitor = TransferMonitor::new("http://a/b.zip", "/tmp/b.zip", transport.clone());
        assert_eq!(monitor.current_percent(), 0);

        let outcome = monitor.start().unwrap().wait().await;
        assert!(!outcome.failed);
        assert_eq!(outcome.bytes, 300);
        assert_eq!(monitor.current_percent(), 100);
        assert!(monitor.state().is_finished());
    }

    #[tokio::test]
    async fn test_start_only_once() {
        let transport = Arc::new(FixedTransport {
            payload: Some(Vec::new()),
            calls: AtomicUsize::new(0),
        });
        let mut monitor = TransferMonitor::new("http://a/b.zip", "/tmp/b.zip", transport.clone());

        let signal = monitor.start();
        assert!(signal.is_some());
        assert!(monitor.start().is_none());
        signal.unwrap().wait().await;

        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_transfer_sets_flag() {
        let transport = Arc::new(FixedTransport {
            payload: None,
            calls: AtomicUsize::new(0),
        });
        let mut monitor = TransferMonitor::new("http://nowhere/", "/tmp/x.zip", transport);

        let outcome = monitor.start().unwrap().wait().await;
        assert!(outcome.failed);
        assert!(outcome.error.unwrap().contains("unreachable"));
        assert!(monitor.state().is_failed());
        assert_eq!(monitor.current_percent(), 0);
    }

    #[tokio::test]
    async fn test_dead_task_reports_failure() {
        let mut monitor =
            TransferMonitor::new("http://a/b.zip", "/tmp/b.zip", Arc::new(PanickingTransport));
        let outcome = monitor.start().unwrap().wait().await;
        assert!(outcome.failed);
    }
}
