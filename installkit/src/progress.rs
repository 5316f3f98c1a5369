//! Progress reporting for a pipeline instance.
//!
//! Every emission of a pipeline goes through one [`ProgressChannel`], which
//! carries the instance's halt flag. The [`ProgressReporter`] is a tokio task
//! that polls a [`TransferState`] on a fixed period and emits download
//! progress until the transfer completes or the channel halts.
//!
//! ```text
//!   TransferState ◄── poll every `period` ── ProgressReporter
//!                                                  │ emit()
//!                                                  ▼
//!   failure path ── halt() ──────────────► ProgressChannel ──► ProgressSurface
//! ```
//!
//! The halt check and the emission share one lock, so once `halt()` returns
//! the reporter can no longer reach the surface.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::host::{ProgressItem, ProgressSurface};
use crate::locale::{Locale, MessageKey};
use crate::transfer::TransferState;

/// Default polling period of the reporter.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(1000);

/// Halt-gated emitter for one progress item.
pub struct ProgressChannel {
    surface: Arc<dyn ProgressSurface>,
    item_id: String,
    title: String,
    subtitle: String,
    halted: Mutex<bool>,
}

impl ProgressChannel {
    pub fn new(
        surface: Arc<dyn ProgressSurface>,
        item_id: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Self {
        Self {
            surface,
            item_id: item_id.into(),
            title: title.into(),
            subtitle: subtitle.into(),
            halted: Mutex::new(false),
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn item(&self, message: &str, percent: u8) -> ProgressItem {
        ProgressItem {
            id: self.item_id.clone(),
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            message: message.to_string(),
            percent: percent.min(100),
        }
    }

    /// Emit a progress update unless the channel is halted.
    ///
    /// Returns `false` when the update was suppressed.
    pub fn emit(&self, message: &str, percent: u8) -> bool {
        let halted = self.halted.lock();
        if *halted {
            return false;
        }
        self.surface.add_progress_item(&self.item(message, percent));
        true
    }

    /// Emit the terminal update, regardless of the halt flag.
    pub fn emit_final(&self, message: &str, percent: u8) {
        let _guard = self.halted.lock();
        self.surface.add_progress_item(&self.item(message, percent));
    }

    /// Set the halt flag. Returns `true` if this call set it.
    pub fn halt(&self) -> bool {
        let mut halted = self.halted.lock();
        let transitioned = !*halted;
        *halted = true;
        transitioned
    }

    pub fn is_halted(&self) -> bool {
        *self.halted.lock()
    }

    /// Mark the progress item as no longer active.
    pub fn stop(&self) {
        self.surface.stop_progress_item(&self.item_id);
    }
}

/// Format a download progress line.
pub fn download_message(locale: &Locale, current_mb: f64, total_mb: f64, percent: u8) -> String {
    format!(
        "{} {:.2} MB {} {:.2} MB ({}%)",
        locale.get(MessageKey::DownloadingFiles),
        current_mb,
        locale.get(MessageKey::OutOf),
        total_mb,
        percent
    )
}

/// Periodic download progress task.
///
/// Stops by itself when the transfer reaches 100% or the channel is
/// halted. It never emits a final notification; that belongs to the
/// pipeline's finalizers.
pub struct ProgressReporter {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Start polling `transfer` every `period`.
    pub fn spawn(
        channel: Arc<ProgressChannel>,
        transfer: Arc<TransferState>,
        locale: Arc<Locale>,
        period: Duration,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut last = 0u8;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(period) => {}
                }

                let percent = transfer.percent();
                if percent >= 100 {
                    break;
                }
                let percent = percent.max(last);
                last = percent;

                let message =
                    download_message(&locale, transfer.current_mb(), transfer.total_mb(), percent);
                if !channel.emit(&message, percent) {
                    trace!(id = channel.item_id(), "Reporter halted");
                    break;
                }
            }
            debug!(id = channel.item_id(), "Progress reporter finished");
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Cancel the task and wait for it to end.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FullInstallItem;

    #[derive(Default)]
    struct Recorder {
        items: Mutex<Vec<ProgressItem>>,
        stopped: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn percents(&self) -> Vec<u8> {
            self.items.lock().iter().map(|i| i.percent).collect()
        }
    }

    impl ProgressSurface for Recorder {
        fn add_progress_item(&self, item: &ProgressItem) {
            self.items.lock().push(item.clone());
        }

        fn stop_progress_item(&self, id: &str) {
            self.stopped.lock().push(id.to_string());
        }

        fn full_install_progress_item(&self, _item: Option<&FullInstallItem>) {}
    }

    fn channel(recorder: &Arc<Recorder>) -> Arc<ProgressChannel> {
        Arc::new(ProgressChannel::new(
            recorder.clone(),
            "InstallProgressItem1",
            "Remesh Pack Download for FreeSO",
            "/games/FreeSO",
        ))
    }

    #[test]
    fn test_halt_transitions_once() {
        let recorder = Arc::new(Recorder::default());
        let channel = channel(&recorder);

        assert!(channel.emit("a", 10));
        assert!(channel.halt());
        assert!(!channel.halt());
        assert!(channel.is_halted());
        assert!(!channel.emit("b", 20));

        channel.emit_final("failed", 100);
        channel.stop();

        assert_eq!(recorder.percents(), vec![10, 100]);
        assert_eq!(*recorder.stopped.lock(), vec!["InstallProgressItem1"]);
    }

    #[test]
    fn test_emit_clamps_percent() {
        let recorder = Arc::new(Recorder::default());
        channel(&recorder).emit("over", 250);
        assert_eq!(recorder.percents(), vec![100]);
    }

    #[test]
    fn test_download_message() {
        let msg = download_message(&Locale::english(), 1.5, 10.0, 15);
        assert_eq!(msg, "Downloading files: 1.50 MB out of 10.00 MB (15%)");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reporter_emits_until_halted() {
        let recorder = Arc::new(Recorder::default());
        let channel = channel(&recorder);
        let transfer = Arc::new(TransferState::new("http://a/b.zip", "/tmp/b.zip"));
        transfer.set_total(100);
        transfer.add_bytes(30);

        let reporter = ProgressReporter::spawn(
            channel.clone(),
            transfer.clone(),
            Arc::new(Locale::english()),
            Duration::from_secs(1),
        );

        tokio::time::sleep(Duration::from_millis(1500)).await;
        transfer.add_bytes(30);
        tokio::time::sleep(Duration::from_secs(1)).await;

        channel.halt();
        let emitted = recorder.percents().len();
        transfer.add_bytes(10);
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(recorder.percents().len(), emitted, "no emission after halt");
        reporter.stop().await;

        let percents = recorder.percents();
        assert_eq!(percents, vec![30, 60]);
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reporter_stops_at_completion() {
        let recorder = Arc::new(Recorder::default());
        let transfer = Arc::new(TransferState::new("http://a/b.zip", "/tmp/b.zip"));
        transfer.set_total(10);
        transfer.add_bytes(10);

        let reporter = ProgressReporter::spawn(
            channel(&recorder),
            transfer,
            Arc::new(Locale::english()),
            Duration::from_secs(1),
        );
        tokio::time::sleep(Duration::from_secs(5)).await;
        reporter.stop().await;

        assert!(recorder.percents().is_empty(), "reporter never emits the final item");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_first_tick() {
        let recorder = Arc::new(Recorder::default());
        let transfer = Arc::new(TransferState::new("http://a/b.zip", "/tmp/b.zip"));

        let reporter = ProgressReporter::spawn(
            channel(&recorder),
            transfer,
            Arc::new(Locale::english()),
            Duration::from_secs(1),
        );
        reporter.stop().await;
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert!(recorder.percents().is_empty());
    }
}
