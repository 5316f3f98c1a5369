//! Remote archive transfer.
//!
//! A [`TransferMonitor`] spawns one fetch through a [`Transport`] and exposes
//! its progress through a shared [`TransferState`]:
//!
//! ```text
//! TransferMonitor ──start()──► tokio task ──► Transport::fetch
//!        │                          │
//!        │ Arc<TransferState> ◄─────┘ (bytes, total, failed, finished)
//!        │
//!        └──► TerminalSignal (oneshot) ──wait()──► TransferOutcome
//! ```
//!
//! The progress reporter reads the same `TransferState` without touching the
//! fetch task.

mod http;
mod monitor;
mod state;

use std::path::Path;

use crate::error::TransferError;
use crate::host::BoxFuture;

pub use http::{HttpTransport, DEFAULT_TIMEOUT_SECS};
pub use monitor::{TerminalSignal, TransferMonitor, TransferOutcome};
pub use state::TransferState;

/// Fetches a remote resource into a local file.
///
/// Implementations create the destination's parent directory, update
/// `state` as bytes arrive and return the number of bytes written. They must
/// not set the terminal flags; the monitor does that.
pub trait Transport: Send + Sync {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
        state: &'a TransferState,
    ) -> BoxFuture<'a, Result<u64, TransferError>>;
}
