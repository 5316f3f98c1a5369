//! Pipeline instance identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// Time-based identity of one pipeline instance.
///
/// Ids are unix milliseconds, bumped when needed so that ids issued within
/// one process are strictly increasing even inside the same millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineId(u64);

impl PipelineId {
    /// Issue a fresh id.
    pub fn next() -> Self {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let mut last = LAST_ID.load(Ordering::SeqCst);
        loop {
            let candidate = now.max(last + 1);
            match LAST_ID.compare_exchange_weak(last, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return Self(candidate),
                Err(actual) => last = actual,
            }
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Id of the progress item owned by this instance.
    pub fn progress_item_id(&self) -> String {
        format!("InstallProgressItem{}", self.0)
    }
}

impl fmt::Display for PipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
