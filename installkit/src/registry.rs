//! In-memory active-task registry.

use dashmap::DashSet;
use tracing::debug;

use crate::component::TaskKind;
use crate::host::TaskRegistry;

/// Concurrent presence set of running installer kinds.
#[derive(Debug, Default)]
pub struct ActiveTasks {
    running: DashSet<TaskKind>,
}

impl ActiveTasks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of running kinds.
    pub fn len(&self) -> usize {
        self.running.len()
    }

    /// Whether nothing is running.
    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }
}

impl TaskRegistry for ActiveTasks {
    fn add_active_task(&self, kind: TaskKind) -> bool {
        let added = self.running.insert(kind);
        debug!(kind = %kind, added, "Active task registered");
        added
    }

    fn remove_active_task(&self, kind: TaskKind) {
        self.running.remove(&kind);
        debug!(kind = %kind, "Active task removed");
    }

    fn is_active(&self, kind: TaskKind) -> bool {
        self.running.contains(&kind)
    }
}
