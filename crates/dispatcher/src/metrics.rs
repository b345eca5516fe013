//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Dispatched operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOp {
    QueueAdd,
    QueueRemove,
    Commit,
}

impl DispatchOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::QueueAdd => "queue_add",
            Self::QueueRemove => "queue_remove",
            Self::Commit => "commit",
        }
    }
}

/// Per-composite counters, one increment per member invocation
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Successful member queue_add calls
    add_count: AtomicU64,
    /// Successful member queue_remove calls
    remove_count: AtomicU64,
    /// Successful member commit calls
    commit_count: AtomicU64,
    /// Member calls that returned an error
    failure_count: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one successful member call
    pub fn record_success(&self, op: DispatchOp) {
        let counter = match op {
            DispatchOp::QueueAdd => &self.add_count,
            DispatchOp::QueueRemove => &self.remove_count,
            DispatchOp::Commit => &self.commit_count,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one failed member call
    pub fn record_failure(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_count(&self) -> u64 {
        self.add_count.load(Ordering::Relaxed)
    }

    pub fn remove_count(&self) -> u64 {
        self.remove_count.load(Ordering::Relaxed)
    }

    pub fn commit_count(&self) -> u64 {
        self.commit_count.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            add_count: self.add_count(),
            remove_count: self.remove_count(),
            commit_count: self.commit_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub add_count: u64,
    pub remove_count: u64,
    pub commit_count: u64,
    pub failure_count: u64,
}
