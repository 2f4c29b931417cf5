use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for dispatch and status lookups
#[derive(Debug, Default)]
pub struct LiveMetrics {
    jobs_dispatched: AtomicU64,
    dispatch_failures: AtomicU64,
    status_lookups: AtomicU64,
    status_absent: AtomicU64,
    corrupt_statuses: AtomicU64,
}

/// Point-in-time copy of [`LiveMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub jobs_dispatched: u64,
    pub dispatch_failures: u64,
    pub status_lookups: u64,
    pub status_absent: u64,
    pub corrupt_statuses: u64,
}

impl LiveMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_jobs_dispatched(&self) {
        self.jobs_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_dispatch_failures(&self) {
        self.dispatch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_status_lookups(&self) {
        self.status_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_status_absent(&self) {
        self.status_absent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_corrupt_statuses(&self) {
        self.corrupt_statuses.fetch_add(1, Ordering::Relaxed);
    }

    // Getters for global metrics
    pub fn jobs_dispatched(&self) -> u64 {
        self.jobs_dispatched.load(Ordering::Relaxed)
    }

    pub fn dispatch_failures(&self) -> u64 {
        self.dispatch_failures.load(Ordering::Relaxed)
    }

    pub fn status_lookups(&self) -> u64 {
        self.status_lookups.load(Ordering::Relaxed)
    }

    pub fn status_absent(&self) -> u64 {
        self.status_absent.load(Ordering::Relaxed)
    }

    pub fn corrupt_statuses(&self) -> u64 {
        self.corrupt_statuses.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            jobs_dispatched: self.jobs_dispatched(),
            dispatch_failures: self.dispatch_failures(),
            status_lookups: self.status_lookups(),
            status_absent: self.status_absent(),
            corrupt_statuses: self.corrupt_statuses(),
        }
    }
}
