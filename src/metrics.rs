use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Request counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub shifts_created: Arc<AtomicU64>,
    pub shifts_updated: Arc<AtomicU64>,
    pub shifts_deleted: Arc<AtomicU64>,
    pub licences_created: Arc<AtomicU64>,
    pub licences_deleted: Arc<AtomicU64>,
    pub searches: Arc<AtomicU64>,
    pub overlap_queries: Arc<AtomicU64>,
    pub conflicts_rejected: Arc<AtomicU64>,
    pub mirror_failures: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            shifts_created: Arc::new(AtomicU64::new(0)),
            shifts_updated: Arc::new(AtomicU64::new(0)),
            shifts_deleted: Arc::new(AtomicU64::new(0)),
            licences_created: Arc::new(AtomicU64::new(0)),
            licences_deleted: Arc::new(AtomicU64::new(0)),
            searches: Arc::new(AtomicU64::new(0)),
            overlap_queries: Arc::new(AtomicU64::new(0)),
            conflicts_rejected: Arc::new(AtomicU64::new(0)),
            mirror_failures: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_shifts_created(&self) {
        self.shifts_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_shifts_updated(&self) {
        self.shifts_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_shifts_deleted(&self) {
        self.shifts_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_licences_created(&self) {
        self.licences_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_licences_deleted(&self) {
        self.licences_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_searches(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_overlap_queries(&self) {
        self.overlap_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_conflicts_rejected(&self) {
        self.conflicts_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_mirror_failures(&self) {
        self.mirror_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            shifts_created: self.shifts_created.load(Ordering::Relaxed),
            shifts_updated: self.shifts_updated.load(Ordering::Relaxed),
            shifts_deleted: self.shifts_deleted.load(Ordering::Relaxed),
            licences_created: self.licences_created.load(Ordering::Relaxed),
            licences_deleted: self.licences_deleted.load(Ordering::Relaxed),
            searches: self.searches.load(Ordering::Relaxed),
            overlap_queries: self.overlap_queries.load(Ordering::Relaxed),
            conflicts_rejected: self.conflicts_rejected.load(Ordering::Relaxed),
            mirror_failures: self.mirror_failures.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub shifts_created: u64,
    pub shifts_updated: u64,
    pub shifts_deleted: u64,
    pub licences_created: u64,
    pub licences_deleted: u64,
    pub searches: u64,
    pub overlap_queries: u64,
    pub conflicts_rejected: u64,
    pub mirror_failures: u64,
    pub uptime_seconds: u64,
}
