//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use observability::{RunningStats, StatsSummary};

/// Metrics for one dispatcher (shared across worker generations)
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Current queue length
    queue_len: AtomicUsize,
    /// Messages accepted into the queue
    enqueued_count: AtomicU64,
    /// Messages dropped at the producer edge
    rejected_count: AtomicU64,
    /// Messages skipped by the worker (category / channel)
    skipped_count: AtomicU64,
    /// Successful sends
    sent_count: AtomicU64,
    /// Sends classified as anything but success
    failure_count: AtomicU64,
    /// Wall-clock time of the last successful send
    last_success_at: Mutex<Option<DateTime<Utc>>>,
    /// Rate-limit waits (ms)
    wait_stats: Mutex<RunningStats>,
    /// Transport call latency (ms)
    latency_stats: Mutex<RunningStats>,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current queue length
    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    /// Set current queue length
    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    pub fn enqueued_count(&self) -> u64 {
        self.enqueued_count.load(Ordering::Relaxed)
    }

    pub fn inc_enqueued_count(&self) {
        self.enqueued_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected_count.load(Ordering::Relaxed)
    }

    pub fn inc_rejected_count(&self) {
        self.rejected_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped_count.load(Ordering::Relaxed)
    }

    pub fn inc_skipped_count(&self) {
        self.skipped_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sent_count(&self) -> u64 {
        self.sent_count.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful send at `at`
    pub fn record_success(&self, at: DateTime<Utc>) {
        self.sent_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_success_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(at);
    }

    /// Wall-clock time of the last successful send
    pub fn last_success_at(&self) -> Option<DateTime<Utc>> {
        *self
            .last_success_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a rate-limit wait
    pub fn record_wait(&self, wait: Duration) {
        self.wait_stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(wait.as_secs_f64() * 1000.0);
    }

    /// Record a transport call latency
    pub fn record_latency(&self, latency: Duration) {
        self.latency_stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(latency.as_secs_f64() * 1000.0);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queue_len: self.queue_len(),
            enqueued_count: self.enqueued_count(),
            rejected_count: self.rejected_count(),
            skipped_count: self.skipped_count(),
            sent_count: self.sent_count(),
            failure_count: self.failure_count(),
            last_success_at: self.last_success_at(),
            wait_ms: self
                .wait_stats
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .summary(),
            latency_ms: self
                .latency_stats
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .summary(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub queue_len: usize,
    pub enqueued_count: u64,
    pub rejected_count: u64,
    pub skipped_count: u64,
    pub sent_count: u64,
    pub failure_count: u64,
    pub last_success_at: Option<DateTime<Utc>>,
    pub wait_ms: StatsSummary,
    pub latency_ms: StatsSummary,
}

impl MetricsSnapshot {
    /// Messages the worker has finished with (sent, failed or skipped)
    pub fn processed_count(&self) -> u64 {
        self.sent_count + self.failure_count + self.skipped_count
    }
}
