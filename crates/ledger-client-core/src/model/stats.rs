// Path: crates/ledger-client-core/src/model/stats.rs
//! Per-client counters, updated atomically and snapshot-read, never
//! incrementally read during a call.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Live counters for one `Client` instance's transport activity.
#[derive(Debug, Default)]
pub struct GrpcStatistics {
    total_requests: AtomicU64,
    total_retries: AtomicU64,
    total_failures: AtomicU64,
    last_latency_ns: AtomicU64,
    last_status_code: AtomicU32,
    last_http_status: AtomicU32,
}

/// An immutable point-in-time snapshot of [`GrpcStatistics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrpcStatisticsSnapshot {
    /// Total transport attempts issued.
    pub total_requests: u64,
    /// Total retries taken across all attempts.
    pub total_retries: u64,
    /// Total attempts that ended in a non-retryable failure.
    pub total_failures: u64,
    /// The most recent attempt's measured duration, in nanoseconds.
    pub last_latency_ns: u64,
    /// The most recent gRPC status code observed.
    pub last_status_code: u32,
    /// The most recent HTTP status code observed.
    pub last_http_status: u32,
}

impl GrpcStatistics {
    /// Records the start of a new attempt.
    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Records that an attempt is being retried.
    pub fn record_retry(&self) {
        self.total_retries.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a terminal (non-retried) failure.
    pub fn record_failure(&self) {
        self.total_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records the measured latency, gRPC status, and HTTP status of the
    /// most recently completed attempt.
    pub fn record_attempt(&self, latency_ns: u64, grpc_status: u32, http_status: u32) {
        self.last_latency_ns.store(latency_ns, Ordering::Relaxed);
        self.last_status_code.store(grpc_status, Ordering::Relaxed);
        self.last_http_status.store(http_status, Ordering::Relaxed);
    }

    /// Takes a consistent point-in-time snapshot, never read incrementally
    /// mid-call.
    pub fn snapshot(&self) -> GrpcStatisticsSnapshot {
        GrpcStatisticsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            total_retries: self.total_retries.load(Ordering::Relaxed),
            total_failures: self.total_failures.load(Ordering::Relaxed),
            last_latency_ns: self.last_latency_ns.load(Ordering::Relaxed),
            last_status_code: self.last_status_code.load(Ordering::Relaxed),
            last_http_status: self.last_http_status.load(Ordering::Relaxed),
        }
    }
}
