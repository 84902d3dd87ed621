//! Process-wide dispatch counters
//!
//! Tracks:
//! - Requests dispatched (total and failed)
//! - Jobs completed
//! - Dispatches currently in flight (active sessions)
//! - Uptime since the registry was created
//!
//! Counters are atomics, so handlers on any runtime thread can update them
//! without locking. Clones share the same counters.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{QuantumSynthError, Result};

/// Central registry of dispatch counters
#[derive(Debug, Clone)]
pub struct MetricsRegistry {
    /// Total number of dispatches attempted
    requests_total: Arc<AtomicU64>,
    /// Dispatches that ended in an error
    requests_failed: Arc<AtomicU64>,
    /// Dispatches currently in flight
    active_sessions: Arc<AtomicUsize>,
    /// Dispatches that produced a result
    jobs_run: Arc<AtomicU64>,
    /// Uptime origin
    start_time: Instant,
}

impl MetricsRegistry {
    /// Create a registry with all counters at zero
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests_total: Arc::new(AtomicU64::new(0)),
            requests_failed: Arc::new(AtomicU64::new(0)),
            active_sessions: Arc::new(AtomicUsize::new(0)),
            jobs_run: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    /// Count a dispatch and open a session slot.
    ///
    /// The request is counted even when no slot is available. The slot is
    /// released when the returned guard drops.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` if `limit` sessions are already active
    pub fn begin_session(&self, limit: usize) -> Result<SessionGuard> {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        self.active_sessions
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |active| {
                (active < limit).then_some(active + 1)
            })
            .map_err(|_| QuantumSynthError::CapacityExceeded { limit })?;
        Ok(SessionGuard {
            active_sessions: Arc::clone(&self.active_sessions),
        })
    }

    /// Record a dispatch that produced a result
    pub fn record_job(&self) {
        self.jobs_run.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dispatch that ended in an error
    pub fn record_failure(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Seconds since the registry was created
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get current snapshot of counters
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_seconds: self.uptime_secs(),
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            active_sessions: self.active_sessions.load(Ordering::Acquire),
            quantum_jobs_run: self.jobs_run.load(Ordering::Relaxed),
        }
    }

    /// Export counters in Prometheus text format
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            "# HELP quantumsynth_uptime_seconds Uptime in seconds\n\
             # TYPE quantumsynth_uptime_seconds counter\n\
             quantumsynth_uptime_seconds {}\n\
             # HELP quantumsynth_requests_total Total dispatched requests\n\
             # TYPE quantumsynth_requests_total counter\n\
             quantumsynth_requests_total {}\n\
             # HELP quantumsynth_requests_failed Failed requests\n\
             # TYPE quantumsynth_requests_failed counter\n\
             quantumsynth_requests_failed {}\n\
             # HELP quantumsynth_active_sessions Dispatches in flight\n\
             # TYPE quantumsynth_active_sessions gauge\n\
             quantumsynth_active_sessions {}\n\
             # HELP quantumsynth_quantum_jobs_run Completed jobs\n\
             # TYPE quantumsynth_quantum_jobs_run counter\n\
             quantumsynth_quantum_jobs_run {}\n",
            snapshot.uptime_seconds,
            snapshot.requests_total,
            snapshot.requests_failed,
            snapshot.active_sessions,
            snapshot.quantum_jobs_run,
        )
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds one active session slot until dropped
#[derive(Debug)]
pub struct SessionGuard {
    active_sessions: Arc<AtomicUsize>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.active_sessions.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Seconds since process start
    pub uptime_seconds: u64,
    /// Dispatches attempted
    pub requests_total: u64,
    /// Dispatches that failed
    #[serde(default, skip_serializing)]
    pub requests_failed: u64,
    /// Dispatches in flight
    pub active_sessions: usize,
    /// Dispatches that produced a result
    pub quantum_jobs_run: u64,
}
