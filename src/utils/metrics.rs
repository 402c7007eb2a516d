//! Observability and Metrics
//!
//! Counters describing a running draft. Uses atomic counters so one instance
//! can be shared behind the session's observer without locking.
//!
//! There is no process-wide instance; whoever builds the observer owns the
//! metrics and hands them in.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Metrics collector for one draft session
#[derive(Debug)]
pub struct DraftMetrics {
    /// Players seated
    pub players_joined: AtomicU64,
    /// Total messages sent to players
    pub messages_sent: AtomicU64,
    /// Total messages received from players
    pub messages_received: AtomicU64,
    /// Total payload bytes sent
    pub bytes_sent: AtomicU64,
    /// Total payload bytes received
    pub bytes_received: AtomicU64,
    /// Picks removed from packs
    pub picks_applied: AtomicU64,
    /// Completed pick rounds across all groups
    pub rounds_played: AtomicU64,
    /// Fully drafted pack groups
    pub groups_completed: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl DraftMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            players_joined: AtomicU64::new(0),
            messages_sent: AtomicU64::new(0),
            messages_received: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            picks_applied: AtomicU64::new(0),
            rounds_played: AtomicU64::new(0),
            groups_completed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn player_joined(&self) {
        self.players_joined.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a message sent
    pub fn message_sent(&self, byte_count: u64) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a message received
    pub fn message_received(&self, byte_count: u64) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn pick_applied(&self) {
        self.picks_applied.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a drafted group and the rounds it took
    pub fn group_completed(&self, rounds: u64) {
        self.groups_completed.fetch_add(1, Ordering::Relaxed);
        self.rounds_played.fetch_add(rounds, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            players_joined: self.players_joined.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            picks_applied: self.picks_applied.load(Ordering::Relaxed),
            rounds_played: self.rounds_played.load(Ordering::Relaxed),
            groups_completed: self.groups_completed.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            players_joined = snapshot.players_joined,
            messages_sent = snapshot.messages_sent,
            messages_received = snapshot.messages_received,
            bytes_sent = snapshot.bytes_sent,
            bytes_received = snapshot.bytes_received,
            picks_applied = snapshot.picks_applied,
            rounds_played = snapshot.rounds_played,
            groups_completed = snapshot.groups_completed,
            uptime_seconds = snapshot.uptime_seconds,
            "Draft metrics snapshot"
        );
    }
}

impl Default for DraftMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub players_joined: u64,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub picks_applied: u64,
    pub rounds_played: u64,
    pub groups_completed: u64,
    pub uptime_seconds: u64,
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}
