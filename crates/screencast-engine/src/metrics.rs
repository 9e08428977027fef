//! Session counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::RwLock;

use screencast_ipc::SessionStats;

/// Collects session counters. Shared with the host via `Arc`.
pub struct StatsCollector {
    sharing_since: RwLock<Option<Instant>>,
    viewers_joined: AtomicU64,
    viewers_left: AtomicU64,
    media_link_attempts: AtomicU64,
    media_link_failures: AtomicU64,
    control_sent: AtomicU64,
    control_dropped: AtomicU64,
    mix_rebuilds: AtomicU64,
    last_report_time: RwLock<Option<Instant>>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            sharing_since: RwLock::new(None),
            viewers_joined: AtomicU64::new(0),
            viewers_left: AtomicU64::new(0),
            media_link_attempts: AtomicU64::new(0),
            media_link_failures: AtomicU64::new(0),
            control_sent: AtomicU64::new(0),
            control_dropped: AtomicU64::new(0),
            mix_rebuilds: AtomicU64::new(0),
            last_report_time: RwLock::new(None),
        }
    }

    /// Mark the start of sharing.
    pub fn start_sharing(&self, now: Instant) {
        *self.sharing_since.write() = Some(now);
    }

    /// Mark the end of sharing.
    pub fn stop_sharing(&self) {
        *self.sharing_since.write() = None;
    }

    pub fn record_join(&self) {
        self.viewers_joined.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_leave(&self) {
        self.viewers_left.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_media_attempt(&self) {
        self.media_link_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_media_failure(&self) {
        self.media_link_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_control_sent(&self) {
        self.control_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_control_dropped(&self) {
        self.control_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_mix_rebuild(&self) {
        self.mix_rebuilds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn media_link_attempts(&self) -> u64 {
        self.media_link_attempts.load(Ordering::Relaxed)
    }

    /// Get current stats snapshot.
    pub fn snapshot(&self, viewer_count: usize, now: Instant) -> SessionStats {
        let sharing_seconds = self
            .sharing_since
            .read()
            .map(|s| now.saturating_duration_since(s).as_secs())
            .unwrap_or(0);

        SessionStats {
            viewer_count,
            viewers_joined: self.viewers_joined.load(Ordering::Relaxed),
            viewers_left: self.viewers_left.load(Ordering::Relaxed),
            media_link_attempts: self.media_link_attempts.load(Ordering::Relaxed),
            media_link_failures: self.media_link_failures.load(Ordering::Relaxed),
            control_messages_sent: self.control_sent.load(Ordering::Relaxed),
            control_messages_dropped: self.control_dropped.load(Ordering::Relaxed),
            mix_rebuilds: self.mix_rebuilds.load(Ordering::Relaxed),
            sharing_seconds,
        }
    }

    /// Whether `interval` has passed since the last report.
    pub fn report_due(&self, now: Instant, interval: std::time::Duration) -> bool {
        self.last_report_time
            .read()
            .map_or(true, |last| now.saturating_duration_since(last) >= interval)
    }

    /// Update last report time.
    pub fn mark_reported(&self, now: Instant) {
        *self.last_report_time.write() = Some(now);
    }
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}
