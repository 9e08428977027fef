//! Bounded, self-expiring join/leave log.
//!
//! Display aid only. Viewer count and mute state always come from the
//! registry.

use std::collections::VecDeque;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tracing::warn;

use screencast_ipc::{ActivityEvent, ActivityKind};

struct Entry {
    event: ActivityEvent,
    expires_at: Instant,
}

/// Keeps the most recent activity events, each with its own expiry.
pub struct ActivityLog {
    entries: VecDeque<Entry>,
    capacity: usize,
    expiry: Duration,
    next_id: u64,
    /// Wall-clock time pinned to the first `now` the log saw. Later
    /// timestamps are offsets from it on the same clock as expiry.
    anchor: Option<(Instant, u64)>,
}

impl ActivityLog {
    pub fn new(capacity: usize, expiry: Duration) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            expiry,
            next_id: 1,
            anchor: None,
        }
    }

    /// Append an event, dropping the oldest beyond capacity.
    pub fn record(&mut self, kind: ActivityKind, viewer_id: &str, now: Instant) -> ActivityEvent {
        let event = ActivityEvent {
            id: self.next_id,
            kind,
            viewer_id: viewer_id.to_string(),
            timestamp_ms: self.timestamp_ms(now),
        };
        self.next_id += 1;

        self.entries.push_back(Entry {
            event: event.clone(),
            expires_at: now + self.expiry,
        });

        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }

        event
    }

    /// Remove every event whose own deadline has passed. Returns how many
    /// were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.expires_at > now);
        before - self.entries.len()
    }

    /// Current events, oldest first.
    pub fn events(&self) -> Vec<ActivityEvent> {
        self.entries.iter().map(|e| e.event.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn timestamp_ms(&mut self, now: Instant) -> u64 {
        let (origin, origin_ms) = *self.anchor.get_or_insert_with(|| (now, wall_clock_ms()));
        let offset = u64::try_from(now.saturating_duration_since(origin).as_millis())
            .unwrap_or(u64::MAX);
        origin_ms.saturating_add(offset)
    }
}

fn wall_clock_ms() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(since_epoch) => u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX),
        Err(e) => {
            warn!("System clock before the epoch: {}", e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> ActivityLog {
        ActivityLog::new(5, Duration::from_secs(5))
    }

    #[test]
    fn test_keeps_last_five() {
        let mut log = log();
        let now = Instant::now();

        for i in 0..7 {
            log.record(ActivityKind::Join, &format!("v{i}"), now);
        }

        let ids: Vec<_> = log.events().into_iter().map(|e| e.viewer_id).collect();
        assert_eq!(ids, vec!["v2", "v3", "v4", "v5", "v6"]);
    }

    #[test]
    fn test_events_expire_independently() {
        let mut log = log();
        let start = Instant::now();

        log.record(ActivityKind::Join, "v1", start);
        log.record(ActivityKind::Leave, "v1", start + Duration::from_secs(2));

        assert_eq!(log.expire(start + Duration::from_secs(4)), 0);
        assert_eq!(log.expire(start + Duration::from_secs(5)), 1);

        let remaining = log.events();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].kind, ActivityKind::Leave);

        assert_eq!(log.expire(start + Duration::from_secs(7)), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut log = log();
        let now = Instant::now();

        let a = log.record(ActivityKind::Join, "v1", now);
        let b = log.record(ActivityKind::Join, "v1", now);
        assert_ne!(a.id, b.id);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_timestamps_follow_the_injected_clock() {
        let mut log = log();
        let start = Instant::now();

        let first = log.record(ActivityKind::Join, "v1", start);
        let second = log.record(ActivityKind::Leave, "v1", start + Duration::from_millis(2500));
        let earlier = log.record(ActivityKind::Join, "v2", start - Duration::from_secs(1));

        assert_eq!(second.timestamp_ms - first.timestamp_ms, 2500);
        assert_eq!(earlier.timestamp_ms, first.timestamp_ms);
    }
}
