//! Common types used across IPC messages.

use serde::{Deserialize, Serialize};

/// Configuration for a presenter session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Origin viewers load the app from (e.g., "https://cast.example.com").
    pub origin: String,

    /// Maximum number of activity events kept for display.
    pub activity_capacity: usize,

    /// Lifetime of one activity event in milliseconds.
    pub activity_expiry_ms: u64,

    /// Engine loop tick in milliseconds (drives expiry and reconnect timers).
    pub tick_interval_ms: u64,

    /// How often stats are emitted while a room is bound.
    pub stats_interval_ms: u64,

    /// Maximum identity reconnect attempts before the session errors.
    pub reconnect_max_attempts: u32,

    /// Base reconnect delay (doubled per attempt).
    pub reconnect_base_delay_ms: u64,

    /// Upper bound for the reconnect delay.
    pub reconnect_max_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".to_string(),
            activity_capacity: 5,
            activity_expiry_ms: 5000,
            tick_interval_ms: 100,
            stats_interval_ms: 1000,
            reconnect_max_attempts: 3,
            reconnect_base_delay_ms: 1000,
            reconnect_max_delay_ms: 10_000,
        }
    }
}

/// Kind of viewer activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Join,
    Leave,
}

/// A join/leave entry of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Monotonic sequence number, unique per session.
    pub id: u64,

    pub kind: ActivityKind,

    pub viewer_id: String,

    /// Wall-clock time in milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

/// Per-viewer state exposed to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerSnapshot {
    pub viewer_id: String,

    /// Presenter has muted this viewer.
    pub muted_by_presenter: bool,

    /// Viewer contributes to the inbound mix.
    pub has_inbound_audio: bool,

    /// A media link to this viewer is outstanding.
    pub has_media_link: bool,
}

/// Session counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Registered viewers right now.
    pub viewer_count: usize,

    /// Total viewers that joined since the room was bound.
    pub viewers_joined: u64,

    /// Total viewers that left since the room was bound.
    pub viewers_left: u64,

    /// Media links the fan-out attempted to open.
    pub media_link_attempts: u64,

    /// Media link attempts the transport rejected.
    pub media_link_failures: u64,

    /// Control messages written to an open link.
    pub control_messages_sent: u64,

    /// Control messages dropped because the link was not open.
    pub control_messages_dropped: u64,

    /// Inbound mix rebuilds.
    pub mix_rebuilds: u64,

    /// Seconds since sharing started (0 when not sharing).
    pub sharing_seconds: u64,
}

/// Non-fatal degradations reported to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningType {
    /// Microphone was denied or missing; sharing continues video-only.
    MicrophoneUnavailable { reason: String },

    /// Identity connection dropped; a reconnect is scheduled.
    Reconnecting { attempt: u32, max_attempts: u32 },

    /// The transport refused to open a media link to one viewer.
    MediaLinkFailed { viewer_id: String, reason: String },
}
