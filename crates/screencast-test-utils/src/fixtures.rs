//! Test data.

use crossbeam_channel::Sender;

use screencast_audio::{AudioFrame, InboundTrack};
use screencast_ipc::{viewer_identity, SessionConfig};

/// Room used throughout the tests.
pub const TEST_ROOM: &str = "room1";

/// `viewer-room1-<suffix>`.
#[must_use]
pub fn test_viewer(suffix: &str) -> String {
    viewer_identity(TEST_ROOM, suffix)
}

/// Config with a fixed origin and defaults everywhere else.
#[must_use]
pub fn test_config() -> SessionConfig {
    SessionConfig {
        origin: "https://cast.test".to_string(),
        ..SessionConfig::default()
    }
}

/// An inbound audio track plus the sender that feeds it.
#[must_use]
pub fn test_audio_track(label: &str) -> (Sender<AudioFrame>, InboundTrack) {
    InboundTrack::channel(label)
}
