//! Local media tracks and the combined outbound stream.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::CaptureError;
use crate::CaptureResult;

static NEXT_TRACK_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_STREAM_ID: AtomicU64 = AtomicU64::new(1);

/// Kind of a local track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => f.write_str("video"),
            Self::Audio => f.write_str("audio"),
        }
    }
}

/// Handle to a locally captured track.
///
/// Clones share liveness and enabled flags with the capture source, so
/// stopping any clone stops the device.
#[derive(Debug, Clone)]
pub struct LocalTrack {
    id: String,
    kind: TrackKind,
    label: String,
    live: Arc<AtomicBool>,
    enabled: Arc<AtomicBool>,
}

impl LocalTrack {
    /// Create a live, enabled track.
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        let n = NEXT_TRACK_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("{kind}-{n}"),
            kind,
            label: label.into(),
            live: Arc::new(AtomicBool::new(true)),
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns true until the track is stopped.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Stop the track and release the device.
    pub fn stop(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            debug!(track = %self.id, "Local track stopped");
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Enable or disable the track without stopping it.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }
}

/// Result of a display acquisition.
#[derive(Debug, Clone, Default)]
pub struct DisplayCapture {
    pub video: Option<LocalTrack>,

    /// Tab/system audio, if the environment offered it.
    pub audio: Option<LocalTrack>,
}

/// The presenter's combined outbound stream: one video track and any
/// number of audio tracks. Shared read-only by every media link.
#[derive(Debug, Clone)]
pub struct OutboundStream {
    id: u64,
    video: LocalTrack,
    audio: Vec<LocalTrack>,
}

impl OutboundStream {
    /// Combine tracks. Fails unless `video` is a live video track.
    pub fn new(video: LocalTrack, audio: Vec<LocalTrack>) -> CaptureResult<Self> {
        if video.kind() != TrackKind::Video || !video.is_live() {
            return Err(CaptureError::NoVideoTrack);
        }

        let audio = audio
            .into_iter()
            .filter(|t| t.kind() == TrackKind::Audio)
            .collect();

        Ok(Self {
            id: NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed),
            video,
            audio,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn video(&self) -> &LocalTrack {
        &self.video
    }

    pub fn audio(&self) -> &[LocalTrack] {
        &self.audio
    }

    pub fn has_audio(&self) -> bool {
        !self.audio.is_empty()
    }

    /// Returns true while the video track is live.
    pub fn is_live(&self) -> bool {
        self.video.is_live()
    }

    /// Stop every track.
    pub fn stop(&self) {
        self.video.stop();
        for track in &self.audio {
            track.stop();
        }
    }
}
