//! Session status tracking and outbound stream resources.

use tracing::{debug, info, instrument, warn};

use screencast_capture::{CaptureError, LocalTrack, MediaCapture, OutboundStream};
use screencast_ipc::{SessionSnapshot, SessionStatus, WarningType};

use crate::error::EngineError;
use crate::EngineResult;

/// Room binding, status and last error of one presenter.
#[derive(Debug, Default)]
pub struct SessionState {
    room_id: Option<String>,
    status: SessionStatus,
    last_error: Option<String>,
    identity: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn bind_room(&mut self, room_id: &str) {
        self.room_id = Some(room_id.to_string());
    }

    pub fn set_identity(&mut self, identity: Option<String>) {
        self.identity = identity;
    }

    pub fn set_error(&mut self, message: String) {
        self.last_error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Forget the room entirely (full teardown).
    pub fn unbind(&mut self) {
        self.room_id = None;
        self.identity = None;
    }

    /// Move to `next`. Returns the previous status, or `None` if already
    /// there.
    pub fn transition_to(&mut self, next: SessionStatus) -> EngineResult<Option<SessionStatus>> {
        let previous = self.status;

        if previous == next {
            return Ok(None);
        }

        if !previous.can_transition_to(next) {
            return Err(EngineError::InvalidTransition {
                from: previous.name(),
                to: next.name(),
            });
        }

        self.status = next;
        debug!(previous = previous.name(), current = next.name(), "State transition");
        Ok(Some(previous))
    }

    pub fn snapshot(&self, viewer_count: usize) -> SessionSnapshot {
        SessionSnapshot {
            room_id: self.room_id.clone(),
            status: self.status,
            last_error: self.last_error.clone(),
            identity: self.identity.clone(),
            viewer_count,
        }
    }
}

/// Outcome of a successful acquisition.
#[derive(Debug)]
pub struct AcquiredStream {
    pub stream: OutboundStream,
    pub warnings: Vec<WarningType>,
}

/// Owns the capture source and the current outbound stream.
pub struct ShareResources {
    capture: Box<dyn MediaCapture>,
    outbound: Option<OutboundStream>,
}

impl ShareResources {
    pub fn new(capture: Box<dyn MediaCapture>) -> Self {
        Self {
            capture,
            outbound: None,
        }
    }

    /// Acquire the display and the microphone and combine them.
    ///
    /// A missing or denied video track fails the whole acquisition and
    /// releases anything acquired so far. A denied microphone only adds a
    /// warning.
    #[instrument(name = "acquire_outbound", skip(self))]
    pub fn acquire(&mut self) -> EngineResult<AcquiredStream> {
        if let Some(previous) = self.outbound.take() {
            warn!("Replacing a live outbound stream");
            previous.stop();
        }

        let display = self
            .capture
            .acquire_display_stream()
            .map_err(EngineError::VideoUnavailable)?;

        let mut acquired: Vec<LocalTrack> = display.audio.into_iter().collect();

        let Some(video) = display.video else {
            rollback(&acquired);
            return Err(EngineError::VideoUnavailable(CaptureError::NoVideoTrack));
        };

        let mut warnings = Vec::new();
        match self.capture.acquire_microphone() {
            Ok(mic) => {
                debug!(track = mic.id(), "Microphone acquired");
                acquired.push(mic);
            }
            Err(e) => {
                warn!("Microphone unavailable, sharing video-only: {}", e);
                warnings.push(WarningType::MicrophoneUnavailable {
                    reason: e.to_string(),
                });
            }
        }

        let stream = match OutboundStream::new(video.clone(), acquired.clone()) {
            Ok(stream) => stream,
            Err(e) => {
                video.stop();
                rollback(&acquired);
                return Err(EngineError::VideoUnavailable(e));
            }
        };

        info!(
            stream_id = stream.id(),
            audio_tracks = stream.audio().len(),
            "Outbound stream acquired"
        );

        self.outbound = Some(stream.clone());
        Ok(AcquiredStream { stream, warnings })
    }

    /// The live outbound stream, if sharing.
    pub fn current(&self) -> Option<&OutboundStream> {
        self.outbound.as_ref()
    }

    /// Stop and drop the outbound stream.
    pub fn release(&mut self) -> Option<OutboundStream> {
        let stream = self.outbound.take()?;
        stream.stop();
        info!(stream_id = stream.id(), "Outbound stream released");
        Some(stream)
    }
}

fn rollback(tracks: &[LocalTrack]) {
    for track in tracks {
        track.stop();
    }
}

impl Drop for ShareResources {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_reports_previous() {
        let mut state = SessionState::new();
        assert_eq!(
            state.transition_to(SessionStatus::Connecting).unwrap(),
            Some(SessionStatus::Idle)
        );
        assert_eq!(state.transition_to(SessionStatus::Connecting).unwrap(), None);
    }

    #[test]
    fn test_illegal_transition_keeps_status() {
        let mut state = SessionState::new();
        let err = state.transition_to(SessionStatus::Sharing).unwrap_err();

        assert!(matches!(err, EngineError::InvalidTransition { from: "idle", to: "sharing" }));
        assert_eq!(state.status(), SessionStatus::Idle);
    }

    #[test]
    fn test_snapshot() {
        let mut state = SessionState::new();
        state.bind_room("room1");
        state.set_error("boom".into());

        let snapshot = state.snapshot(3);
        assert_eq!(snapshot.room_id.as_deref(), Some("room1"));
        assert_eq!(snapshot.last_error.as_deref(), Some("boom"));
        assert_eq!(snapshot.viewer_count, 3);

        state.clear_error();
        state.unbind();
        assert_eq!(state.snapshot(0), SessionSnapshot::default());
    }
}
