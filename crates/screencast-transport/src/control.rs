//! Control-link message protocol.
//!
//! Messages are JSON objects `{"type": ..., "viewerId": ...}`. There is no
//! version field; decoders ignore types they do not know.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use screencast_capture::LocalTrack;

use crate::TransportResult;

/// Kind of a control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    MeetingEnded,
    ViewerMuted,
    ViewerUnmuted,
}

impl ControlKind {
    /// Wire name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MeetingEnded => "meeting-ended",
            Self::ViewerMuted => "viewer-muted",
            Self::ViewerUnmuted => "viewer-unmuted",
        }
    }

    /// Parse a wire name. Unknown names yield `None`.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "meeting-ended" => Some(Self::MeetingEnded),
            "viewer-muted" => Some(Self::ViewerMuted),
            "viewer-unmuted" => Some(Self::ViewerUnmuted),
            _ => None,
        }
    }
}

/// One control message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMessage {
    pub kind: ControlKind,
    pub viewer_id: Option<String>,
}

#[derive(Serialize)]
struct WireOut<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "viewerId", skip_serializing_if = "Option::is_none")]
    viewer_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct WireIn {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "viewerId", default)]
    viewer_id: Option<String>,
}

impl ControlMessage {
    pub fn meeting_ended() -> Self {
        Self {
            kind: ControlKind::MeetingEnded,
            viewer_id: None,
        }
    }

    pub fn viewer_muted(viewer_id: impl Into<String>) -> Self {
        Self {
            kind: ControlKind::ViewerMuted,
            viewer_id: Some(viewer_id.into()),
        }
    }

    pub fn viewer_unmuted(viewer_id: impl Into<String>) -> Self {
        Self {
            kind: ControlKind::ViewerUnmuted,
            viewer_id: Some(viewer_id.into()),
        }
    }

    /// Serialize to the JSON wire form.
    pub fn encode(&self) -> TransportResult<String> {
        let wire = WireOut {
            kind: self.kind.as_str(),
            viewer_id: self.viewer_id.as_deref(),
        };
        Ok(serde_json::to_string(&wire)?)
    }

    /// Parse the JSON wire form.
    ///
    /// Returns `Ok(None)` for a well-formed message of an unknown type.
    pub fn decode(payload: &str) -> TransportResult<Option<Self>> {
        let wire: WireIn = serde_json::from_str(payload)?;

        Ok(ControlKind::from_wire(&wire.kind).map(|kind| Self {
            kind,
            viewer_id: wire.viewer_id,
        }))
    }

    /// Whether this message targets `viewer_id`. Untargeted messages
    /// concern everyone.
    pub fn concerns(&self, viewer_id: &str) -> bool {
        self.viewer_id.as_deref().map_or(true, |id| id == viewer_id)
    }
}

/// Viewer-side interpretation of the control protocol.
///
/// Presenter mute takes precedence over the viewer's own toggle: the
/// outbound audio stays disabled while the presenter flag is set, whatever
/// the local user asks for.
#[derive(Debug)]
pub struct ViewerControlState {
    viewer_id: String,
    presenter_muted: bool,
    local_enabled: bool,
    meeting_ended: bool,
    audio: Option<LocalTrack>,
}

impl ViewerControlState {
    pub fn new(viewer_id: impl Into<String>) -> Self {
        Self {
            viewer_id: viewer_id.into(),
            presenter_muted: false,
            local_enabled: true,
            meeting_ended: false,
            audio: None,
        }
    }

    /// Attach the viewer's outbound audio track; its enabled flag follows
    /// the effective state from now on.
    pub fn bind_audio(&mut self, track: LocalTrack) {
        self.audio = Some(track);
        self.sync_track();
    }

    /// Decode and apply one payload. Malformed and unknown messages are
    /// ignored.
    pub fn receive(&mut self, payload: &str) {
        match ControlMessage::decode(payload) {
            Ok(Some(message)) => self.apply(&message),
            Ok(None) => debug!(%payload, "Ignoring unknown control message"),
            Err(e) => warn!("Ignoring malformed control message: {}", e),
        }
    }

    /// Apply one decoded message.
    pub fn apply(&mut self, message: &ControlMessage) {
        if !message.concerns(&self.viewer_id) {
            debug!(viewer_id = %self.viewer_id, "Control message for another viewer");
            return;
        }

        match message.kind {
            ControlKind::ViewerMuted => self.presenter_muted = true,
            ControlKind::ViewerUnmuted => self.presenter_muted = false,
            ControlKind::MeetingEnded => {
                info!(viewer_id = %self.viewer_id, "Meeting ended by presenter");
                self.meeting_ended = true;
                if let Some(track) = self.audio.take() {
                    track.stop();
                }
            }
        }

        self.sync_track();
    }

    /// Local user's mic toggle. Returns the resulting effective state.
    pub fn set_local_enabled(&mut self, enabled: bool) -> bool {
        self.local_enabled = enabled;
        self.sync_track();
        self.effective_audio_enabled()
    }

    /// Whether outbound audio actually flows.
    pub fn effective_audio_enabled(&self) -> bool {
        self.local_enabled && !self.presenter_muted && !self.meeting_ended
    }

    pub fn is_presenter_muted(&self) -> bool {
        self.presenter_muted
    }

    pub fn is_meeting_ended(&self) -> bool {
        self.meeting_ended
    }

    fn sync_track(&self) {
        if let Some(track) = &self.audio {
            track.set_enabled(self.effective_audio_enabled());
        }
    }
}
