//! Viewer end of a control link.

use screencast_capture::{LocalTrack, TrackKind};
use screencast_ipc::{generate_viewer_identity, presenter_identity, room_id_from_link};
use screencast_transport::{ControlLink, Transport, TransportResult, ViewerControlState};

use crate::mock_transport::MockControlLink;

/// A viewer that applies whatever the presenter sent over its control link.
#[derive(Debug)]
pub struct MockViewer {
    viewer_id: String,
    link: MockControlLink,
    control: ViewerControlState,
    microphone: LocalTrack,
    applied: usize,
}

impl MockViewer {
    /// A viewer with an open control link and a live, enabled microphone.
    #[must_use]
    pub fn new(viewer_id: &str) -> Self {
        let microphone = LocalTrack::new(TrackKind::Audio, "viewer-microphone");
        let mut control = ViewerControlState::new(viewer_id);
        control.bind_audio(microphone.clone());

        Self {
            viewer_id: viewer_id.to_string(),
            link: MockControlLink::open(viewer_id),
            control,
            microphone,
            applied: 0,
        }
    }

    /// Join the room behind a shareable link: pick a fresh viewer identity
    /// and dial the presenter over `transport`.
    ///
    /// Returns `Ok(None)` when the link names no room.
    pub fn from_shareable_link(
        link: &str,
        transport: &mut dyn Transport,
    ) -> TransportResult<Option<Self>> {
        let Some(room_id) = room_id_from_link(link) else {
            return Ok(None);
        };

        let viewer = Self::new(&generate_viewer_identity(&room_id));
        transport.connect(&presenter_identity(&room_id))?;
        Ok(Some(viewer))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.viewer_id
    }

    /// Presenter-side handle of this viewer's control link.
    #[must_use]
    pub fn control_link(&self) -> Box<dyn ControlLink> {
        self.link.boxed()
    }

    #[must_use]
    pub fn link(&self) -> &MockControlLink {
        &self.link
    }

    /// Apply every payload delivered since the last sync.
    pub fn sync(&mut self) {
        let sent = self.link.sent();
        for payload in &sent[self.applied..] {
            self.control.receive(payload);
        }
        self.applied = sent.len();
    }

    /// The local user's mic toggle.
    pub fn toggle_microphone(&mut self, enabled: bool) -> bool {
        self.control.set_local_enabled(enabled)
    }

    #[must_use]
    pub fn control(&self) -> &ViewerControlState {
        &self.control
    }

    #[must_use]
    pub fn microphone(&self) -> &LocalTrack {
        &self.microphone
    }
}
