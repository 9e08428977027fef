//! Shared harness for driving a `PresenterSession` by hand.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

use screencast_audio::AudioFrame;
use screencast_engine::{EngineInput, PresenterSession};
use screencast_ipc::{presenter_identity, PresenterCommand, PresenterEvent};
use screencast_test_utils::{
    test_audio_track, test_config, MockCapture, MockControlLink, MockTransport, MockViewer,
    RecordingSink, TEST_ROOM,
};
use screencast_transport::{LinkId, TransportEvent};

pub struct Harness {
    pub session: PresenterSession,
    pub transport: MockTransport,
    pub capture: MockCapture,
    pub sink: RecordingSink,
    pub events: Receiver<PresenterEvent>,
    pub now: Instant,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(MockTransport::new(), MockCapture::new())
    }

    pub fn with(transport: MockTransport, capture: MockCapture) -> Self {
        let sink = RecordingSink::new();
        let (event_tx, events) = crossbeam_channel::unbounded();

        let session = PresenterSession::new(
            test_config(),
            Box::new(transport.clone()),
            Box::new(capture.clone()),
            Box::new(sink.clone()),
            event_tx,
        );

        Self {
            session,
            transport,
            capture,
            sink,
            events,
            now: Instant::now(),
        }
    }

    /// A session bound to the test room with its identity claimed.
    pub fn ready() -> Self {
        Self::ready_with(MockTransport::new(), MockCapture::new())
    }

    pub fn ready_with(transport: MockTransport, capture: MockCapture) -> Self {
        let mut harness = Self::with(transport, capture);
        harness.command(PresenterCommand::InitRoom {
            room_id: TEST_ROOM.to_string(),
        });
        harness.claimed();
        harness.clear_events();
        harness
    }

    pub fn command(&mut self, command: PresenterCommand) -> bool {
        self.session.dispatch(EngineInput::Command(command), self.now)
    }

    pub fn event(&mut self, event: TransportEvent) {
        self.session.dispatch(EngineInput::Transport(event), self.now);
    }

    pub fn claimed(&mut self) {
        self.event(TransportEvent::IdentityClaimed {
            identity: presenter_identity(TEST_ROOM),
        });
    }

    /// Offer and open a control link for `viewer`.
    pub fn join(&mut self, viewer: &MockViewer) {
        self.event(TransportEvent::IncomingControlLink {
            viewer_id: viewer.id().to_string(),
            link: viewer.control_link(),
        });
        self.event(TransportEvent::ControlLinkOpened {
            viewer_id: viewer.id().to_string(),
        });
    }

    /// Join with a bare link and return a probe for it.
    pub fn join_id(&mut self, viewer_id: &str) -> MockControlLink {
        let link = MockControlLink::open(viewer_id);
        self.event(TransportEvent::IncomingControlLink {
            viewer_id: viewer_id.to_string(),
            link: link.boxed(),
        });
        self.event(TransportEvent::ControlLinkOpened {
            viewer_id: viewer_id.to_string(),
        });
        link
    }

    pub fn leave(&mut self, viewer_id: &str) {
        self.event(TransportEvent::ControlLinkClosed {
            viewer_id: viewer_id.to_string(),
        });
    }

    pub fn media_link_id(&self, viewer_id: &str) -> Option<LinkId> {
        self.session
            .registry()
            .get(viewer_id)
            .and_then(|record| record.media_link_id())
    }

    /// Deliver an inbound audio track on the viewer's current media link.
    pub fn send_audio(&mut self, viewer_id: &str) -> Sender<AudioFrame> {
        let link_id = self
            .media_link_id(viewer_id)
            .expect("viewer should have a media link");
        let (tx, track) = test_audio_track(viewer_id);

        self.event(TransportEvent::StreamReceived {
            viewer_id: viewer_id.to_string(),
            link_id,
            audio: Some(track),
        });
        tx
    }

    /// Move the clock forward and tick.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
        self.session.dispatch(EngineInput::Tick, self.now);
    }

    pub fn drain_events(&self) -> Vec<PresenterEvent> {
        self.events.try_iter().collect()
    }

    pub fn clear_events(&self) {
        while self.events.try_recv().is_ok() {}
    }
}
