//! Session status machine, identity lifecycle and reconnect.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::time::Duration;

use common::Harness;
use screencast_ipc::{
    ActivityKind, PresenterCommand, PresenterEvent, SessionStatus, WarningType,
};
use screencast_test_utils::{test_viewer, MockCapture, MockTransport, MockViewer, TEST_ROOM};
use screencast_transport::{ConnectionState, TransportEvent};

#[test]
fn test_init_room_claims_presenter_identity() {
    let mut h = Harness::new();

    h.command(PresenterCommand::InitRoom {
        room_id: TEST_ROOM.into(),
    });

    assert_eq!(h.session.status(), SessionStatus::Connecting);
    assert_eq!(h.transport.claims(), vec!["presenter-room1".to_string()]);

    h.claimed();

    assert_eq!(h.session.status(), SessionStatus::Ready);
    assert_eq!(h.session.snapshot().identity.as_deref(), Some("presenter-room1"));

    let events = h.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        PresenterEvent::ShareableLink(link) if link == "https://cast.test/viewer/room1"
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        PresenterEvent::StatusChanged {
            previous: SessionStatus::Connecting,
            current: SessionStatus::Ready
        }
    )));
}

#[test]
fn test_viewer_joins_through_shareable_link() {
    let mut h = Harness::new();
    h.command(PresenterCommand::InitRoom {
        room_id: TEST_ROOM.into(),
    });
    h.claimed();

    let link = h
        .drain_events()
        .into_iter()
        .find_map(|e| match e {
            PresenterEvent::ShareableLink(link) => Some(link),
            _ => None,
        })
        .unwrap();

    let mut dialer = h.transport.clone();
    let viewer = MockViewer::from_shareable_link(&link, &mut dialer)
        .unwrap()
        .unwrap();
    h.join(&viewer);

    assert!(viewer.id().starts_with("viewer-room1-"));
    assert_eq!(h.transport.connects(), vec!["presenter-room1".to_string()]);
    assert!(h.session.registry().contains(viewer.id()));

    let mut dialer = h.transport.clone();
    assert!(MockViewer::from_shareable_link("https://cast.test/about", &mut dialer)
        .unwrap()
        .is_none());
}

#[test]
fn test_invalid_room_is_rejected() {
    let mut h = Harness::new();

    h.command(PresenterCommand::InitRoom {
        room_id: "bad room!".into(),
    });

    assert_eq!(h.session.status(), SessionStatus::Idle);
    assert!(h.transport.claims().is_empty());
    assert!(h
        .drain_events()
        .iter()
        .any(|e| matches!(e, PresenterEvent::Error { recoverable: true, .. })));
}

#[test]
fn test_second_init_is_rejected() {
    let mut h = Harness::ready();

    h.command(PresenterCommand::InitRoom {
        room_id: "other".into(),
    });

    assert_eq!(h.session.status(), SessionStatus::Ready);
    assert_eq!(h.session.snapshot().room_id.as_deref(), Some(TEST_ROOM));
}

#[test]
fn test_synchronous_claim_failure_is_a_session_error() {
    let transport = MockTransport::builder().fail_claim("taken").build();
    let mut h = Harness::with(transport, MockCapture::new());

    h.command(PresenterCommand::InitRoom {
        room_id: TEST_ROOM.into(),
    });

    assert_eq!(h.session.status(), SessionStatus::Error);
    assert!(h.session.last_error().unwrap().contains("taken"));
    assert!(h.session.connection().is_failed());
}

#[test]
fn test_identity_failure_drops_viewers_without_notice() {
    let mut h = Harness::ready();
    let link = h.join_id(&test_viewer("abc123"));
    h.command(PresenterCommand::StartSharing);

    h.event(TransportEvent::IdentityFailed {
        message: "unavailable-id".into(),
    });

    assert_eq!(h.session.status(), SessionStatus::Error);
    assert!(h.session.registry().is_empty());
    assert!(link.is_closed());
    assert!(link.sent().is_empty());
    assert!(h.capture.all_stopped());
    assert!(h.session.last_error().unwrap().contains("unavailable-id"));
    assert!(h
        .drain_events()
        .iter()
        .any(|e| matches!(e, PresenterEvent::Error { recoverable: false, .. })));

    h.command(PresenterCommand::StartSharing);
    assert_eq!(h.session.status(), SessionStatus::Error);
}

#[test]
fn test_failure_leave_events_follow_session_clock() {
    let mut h = Harness::ready();
    h.join_id(&test_viewer("abc123"));
    h.advance(Duration::from_secs(3600));
    assert!(h.session.activity().is_empty());

    h.event(TransportEvent::IdentityFailed {
        message: "gone".into(),
    });

    h.advance(Duration::from_secs(1));
    let events = h.session.activity().events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, ActivityKind::Leave);

    h.advance(Duration::from_secs(5));
    assert!(h.session.activity().is_empty());
}

#[test]
fn test_restart_reclaims_identity() {
    let mut h = Harness::ready();
    h.event(TransportEvent::IdentityFailed {
        message: "gone".into(),
    });

    h.command(PresenterCommand::Restart);

    assert_eq!(h.session.status(), SessionStatus::Connecting);
    assert_eq!(h.session.last_error(), None);
    assert_eq!(h.transport.claims().len(), 2);

    h.claimed();
    assert_eq!(h.session.status(), SessionStatus::Ready);
}

#[test]
fn test_restart_outside_error_is_rejected() {
    let mut h = Harness::ready();

    h.command(PresenterCommand::Restart);

    assert_eq!(h.session.status(), SessionStatus::Ready);
    assert_eq!(h.transport.claims().len(), 1);
}

#[test]
fn test_reconnect_keeps_registry() {
    let mut h = Harness::ready();
    let id = test_viewer("abc123");
    h.join_id(&id);
    h.command(PresenterCommand::MuteViewer {
        viewer_id: id.clone(),
    });

    h.event(TransportEvent::Disconnected);
    assert_eq!(
        *h.session.connection(),
        ConnectionState::Reconnecting { attempt: 1 }
    );
    assert!(h.drain_events().iter().any(|e| matches!(
        e,
        PresenterEvent::Warning(WarningType::Reconnecting { attempt: 1, max_attempts: 3 })
    )));

    h.event(TransportEvent::Disconnected);
    h.advance(Duration::from_millis(500));
    assert_eq!(h.transport.reconnects(), 0);

    h.advance(Duration::from_millis(500));
    assert_eq!(h.transport.reconnects(), 1);

    h.event(TransportEvent::IdentityClaimed {
        identity: "presenter-room1".into(),
    });

    assert!(h.session.connection().holds_identity());
    assert_eq!(h.session.status(), SessionStatus::Ready);
    assert!(h.session.registry().get(&id).unwrap().muted_by_presenter);
}

#[test]
fn test_reconnect_exhaustion_fails_session() {
    let transport = MockTransport::builder().fail_reconnects(3).build();
    let mut h = Harness::ready_with(transport, MockCapture::new());
    h.join_id(&test_viewer("abc123"));

    h.event(TransportEvent::Disconnected);
    h.advance(Duration::from_secs(1));
    assert_eq!(
        *h.session.connection(),
        ConnectionState::Reconnecting { attempt: 2 }
    );
    h.advance(Duration::from_secs(2));
    h.advance(Duration::from_secs(4));

    assert_eq!(h.transport.reconnects(), 3);
    assert_eq!(h.session.status(), SessionStatus::Error);
    assert!(h.session.registry().is_empty());
    assert!(h
        .session
        .last_error()
        .unwrap()
        .contains("Gave up reconnecting after 3 attempts"));
}

#[test]
fn test_get_state_reports_snapshot_and_stats() {
    let mut h = Harness::ready();
    h.join_id(&test_viewer("abc123"));
    h.clear_events();

    h.command(PresenterCommand::GetState);

    let events = h.drain_events();
    let snapshot = events
        .iter()
        .find_map(|e| match e {
            PresenterEvent::State(s) => Some(s.clone()),
            _ => None,
        })
        .expect("state event");
    assert_eq!(snapshot.status, SessionStatus::Ready);
    assert_eq!(snapshot.viewer_count, 1);
    assert_eq!(snapshot.room_id.as_deref(), Some(TEST_ROOM));
    assert!(events
        .iter()
        .any(|e| matches!(e, PresenterEvent::Stats(s) if s.viewers_joined == 1)));
}

#[test]
fn test_stats_emitted_on_interval() {
    let mut h = Harness::ready();

    h.advance(Duration::from_millis(100));
    h.advance(Duration::from_millis(100));
    h.advance(Duration::from_secs(1));

    let reports = h
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, PresenterEvent::Stats(_)))
        .count();
    assert_eq!(reports, 2);
}

#[test]
fn test_shutdown_tears_everything_down() {
    let mut h = Harness::ready();
    let link = h.join_id(&test_viewer("abc123"));
    h.command(PresenterCommand::StartSharing);

    assert!(!h.command(PresenterCommand::Shutdown));

    assert_eq!(h.session.status(), SessionStatus::Idle);
    assert!(h.session.registry().is_empty());
    assert!(h.transport.is_released());
    assert!(h.capture.all_stopped());
    assert!(link.is_closed());
    assert_eq!(link.sent().len(), 1);
    assert_eq!(h.session.snapshot().room_id, None);
    assert!(h
        .drain_events()
        .iter()
        .any(|e| matches!(e, PresenterEvent::Shutdown)));
}
