//! Outbound stream fan-out and sharing lifecycle.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::Harness;
use screencast_capture::CaptureEvent;
use screencast_engine::EngineInput;
use screencast_ipc::{PresenterCommand, PresenterEvent, SessionStatus, StopReason, WarningType};
use screencast_test_utils::{test_viewer, MockCapture, MockTransport};
use screencast_transport::TransportEvent;

#[test]
fn test_start_sharing_without_viewers() {
    let mut h = Harness::ready();
    assert_eq!(h.session.status(), SessionStatus::Ready);

    h.command(PresenterCommand::StartSharing);

    assert_eq!(h.session.status(), SessionStatus::Sharing);
    assert!(h.transport.calls().is_empty());
    assert!(h.drain_events().iter().any(|e| matches!(
        e,
        PresenterEvent::StatusChanged {
            previous: SessionStatus::Ready,
            current: SessionStatus::Sharing
        }
    )));
}

#[test]
fn test_fan_out_calls_each_viewer_exactly_once() {
    let mut h = Harness::ready();
    let ids: Vec<String> = ["a1", "b2", "c3"].iter().map(|s| test_viewer(s)).collect();
    for id in &ids {
        h.join_id(id);
    }

    h.command(PresenterCommand::StartSharing);
    h.command(PresenterCommand::StartSharing);

    let mut targets = h.transport.call_targets();
    targets.sort();
    assert_eq!(targets, ids);

    for id in &ids {
        assert!(h.media_link_id(id).is_some());
    }
    assert_eq!(h.session.stats_snapshot(h.now).media_link_attempts, 3);
}

#[test]
fn test_each_share_transition_calls_again() {
    let mut h = Harness::ready();
    let id = test_viewer("a1");
    h.join_id(&id);

    h.command(PresenterCommand::StartSharing);
    let first = h.media_link_id(&id).unwrap();

    h.command(PresenterCommand::StopSharing);
    assert_eq!(h.session.status(), SessionStatus::Ready);
    assert!(h.media_link_id(&id).is_none());
    assert_eq!(h.transport.closed_media(), vec![first]);

    h.command(PresenterCommand::StartSharing);
    assert_eq!(h.transport.call_targets(), vec![id.clone(), id.clone()]);
    assert_ne!(h.media_link_id(&id), Some(first));
}

#[test]
fn test_late_joiner_is_called_in_the_same_turn() {
    let mut h = Harness::ready();
    h.command(PresenterCommand::StartSharing);
    assert!(h.transport.calls().is_empty());

    let id = test_viewer("late01");
    h.join_id(&id);

    assert_eq!(h.transport.call_targets(), vec![id.clone()]);
    assert_eq!(h.media_link_id(&id), Some(h.transport.calls()[0].link_id));
}

#[test]
fn test_closed_media_link_is_detached_not_retried() {
    let mut h = Harness::ready();
    let id = test_viewer("a1");
    h.join_id(&id);
    h.command(PresenterCommand::StartSharing);
    let link_id = h.media_link_id(&id).unwrap();

    h.event(TransportEvent::MediaLinkErrored {
        viewer_id: id.clone(),
        link_id,
        message: "dtls failed".into(),
    });

    assert!(h.media_link_id(&id).is_none());
    assert!(h.session.registry().contains(&id));
    assert_eq!(h.transport.calls().len(), 1);
    assert!(h.drain_events().iter().any(|e| matches!(
        e,
        PresenterEvent::Warning(WarningType::MediaLinkFailed { viewer_id, .. }) if *viewer_id == id
    )));
}

#[test]
fn test_stale_media_link_report_is_ignored() {
    let mut h = Harness::ready();
    let id = test_viewer("a1");
    h.join_id(&id);
    h.command(PresenterCommand::StartSharing);
    let link_id = h.media_link_id(&id).unwrap();

    h.event(TransportEvent::MediaLinkClosed {
        viewer_id: id.clone(),
        link_id: screencast_transport::LinkId(link_id.0 + 100),
    });

    assert_eq!(h.media_link_id(&id), Some(link_id));
}

#[test]
fn test_refused_call_stays_contained_to_one_viewer() {
    let bad = test_viewer("bad000");
    let good = test_viewer("good00");
    let transport = MockTransport::builder().fail_call(&bad).build();
    let mut h = Harness::ready_with(transport, MockCapture::new());

    h.join_id(&bad);
    h.join_id(&good);
    h.command(PresenterCommand::StartSharing);

    assert_eq!(h.session.status(), SessionStatus::Sharing);
    assert_eq!(h.transport.call_targets(), vec![good.clone()]);
    assert!(h.session.registry().contains(&bad));
    assert!(h.media_link_id(&bad).is_none());

    let stats = h.session.stats_snapshot(h.now);
    assert_eq!(stats.media_link_attempts, 2);
    assert_eq!(stats.media_link_failures, 1);

    assert!(h.drain_events().iter().any(|e| matches!(
        e,
        PresenterEvent::Warning(WarningType::MediaLinkFailed { viewer_id, .. }) if *viewer_id == bad
    )));
}

#[test]
fn test_video_denied_keeps_ready() {
    let capture = MockCapture::builder().deny_video().build();
    let mut h = Harness::ready_with(MockTransport::new(), capture);
    h.join_id(&test_viewer("a1"));

    h.command(PresenterCommand::StartSharing);

    assert_eq!(h.session.status(), SessionStatus::Ready);
    assert!(h.transport.calls().is_empty());
    assert!(h.drain_events().iter().any(|e| matches!(
        e,
        PresenterEvent::Error { recoverable: true, message } if message.contains("Permission denied")
    )));
}

#[test]
fn test_missing_video_track_releases_display_audio() {
    let capture = MockCapture::builder()
        .without_video_track()
        .with_display_audio()
        .build();
    let mut h = Harness::ready_with(MockTransport::new(), capture);

    h.command(PresenterCommand::StartSharing);

    assert_eq!(h.session.status(), SessionStatus::Ready);
    assert_eq!(h.capture.tracks().len(), 1);
    assert!(h.capture.all_stopped());
    assert_eq!(h.capture.microphone_requests(), 0);
}

#[test]
fn test_microphone_denied_degrades_to_video_only() {
    let capture = MockCapture::builder().deny_microphone().build();
    let mut h = Harness::ready_with(MockTransport::new(), capture);
    let id = test_viewer("a1");
    h.join_id(&id);

    h.command(PresenterCommand::StartSharing);

    assert_eq!(h.session.status(), SessionStatus::Sharing);
    assert_eq!(h.transport.call_targets(), vec![id]);
    assert!(h.drain_events().iter().any(|e| matches!(
        e,
        PresenterEvent::Warning(WarningType::MicrophoneUnavailable { .. })
    )));
}

#[test]
fn test_capture_ended_behaves_like_stop() {
    let mut h = Harness::ready();
    let id = test_viewer("a1");
    h.join_id(&id);
    h.command(PresenterCommand::StartSharing);
    let stream_id = h.transport.calls()[0].stream_id;

    h.session.dispatch(
        EngineInput::Capture(CaptureEvent::Ended {
            stream_id: stream_id + 1,
        }),
        h.now,
    );
    assert_eq!(h.session.status(), SessionStatus::Sharing);

    h.session
        .dispatch(EngineInput::Capture(CaptureEvent::Ended { stream_id }), h.now);

    assert_eq!(h.session.status(), SessionStatus::Ready);
    assert!(h.media_link_id(&id).is_none());
    assert!(h.capture.all_stopped());
    assert!(h.drain_events().iter().any(|e| matches!(
        e,
        PresenterEvent::SharingStopped {
            reason: StopReason::CaptureEnded
        }
    )));
}

#[test]
fn test_start_sharing_requires_ready() {
    let mut h = Harness::new();

    h.command(PresenterCommand::StartSharing);

    assert_eq!(h.session.status(), SessionStatus::Idle);
    assert_eq!(h.capture.display_requests(), 0);
    assert!(h
        .drain_events()
        .iter()
        .any(|e| matches!(e, PresenterEvent::Error { recoverable: true, .. })));
}

#[test]
fn test_incoming_media_call_is_answered_once() {
    let mut h = Harness::ready();
    let id = test_viewer("a1");
    h.join_id(&id);

    let first = h.transport.incoming_media_link(&id);
    let first_id = screencast_transport::MediaLink::id(&first);
    h.event(TransportEvent::IncomingMediaCall {
        viewer_id: id.clone(),
        link: Box::new(first),
    });

    let second = h.transport.incoming_media_link(&id);
    let second_id = screencast_transport::MediaLink::id(&second);
    h.event(TransportEvent::IncomingMediaCall {
        viewer_id: id.clone(),
        link: Box::new(second),
    });

    assert_eq!(h.media_link_id(&id), Some(first_id));
    assert_eq!(h.transport.answered_media(), vec![first_id]);
    assert_eq!(h.transport.closed_media(), vec![second_id]);

    let stranger = h.transport.incoming_media_link("viewer-room1-zzzzzz");
    let stranger_id = screencast_transport::MediaLink::id(&stranger);
    h.event(TransportEvent::IncomingMediaCall {
        viewer_id: "viewer-room1-zzzzzz".into(),
        link: Box::new(stranger),
    });
    assert!(h.transport.closed_media().contains(&stranger_id));
}

#[test]
fn test_viewer_called_before_sharing_still_gets_the_stream() {
    let mut h = Harness::ready();
    let a = test_viewer("a1");
    let b = test_viewer("b2");
    h.join_id(&a);
    h.join_id(&b);

    let early = h.transport.incoming_media_link(&a);
    let early_id = screencast_transport::MediaLink::id(&early);
    h.event(TransportEvent::IncomingMediaCall {
        viewer_id: a.clone(),
        link: Box::new(early),
    });
    let _audio = h.send_audio(&a);
    assert!(h.session.mixer().contains(&a));

    h.command(PresenterCommand::StartSharing);

    assert_eq!(h.transport.call_targets(), vec![a.clone(), b.clone()]);
    assert_eq!(h.session.stats_snapshot(h.now).media_link_attempts, 2);
    assert!(h.transport.closed_media().contains(&early_id));

    let calls = h.transport.calls();
    assert_eq!(h.media_link_id(&a), Some(calls[0].link_id));
    assert!(!h.session.mixer().contains(&a));
    assert!(!h.session.registry().get(&a).unwrap().has_inbound_audio);
}

#[test]
fn test_call_answered_while_sharing_is_not_duplicated() {
    let mut h = Harness::ready();
    h.command(PresenterCommand::StartSharing);

    let id = test_viewer("a1");
    let link = h.transport.incoming_media_link(&id);
    h.join_id(&id);
    let called_id = h.media_link_id(&id).unwrap();

    h.event(TransportEvent::IncomingMediaCall {
        viewer_id: id.clone(),
        link: Box::new(link),
    });

    assert_eq!(h.transport.call_targets(), vec![id.clone()]);
    assert_eq!(h.media_link_id(&id), Some(called_id));
}
