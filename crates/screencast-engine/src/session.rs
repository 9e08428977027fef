//! The presenter session dispatcher.
//!
//! Every input (UI command, transport event, capture event, timer tick)
//! is applied here, one at a time, on the engine thread. Nothing else
//! mutates the registry, the inbound audio set or the session status.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use parking_lot::RwLock;
use tracing::{debug, error, info, instrument, warn};

use screencast_audio::{InboundAudioMixer, InboundTrack, PlaybackSink};
use screencast_capture::{CaptureEvent, MediaCapture};
use screencast_ipc::{
    presenter_identity, shareable_link, validate_room_id, ActivityKind, PresenterCommand,
    PresenterEvent, SessionConfig, SessionSnapshot, SessionStats, SessionStatus, StopReason,
    ViewerSnapshot, WarningType,
};
use screencast_transport::{
    ConnectionState, ControlLink, ControlMessage, LinkId, MediaLink, ReconnectPolicy, Transport,
    TransportError, TransportEvent,
};

use crate::activity::ActivityLog;
use crate::control;
use crate::error::EngineError;
use crate::fanout;
use crate::metrics::StatsCollector;
use crate::registry::{ViewerRecord, ViewerRegistry};
use crate::state::{SessionState, ShareResources};

/// One unit of work for the dispatcher.
#[derive(Debug)]
pub enum EngineInput {
    Command(PresenterCommand),
    Transport(TransportEvent),
    Capture(CaptureEvent),
    /// Timer tick; drives activity expiry, reconnect and stats.
    Tick,
}

/// Owns all presenter state and applies inputs in order.
pub struct PresenterSession {
    config: SessionConfig,
    state: SessionState,
    connection: ConnectionState,
    reconnect_policy: ReconnectPolicy,
    reconnect_at: Option<Instant>,
    transport: Box<dyn Transport>,
    resources: ShareResources,
    registry: ViewerRegistry,
    pending: HashMap<String, Box<dyn ControlLink>>,
    mixer: InboundAudioMixer,
    activity: ActivityLog,
    stats: Arc<StatsCollector>,
    event_tx: Sender<PresenterEvent>,
    shared: Arc<RwLock<SessionSnapshot>>,
}

impl PresenterSession {
    pub fn new(
        config: SessionConfig,
        transport: Box<dyn Transport>,
        capture: Box<dyn MediaCapture>,
        sink: Box<dyn PlaybackSink>,
        event_tx: Sender<PresenterEvent>,
    ) -> Self {
        let reconnect_policy = ReconnectPolicy::from_millis(
            config.reconnect_max_attempts,
            config.reconnect_base_delay_ms,
            config.reconnect_max_delay_ms,
        );
        let activity = ActivityLog::new(
            config.activity_capacity,
            Duration::from_millis(config.activity_expiry_ms),
        );

        Self {
            config,
            state: SessionState::new(),
            connection: ConnectionState::Unclaimed,
            reconnect_policy,
            reconnect_at: None,
            transport,
            resources: ShareResources::new(capture),
            registry: ViewerRegistry::new(),
            pending: HashMap::new(),
            mixer: InboundAudioMixer::new(sink),
            activity,
            stats: Arc::new(StatsCollector::new()),
            event_tx,
            shared: Arc::new(RwLock::new(SessionSnapshot::default())),
        }
    }

    /// Apply one input. Returns false once the session has shut down.
    pub fn dispatch(&mut self, input: EngineInput, now: Instant) -> bool {
        let keep_running = match input {
            EngineInput::Command(command) => self.handle_command(command, now),
            EngineInput::Transport(event) => {
                self.handle_transport(event, now);
                true
            }
            EngineInput::Capture(event) => {
                self.handle_capture(event, now);
                true
            }
            EngineInput::Tick => {
                self.handle_tick(now);
                true
            }
        };

        *self.shared.write() = self.snapshot();
        keep_running
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error()
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn viewer_count(&self) -> usize {
        self.registry.len()
    }

    pub fn registry(&self) -> &ViewerRegistry {
        &self.registry
    }

    pub fn mixer(&self) -> &InboundAudioMixer {
        &self.mixer
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn has_pending_link(&self, viewer_id: &str) -> bool {
        self.pending.contains_key(viewer_id)
    }

    pub fn is_sharing(&self) -> bool {
        self.resources.current().is_some()
    }

    /// When the next reconnect attempt is due, if one is scheduled.
    pub fn reconnect_due_at(&self) -> Option<Instant> {
        self.reconnect_at
    }

    pub fn stats(&self) -> Arc<StatsCollector> {
        Arc::clone(&self.stats)
    }

    pub fn stats_snapshot(&self, now: Instant) -> SessionStats {
        self.stats.snapshot(self.registry.len(), now)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot(self.registry.len())
    }

    /// Snapshot refreshed after every dispatch, for readers off the
    /// engine thread.
    pub fn shared_snapshot(&self) -> Arc<RwLock<SessionSnapshot>> {
        Arc::clone(&self.shared)
    }

    pub fn viewer_snapshots(&self) -> Vec<ViewerSnapshot> {
        self.registry.snapshots()
    }

    fn handle_command(&mut self, command: PresenterCommand, now: Instant) -> bool {
        debug!(?command, "Handling command");

        match command {
            PresenterCommand::InitRoom { room_id } => self.init_room(&room_id, now),
            PresenterCommand::StartSharing => self.start_sharing(now),
            PresenterCommand::StopSharing => self.stop_sharing(StopReason::UserRequested),
            PresenterCommand::MuteViewer { viewer_id } => self.set_viewer_muted(&viewer_id, true),
            PresenterCommand::UnmuteViewer { viewer_id } => {
                self.set_viewer_muted(&viewer_id, false)
            }
            PresenterCommand::EndMeeting => self.end_meeting(now),
            PresenterCommand::Restart => self.restart(now),
            PresenterCommand::SetSpeakerMuted(muted) => {
                info!(muted, "Speaker mute changed");
                self.mixer.set_speaker_muted(muted);
            }
            PresenterCommand::GetState => {
                self.send_event(PresenterEvent::State(self.snapshot()));
                self.send_event(PresenterEvent::Stats(self.stats_snapshot(now)));
            }
            PresenterCommand::Shutdown => {
                self.shutdown(now);
                return false;
            }
        }

        true
    }

    /// Bind a room and claim the presenter identity.
    #[instrument(name = "init_room", skip(self, now))]
    fn init_room(&mut self, room_id: &str, now: Instant) {
        let status = self.state.status();
        if !status.is_idle() {
            self.reject(EngineError::InvalidState {
                operation: "initialize a room",
                status: status.name(),
            });
            return;
        }

        if let Err(e) = validate_room_id(room_id) {
            self.reject(e.into());
            return;
        }

        info!("Initializing room");
        self.state.bind_room(room_id);
        self.state.clear_error();
        self.transition(SessionStatus::Connecting);
        self.claim_identity(now);
    }

    fn claim_identity(&mut self, now: Instant) {
        let Some(room_id) = self.state.room_id() else {
            warn!("No room bound, cannot claim identity");
            return;
        };

        let identity = presenter_identity(room_id);
        self.connection = ConnectionState::Claiming;

        if let Err(e) = self.transport.claim_identity(&identity) {
            self.fail_session(e, now);
        }
    }

    /// Acquire local media and fan it out to every viewer.
    #[instrument(name = "start_sharing", skip(self, now))]
    fn start_sharing(&mut self, now: Instant) {
        let status = self.state.status();
        if status.is_sharing() {
            debug!("Already sharing, ignoring start");
            return;
        }
        if !status.is_ready() {
            self.reject(EngineError::InvalidState {
                operation: "start sharing",
                status: status.name(),
            });
            return;
        }

        let acquired = match self.resources.acquire() {
            Ok(acquired) => acquired,
            Err(e) => {
                error!("Start sharing failed: {}", e);
                self.reject(e);
                return;
            }
        };

        for warning in acquired.warnings {
            self.send_event(PresenterEvent::Warning(warning));
        }

        self.stats.start_sharing(now);
        self.transition(SessionStatus::Sharing);

        let report = fanout::broadcast_stream(
            &mut self.registry,
            self.transport.as_mut(),
            &acquired.stream,
            &self.stats,
        );
        for viewer_id in &report.replaced {
            self.drop_inbound_audio(viewer_id);
        }
        for failure in report.failed {
            self.report_viewer_error(failure);
        }

        self.emit_viewers();
    }

    /// Handles both an explicit stop and the environment ending capture.
    #[instrument(name = "stop_sharing", skip(self))]
    fn stop_sharing(&mut self, reason: StopReason) {
        if !self.state.status().is_sharing() {
            debug!("Not sharing, ignoring stop");
            return;
        }

        self.release_outbound(reason);
        self.transition(SessionStatus::Ready);
        self.emit_viewers();
    }

    /// Release the outbound stream and everything hanging off it.
    fn release_outbound(&mut self, reason: StopReason) {
        self.resources.release();

        let closed = fanout::close_all_media_links(&mut self.registry);
        debug!(closed, "Media links closed");

        let before = self.mixer.rebuild_count();
        self.mixer.clear();
        self.after_mix_change(before);

        self.stats.stop_sharing();
        info!(reason = %reason.message(), "Sharing stopped");
        self.send_event(PresenterEvent::SharingStopped { reason });
    }

    fn set_viewer_muted(&mut self, viewer_id: &str, muted: bool) {
        let result = if muted {
            control::mute_viewer(&mut self.registry, viewer_id, &self.stats)
        } else {
            control::unmute_viewer(&mut self.registry, viewer_id, &self.stats)
        };

        match result {
            Ok(()) => self.emit_viewers(),
            Err(e) => debug!("Mute request ignored: {}", e),
        }
    }

    /// Tell every viewer the meeting is over and drop all per-viewer state.
    #[instrument(name = "end_meeting", skip(self, now))]
    fn end_meeting(&mut self, now: Instant) {
        let status = self.state.status();
        if status.is_idle() {
            debug!("No room bound, nothing to end");
            return;
        }

        info!(viewers = self.registry.len(), "Ending meeting");

        let notified = control::broadcast_meeting_ended(&mut self.registry, &self.stats);
        debug!(notified, "Meeting end broadcast");

        if status.is_sharing() {
            self.release_outbound(StopReason::MeetingEnded);
            self.transition(SessionStatus::Ready);
        }

        self.teardown_viewers(now);
    }

    fn restart(&mut self, now: Instant) {
        let status = self.state.status();
        if !status.is_error() {
            self.reject(EngineError::InvalidState {
                operation: "restart",
                status: status.name(),
            });
            return;
        }

        info!("Restarting session");
        self.state.clear_error();
        self.transition(SessionStatus::Connecting);
        self.claim_identity(now);
    }

    #[instrument(name = "shutdown", skip(self, now))]
    fn shutdown(&mut self, now: Instant) {
        info!("Shutting down session");

        control::broadcast_meeting_ended(&mut self.registry, &self.stats);
        if self.state.status().is_sharing() {
            self.release_outbound(StopReason::UserRequested);
        }
        self.teardown_viewers(now);

        self.transport.release();
        self.connection = ConnectionState::Unclaimed;
        self.reconnect_at = None;

        self.state.unbind();
        self.state.clear_error();
        self.transition(SessionStatus::Idle);
        self.send_event(PresenterEvent::Shutdown);
    }

    /// A session-level failure: stop sharing, drop every viewer and park in
    /// the error state until an explicit restart.
    fn fail_session(&mut self, cause: TransportError, now: Instant) {
        let err = EngineError::Session(cause);
        let message = err.to_string();
        error!("Session failed: {}", message);

        if self.state.status().is_sharing() {
            self.release_outbound(StopReason::SessionError {
                message: message.clone(),
            });
        }
        self.teardown_viewers(now);

        self.connection = ConnectionState::Failed {
            reason: message.clone(),
        };
        self.reconnect_at = None;
        self.state.set_identity(None);
        self.state.set_error(message.clone());
        self.transition(SessionStatus::Error);

        self.send_event(PresenterEvent::Error {
            recoverable: false,
            message,
        });
    }

    /// Close every link, empty the registry and the mix.
    fn teardown_viewers(&mut self, now: Instant) {
        for (viewer_id, mut link) in self.pending.drain() {
            debug!(%viewer_id, "Discarding pending control link");
            link.close();
        }

        let records = self.registry.drain();
        let had_viewers = !records.is_empty();
        let mut remaining = records.len();

        for mut record in records {
            record.close_links();
            remaining -= 1;
            self.record_leave(&record.viewer_id, remaining, now);
        }

        let before = self.mixer.rebuild_count();
        self.mixer.clear();
        self.after_mix_change(before);

        if had_viewers {
            self.emit_viewers();
            self.emit_activity();
        }
    }

    fn handle_transport(&mut self, event: TransportEvent, now: Instant) {
        match event {
            TransportEvent::IdentityClaimed { identity } => self.on_identity_claimed(identity),
            TransportEvent::IdentityFailed { message } => {
                if self.state.status().is_idle() || self.state.status().is_error() {
                    debug!("Ignoring identity failure outside a live session");
                    return;
                }
                self.fail_session(TransportError::IdentityUnavailable(message), now);
            }
            TransportEvent::Disconnected => self.on_disconnected(now),
            TransportEvent::IncomingControlLink { viewer_id, link } => {
                self.on_incoming_control_link(viewer_id, link)
            }
            TransportEvent::ControlLinkOpened { viewer_id } => {
                self.on_control_link_opened(&viewer_id, now)
            }
            TransportEvent::ControlLinkClosed { viewer_id } => {
                self.on_control_link_gone(&viewer_id, now)
            }
            TransportEvent::ControlLinkErrored { viewer_id, message } => {
                debug!(%viewer_id, "Control link errored: {}", message);
                self.on_control_link_gone(&viewer_id, now)
            }
            TransportEvent::ControlData { viewer_id, payload } => {
                match ControlMessage::decode(&payload) {
                    Ok(Some(message)) => debug!(
                        %viewer_id,
                        kind = message.kind.as_str(),
                        "Control message from viewer"
                    ),
                    Ok(None) => debug!(%viewer_id, "Ignoring unknown control message"),
                    Err(e) => debug!(%viewer_id, "Ignoring malformed control message: {}", e),
                }
            }
            TransportEvent::IncomingMediaCall { viewer_id, link } => {
                self.on_incoming_media_call(&viewer_id, link)
            }
            TransportEvent::StreamReceived {
                viewer_id,
                link_id,
                audio,
            } => self.on_stream_received(&viewer_id, link_id, audio),
            TransportEvent::MediaLinkClosed { viewer_id, link_id } => {
                self.on_media_link_gone(&viewer_id, link_id);
            }
            TransportEvent::MediaLinkErrored {
                viewer_id,
                link_id,
                message,
            } => {
                if self.on_media_link_gone(&viewer_id, link_id) {
                    self.send_event(PresenterEvent::Warning(WarningType::MediaLinkFailed {
                        viewer_id,
                        reason: message,
                    }));
                }
            }
        }
    }

    fn on_identity_claimed(&mut self, identity: String) {
        let status = self.state.status();
        if status.is_idle() || status.is_error() {
            debug!(%identity, "Ignoring stale identity claim");
            return;
        }

        if self.connection.reconnect_attempt().is_some() {
            info!(%identity, viewers = self.registry.len(), "Identity restored after reconnect");
        } else {
            info!(%identity, "Presenter identity claimed");
        }

        self.connection = ConnectionState::Held;
        self.reconnect_at = None;
        self.state.set_identity(Some(identity));

        if status.is_connecting() {
            self.transition(SessionStatus::Ready);
            self.emit_shareable_link();
        }
    }

    fn emit_shareable_link(&mut self) {
        let Some(room_id) = self.state.room_id() else {
            return;
        };

        match shareable_link(&self.config.origin, room_id) {
            Ok(link) => self.send_event(PresenterEvent::ShareableLink(link.to_string())),
            Err(e) => warn!("Cannot build shareable link: {}", e),
        }
    }

    fn on_disconnected(&mut self, now: Instant) {
        if !self.state.status().has_identity() {
            debug!("Disconnected without a held identity");
            return;
        }

        if self.reconnect_at.is_some() {
            debug!("Reconnect already scheduled");
            return;
        }
        let attempts_made = self.connection.reconnect_attempt().unwrap_or(0);

        warn!(viewers = self.registry.len(), "Presenter identity disconnected");
        self.retry_or_fail(attempts_made, now);
    }

    fn retry_or_fail(&mut self, attempts_made: u32, now: Instant) {
        let Some(next) = self.reconnect_policy.next_attempt(attempts_made) else {
            self.fail_session(TransportError::ReconnectExhausted(attempts_made), now);
            return;
        };

        info!(
            attempt = next.attempt,
            delay_ms = next.delay.as_millis() as u64,
            "Scheduling reconnect"
        );

        self.connection = ConnectionState::Reconnecting {
            attempt: next.attempt,
        };
        self.reconnect_at = Some(now + next.delay);
        self.send_event(PresenterEvent::Warning(WarningType::Reconnecting {
            attempt: next.attempt,
            max_attempts: self.reconnect_policy.max_attempts,
        }));
    }

    fn attempt_reconnect(&mut self, now: Instant) {
        self.reconnect_at = None;

        let Some(attempt) = self.connection.reconnect_attempt() else {
            return;
        };

        debug!(attempt, "Reconnecting");
        if let Err(e) = self.transport.reconnect() {
            warn!(attempt, "Reconnect failed: {}", e);
            self.retry_or_fail(attempt, now);
        }
    }

    fn on_incoming_control_link(&mut self, viewer_id: String, link: Box<dyn ControlLink>) {
        debug!(%viewer_id, "Control link pending");
        if let Some(mut previous) = self.pending.insert(viewer_id, link) {
            previous.close();
        }
    }

    #[instrument(name = "viewer_joined", skip(self, now))]
    fn on_control_link_opened(&mut self, viewer_id: &str, now: Instant) {
        let Some(mut link) = self.pending.remove(viewer_id) else {
            debug!("No pending link, already closed");
            return;
        };

        if !self.state.status().has_identity() {
            debug!("Not accepting viewers right now");
            link.close();
            return;
        }

        if let Some(mut stale) = self.registry.remove(viewer_id) {
            info!("Viewer reconnected, replacing record");
            stale.close_links();
            self.drop_inbound_audio(viewer_id);
            self.record_leave(viewer_id, self.registry.len(), now);
        }

        self.registry.insert(ViewerRecord::new(viewer_id, link));
        self.stats.record_join();
        self.activity.record(ActivityKind::Join, viewer_id, now);

        let viewer_count = self.registry.len();
        info!(viewer_count, "Viewer joined");
        self.send_event(PresenterEvent::ViewerJoined {
            viewer_id: viewer_id.to_string(),
            viewer_count,
        });

        if let Some(stream) = self.resources.current() {
            match fanout::call_single_viewer(
                &mut self.registry,
                self.transport.as_mut(),
                viewer_id,
                stream,
                &self.stats,
            ) {
                Ok(fanout::CallOutcome::Replaced) => self.drop_inbound_audio(viewer_id),
                Ok(_) => {}
                Err(e) => self.report_viewer_error(e),
            }
        }

        self.emit_viewers();
        self.emit_activity();
    }

    fn on_control_link_gone(&mut self, viewer_id: &str, now: Instant) {
        if let Some(mut link) = self.pending.remove(viewer_id) {
            debug!(viewer_id, "Pending control link closed before opening");
            link.close();
            return;
        }

        let Some(mut record) = self.registry.remove(viewer_id) else {
            debug!(viewer_id, "Viewer already gone");
            return;
        };

        record.close_links();
        self.drop_inbound_audio(viewer_id);
        self.record_leave(viewer_id, self.registry.len(), now);
        self.emit_viewers();
        self.emit_activity();
    }

    fn on_incoming_media_call(&mut self, viewer_id: &str, mut link: Box<dyn MediaLink>) {
        let stream = self.resources.current();

        let Some(record) = self.registry.get_mut(viewer_id) else {
            debug!(viewer_id, "Media call from unknown viewer, closing");
            link.close();
            return;
        };

        if record.media_link.is_some() {
            debug!(viewer_id, link = %link.id(), "Redundant media call, closing");
            link.close();
            return;
        }

        if let Err(e) = link.answer(stream) {
            warn!(viewer_id, "Failed to answer media call: {}", e);
            link.close();
            return;
        }

        debug!(viewer_id, link = %link.id(), "Media call answered");
        record.media_link = Some(link);
        record.outbound_stream = stream.map(|s| s.id());
        self.emit_viewers();
    }

    fn on_stream_received(
        &mut self,
        viewer_id: &str,
        link_id: LinkId,
        audio: Option<InboundTrack>,
    ) {
        let Some(record) = self.registry.get_mut(viewer_id) else {
            debug!(viewer_id, "Stream from unknown viewer");
            return;
        };

        if record.media_link_id() != Some(link_id) {
            debug!(viewer_id, link = %link_id, "Stream on a stale media link");
            return;
        }

        let Some(track) = audio else {
            debug!(viewer_id, "Viewer sends no audio");
            return;
        };

        record.has_inbound_audio = true;

        let before = self.mixer.rebuild_count();
        self.mixer.add_track(viewer_id, track);
        self.after_mix_change(before);
        self.emit_viewers();
    }

    /// Returns true if the event concerned the viewer's current link.
    fn on_media_link_gone(&mut self, viewer_id: &str, link_id: LinkId) -> bool {
        if !fanout::detach_media_link(&mut self.registry, viewer_id, link_id) {
            return false;
        }

        debug!(viewer_id, link = %link_id, "Media link detached");
        self.drop_inbound_audio(viewer_id);
        self.emit_viewers();
        true
    }

    fn drop_inbound_audio(&mut self, viewer_id: &str) {
        let before = self.mixer.rebuild_count();
        self.mixer.remove_track(viewer_id);
        self.after_mix_change(before);
    }

    fn after_mix_change(&mut self, rebuilds_before: u64) {
        let rebuilds = self.mixer.rebuild_count() - rebuilds_before;
        if rebuilds == 0 {
            return;
        }

        for _ in 0..rebuilds {
            self.stats.record_mix_rebuild();
        }
        self.send_event(PresenterEvent::MixChanged {
            contributors: self.mixer.contributors(),
        });
    }

    fn handle_capture(&mut self, event: CaptureEvent, _now: Instant) {
        match event {
            CaptureEvent::Ended { stream_id } => {
                let current = self.resources.current().map(|s| s.id());
                if current != Some(stream_id) {
                    debug!(stream_id, "Capture end for a released stream");
                    return;
                }

                info!(stream_id, "Screen capture ended by the environment");
                self.stop_sharing(StopReason::CaptureEnded);
            }
        }
    }

    fn handle_tick(&mut self, now: Instant) {
        if self.activity.expire(now) > 0 {
            self.emit_activity();
        }

        if self.reconnect_at.is_some_and(|at| now >= at) {
            self.attempt_reconnect(now);
        }

        let interval = Duration::from_millis(self.config.stats_interval_ms);
        if self.state.room_id().is_some() && self.stats.report_due(now, interval) {
            self.send_event(PresenterEvent::Stats(self.stats_snapshot(now)));
            self.stats.mark_reported(now);
        }
    }

    fn record_leave(&mut self, viewer_id: &str, viewer_count: usize, now: Instant) {
        self.stats.record_leave();
        self.activity.record(ActivityKind::Leave, viewer_id, now);
        info!(viewer_id, viewer_count, "Viewer left");
        self.send_event(PresenterEvent::ViewerLeft {
            viewer_id: viewer_id.to_string(),
            viewer_count,
        });
    }

    /// Per-viewer failures are reported as warnings and never escalate.
    fn report_viewer_error(&mut self, err: EngineError) {
        match err {
            EngineError::Viewer { viewer_id, source } => {
                self.send_event(PresenterEvent::Warning(WarningType::MediaLinkFailed {
                    viewer_id,
                    reason: source.to_string(),
                }));
            }
            other => debug!("Viewer operation skipped: {}", other),
        }
    }

    /// Report a rejected request without touching the status.
    fn reject(&mut self, err: EngineError) {
        warn!("Request rejected: {}", err);
        self.send_event(PresenterEvent::Error {
            recoverable: !err.is_session_fatal(),
            message: err.to_string(),
        });
    }

    fn transition(&mut self, next: SessionStatus) {
        match self.state.transition_to(next) {
            Ok(Some(previous)) => {
                info!(previous = previous.name(), current = next.name(), "Session status changed");
                self.send_event(PresenterEvent::StatusChanged {
                    previous,
                    current: next,
                });
            }
            Ok(None) => {}
            Err(e) => warn!("{}", e),
        }
    }

    fn emit_viewers(&mut self) {
        self.send_event(PresenterEvent::Viewers(self.registry.snapshots()));
    }

    fn emit_activity(&mut self) {
        self.send_event(PresenterEvent::Activity(self.activity.events()));
    }

    fn send_event(&self, event: PresenterEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            warn!("Failed to send event: {}", e);
        }
    }
}
