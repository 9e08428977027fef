//! Command helpers a UI binds to.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use crossbeam_channel::{RecvTimeoutError, TryRecvError};
use tracing::{debug, instrument};

use screencast_ipc::{PresenterCommand, PresenterEvent, SessionSnapshot};

use crate::PresenterHandle;

/// How long `get_state` waits for the engine to answer.
const STATE_TIMEOUT: Duration = Duration::from_secs(5);

impl PresenterHandle {
    fn send(&self, command: PresenterCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|e| anyhow!("Failed to send command: {}", e))
    }

    /// Bind a room and claim its presenter identity.
    #[instrument(skip(self))]
    pub fn init_room(&self, room_id: &str) -> Result<()> {
        debug!("init_room command");
        self.send(PresenterCommand::InitRoom {
            room_id: room_id.to_string(),
        })
    }

    /// Start sharing the screen.
    #[instrument(skip(self))]
    pub fn start_sharing(&self) -> Result<()> {
        debug!("start_sharing command");
        self.send(PresenterCommand::StartSharing)
    }

    /// Stop sharing the screen.
    #[instrument(skip(self))]
    pub fn stop_sharing(&self) -> Result<()> {
        debug!("stop_sharing command");
        self.send(PresenterCommand::StopSharing)
    }

    pub fn mute_viewer(&self, viewer_id: &str) -> Result<()> {
        self.send(PresenterCommand::MuteViewer {
            viewer_id: viewer_id.to_string(),
        })
    }

    pub fn unmute_viewer(&self, viewer_id: &str) -> Result<()> {
        self.send(PresenterCommand::UnmuteViewer {
            viewer_id: viewer_id.to_string(),
        })
    }

    pub fn end_meeting(&self) -> Result<()> {
        self.send(PresenterCommand::EndMeeting)
    }

    pub fn restart(&self) -> Result<()> {
        self.send(PresenterCommand::Restart)
    }

    /// Mute or unmute local playback of the viewer mix.
    pub fn set_speaker_muted(&self, muted: bool) -> Result<()> {
        self.send(PresenterCommand::SetSpeakerMuted(muted))
    }

    /// Ask the engine for its state and wait for the answer. Other events
    /// received meanwhile are discarded.
    pub fn get_state(&self) -> Result<SessionSnapshot> {
        self.send(PresenterCommand::GetState)?;

        let rx = self.event_rx.lock();
        loop {
            match rx.recv_timeout(STATE_TIMEOUT) {
                Ok(PresenterEvent::State(snapshot)) => return Ok(snapshot),
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) => bail!("Timeout waiting for state"),
                Err(RecvTimeoutError::Disconnected) => bail!("Event channel disconnected"),
            }
        }
    }

    /// Latest snapshot without a round trip.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.read().clone()
    }

    /// Collect all pending events without blocking.
    pub fn poll_events(&self) -> Result<Vec<PresenterEvent>> {
        let rx = self.event_rx.lock();
        let mut events = Vec::new();

        loop {
            match rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if events.is_empty() {
                        bail!("Event channel disconnected");
                    }
                    break;
                }
            }
        }

        Ok(events)
    }

    /// Tear the session down and wait for the engine thread.
    pub fn shutdown(mut self) -> Result<()> {
        self.send(PresenterCommand::Shutdown)?;
        self.join().context("Engine thread did not stop cleanly")
    }
}
