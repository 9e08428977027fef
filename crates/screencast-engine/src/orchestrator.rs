//! Engine run loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{never, select, Receiver, Sender};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use screencast_capture::CaptureEvent;
use screencast_ipc::{PresenterCommand, PresenterEvent, SessionConfig, SessionSnapshot};
use screencast_transport::TransportEvent;

use crate::metrics::StatsCollector;
use crate::session::{EngineInput, PresenterSession};
use crate::Collaborators;

enum Wake {
    Input(EngineInput),
    CommandsClosed,
    TransportClosed,
    CaptureClosed,
    Tick,
}

/// Drives one [`PresenterSession`] from its input channels.
pub struct Engine {
    session: PresenterSession,
    command_rx: Receiver<PresenterCommand>,
    transport_rx: Receiver<TransportEvent>,
    capture_rx: Receiver<CaptureEvent>,
    event_tx: Sender<PresenterEvent>,
    tick_interval: Duration,
}

impl Engine {
    /// Create a new engine.
    pub fn new(
        config: SessionConfig,
        collaborators: Collaborators,
        command_rx: Receiver<PresenterCommand>,
        event_tx: Sender<PresenterEvent>,
    ) -> Self {
        let tick_interval = Duration::from_millis(config.tick_interval_ms.max(1));

        let session = PresenterSession::new(
            config,
            collaborators.transport,
            collaborators.capture,
            collaborators.sink,
            event_tx.clone(),
        );

        Self {
            session,
            command_rx,
            transport_rx: collaborators.transport_events,
            capture_rx: collaborators.capture_events,
            event_tx,
            tick_interval,
        }
    }

    pub fn stats(&self) -> Arc<StatsCollector> {
        self.session.stats()
    }

    pub fn shared_snapshot(&self) -> Arc<RwLock<SessionSnapshot>> {
        self.session.shared_snapshot()
    }

    /// Run the engine (blocking) until shutdown or until the command
    /// channel closes.
    #[instrument(name = "engine_run", skip(self))]
    pub fn run(&mut self) {
        info!("Engine starting");
        if let Err(e) = self.event_tx.try_send(PresenterEvent::Ready) {
            warn!("Failed to send event: {}", e);
        }

        let mut next_tick = Instant::now() + self.tick_interval;

        loop {
            let timeout = next_tick.saturating_duration_since(Instant::now());

            let wake = select! {
                recv(self.command_rx) -> msg => match msg {
                    Ok(command) => Wake::Input(EngineInput::Command(command)),
                    Err(_) => Wake::CommandsClosed,
                },
                recv(self.transport_rx) -> msg => match msg {
                    Ok(event) => Wake::Input(EngineInput::Transport(event)),
                    Err(_) => Wake::TransportClosed,
                },
                recv(self.capture_rx) -> msg => match msg {
                    Ok(event) => Wake::Input(EngineInput::Capture(event)),
                    Err(_) => Wake::CaptureClosed,
                },
                default(timeout) => Wake::Tick,
            };

            match wake {
                Wake::Input(input) => {
                    if !self.session.dispatch(input, Instant::now()) {
                        break;
                    }
                }
                Wake::CommandsClosed => {
                    info!("Command channel disconnected, shutting down");
                    self.session
                        .dispatch(EngineInput::Command(PresenterCommand::Shutdown), Instant::now());
                    break;
                }
                Wake::TransportClosed => {
                    warn!("Transport event channel closed");
                    self.transport_rx = never();
                }
                Wake::CaptureClosed => {
                    debug!("Capture event channel closed");
                    self.capture_rx = never();
                }
                Wake::Tick => {}
            }

            let now = Instant::now();
            if now >= next_tick {
                self.session.dispatch(EngineInput::Tick, now);
                next_tick = now + self.tick_interval;
            }
        }

        info!("Engine stopped");
    }
}
