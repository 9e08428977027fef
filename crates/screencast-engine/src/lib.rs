//! Presenter session core.
//!
//! This crate owns the viewer registry, fans the outbound stream out to
//! every viewer, runs the mute control protocol and keeps the inbound
//! audio mix in step with the live viewer set. All of it happens on one
//! engine thread fed by bounded channels.

mod activity;
mod control;
mod error;
mod fanout;
mod metrics;
mod orchestrator;
mod registry;
mod session;
mod state;

pub use activity::ActivityLog;
pub use control::{broadcast_meeting_ended, mute_viewer, send_control, unmute_viewer};
pub use error::{EngineError, ErrorClass};
pub use fanout::{
    broadcast_stream, call_single_viewer, close_all_media_links, detach_media_link, CallOutcome,
    FanOutReport,
};
pub use metrics::StatsCollector;
pub use orchestrator::Engine;
pub use registry::{ViewerRecord, ViewerRegistry};
pub use session::{EngineInput, PresenterSession};
pub use state::{AcquiredStream, SessionState, ShareResources};

use crossbeam_channel::{Receiver, Sender};

use screencast_audio::PlaybackSink;
use screencast_capture::{CaptureEvent, MediaCapture};
use screencast_ipc::{PresenterCommand, PresenterEvent, SessionConfig};
use screencast_transport::{Transport, TransportEvent};

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// External collaborators the engine drives.
pub struct Collaborators {
    pub transport: Box<dyn Transport>,
    pub transport_events: Receiver<TransportEvent>,
    pub capture: Box<dyn MediaCapture>,
    pub capture_events: Receiver<CaptureEvent>,
    pub sink: Box<dyn PlaybackSink>,
}

/// Create an engine instance with IPC channels.
pub fn create_engine(
    config: SessionConfig,
    collaborators: Collaborators,
    command_rx: Receiver<PresenterCommand>,
    event_tx: Sender<PresenterEvent>,
) -> Engine {
    Engine::new(config, collaborators, command_rx, event_tx)
}
