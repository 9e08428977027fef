//! Events sent from the engine to the UI.

use serde::{Deserialize, Serialize};

use crate::state::{SessionSnapshot, SessionStatus, StopReason};
use crate::types::{ActivityEvent, SessionStats, ViewerSnapshot, WarningType};

/// Events that the engine can send to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PresenterEvent {
    /// Session status has changed.
    StatusChanged {
        /// Previous status.
        previous: SessionStatus,

        /// Current status.
        current: SessionStatus,
    },

    /// The presenter identity is claimed and viewers can use this link.
    ShareableLink(String),

    /// A viewer's control link opened.
    ViewerJoined { viewer_id: String, viewer_count: usize },

    /// A viewer's control link closed or errored.
    ViewerLeft { viewer_id: String, viewer_count: usize },

    /// Full viewer list after any registry change, sorted by id.
    Viewers(Vec<ViewerSnapshot>),

    /// The bounded activity log after it changed.
    Activity(Vec<ActivityEvent>),

    /// The inbound mix was rebuilt with these contributors.
    MixChanged { contributors: Vec<String> },

    /// Sharing stopped.
    SharingStopped { reason: StopReason },

    /// Session counters.
    Stats(SessionStats),

    /// Answer to `GetState`.
    State(SessionSnapshot),

    /// Non-fatal degradation.
    Warning(WarningType),

    /// Error occurred.
    Error {
        /// Whether the error is recoverable.
        recoverable: bool,

        /// Error message.
        message: String,
    },

    /// Engine is ready.
    Ready,

    /// Engine has shut down.
    Shutdown,
}
