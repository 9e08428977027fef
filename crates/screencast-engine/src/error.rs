//! Error types for the engine.

use thiserror::Error;

use screencast_capture::CaptureError;
use screencast_ipc::IdentityError;
use screencast_transport::TransportError;

/// How far an error reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Fatal to the whole session; drives `status = error`.
    Session,

    /// Contained to one viewer.
    Viewer,

    /// Local media could not be acquired.
    Media,

    /// The request does not apply in the current state.
    Request,
}

/// Errors raised by the presenter engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Presenter identity could not be claimed or kept.
    #[error("Session transport failure: {0}")]
    Session(TransportError),

    /// Transport failure local to one viewer.
    #[error("Viewer {viewer_id}: {source}")]
    Viewer {
        viewer_id: String,
        #[source]
        source: TransportError,
    },

    /// Screen capture denied or missing a video track.
    #[error("Screen capture unavailable: {0}")]
    VideoUnavailable(#[source] CaptureError),

    /// Room id or origin rejected.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Operation not valid in the current status.
    #[error("Cannot {operation} while {status}")]
    InvalidState {
        operation: &'static str,
        status: &'static str,
    },

    /// Illegal status change.
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    /// No viewer with this id is registered.
    #[error("Unknown viewer: {0}")]
    UnknownViewer(String),
}

impl EngineError {
    /// Classify this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Session(_) => ErrorClass::Session,
            Self::Viewer { .. } | Self::UnknownViewer(_) => ErrorClass::Viewer,
            Self::VideoUnavailable(_) => ErrorClass::Media,
            Self::Identity(_) | Self::InvalidState { .. } | Self::InvalidTransition { .. } => {
                ErrorClass::Request
            }
        }
    }

    /// Only session errors block the UI and need a restart.
    pub fn is_session_fatal(&self) -> bool {
        self.class() == ErrorClass::Session
    }
}
