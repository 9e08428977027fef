//! Session state machine types.

use serde::{Deserialize, Serialize};

/// Top-level status of a presenter session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No room bound.
    #[default]
    Idle,

    /// Presenter identity claim in flight.
    Connecting,

    /// Identity claimed, no outbound stream.
    Ready,

    /// Outbound stream active.
    Sharing,

    /// Unrecoverable identity/transport failure. Needs an explicit restart.
    Error,
}

impl SessionStatus {
    /// Returns true if no room is bound.
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true while the identity claim is in flight.
    pub fn is_connecting(self) -> bool {
        matches!(self, Self::Connecting)
    }

    /// Returns true if the session is ready to share.
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns true if the outbound stream is live.
    pub fn is_sharing(self) -> bool {
        matches!(self, Self::Sharing)
    }

    /// Returns true if the session is in the error state.
    pub fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Returns true if the presenter identity is held (viewers can connect).
    pub fn has_identity(self) -> bool {
        matches!(self, Self::Ready | Self::Sharing)
    }

    /// Whether `next` is a legal successor of this status.
    ///
    /// Teardown to `Idle` is always allowed.
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        use SessionStatus::*;

        match (self, next) {
            (_, Idle) => true,
            (Idle, Connecting) => true,
            (Connecting, Ready) => true,
            (Connecting | Ready | Sharing, Error) => true,
            (Ready, Sharing) => true,
            (Sharing, Ready) => true,
            (Error, Connecting) => true,
            _ => false,
        }
    }

    /// Returns a simple string representation of the status.
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Ready => "ready",
            Self::Sharing => "sharing",
            Self::Error => "error",
        }
    }
}

/// Point-in-time view of the session, answered to `GetState`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Bound room, if any.
    pub room_id: Option<String>,

    /// Current status.
    pub status: SessionStatus,

    /// Last session-level error, kept until restart.
    pub last_error: Option<String>,

    /// Identity reported by the transport on the last successful claim.
    pub identity: Option<String>,

    /// Number of registered viewers.
    pub viewer_count: usize,
}

/// Reason for stopping the outbound stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Presenter requested stop.
    UserRequested,

    /// The environment ended screen capture out-of-band.
    CaptureEnded,

    /// The meeting was ended.
    MeetingEnded,

    /// The session failed.
    SessionError { message: String },
}

impl StopReason {
    /// Returns a display message for this reason.
    pub fn message(&self) -> String {
        match self {
            Self::UserRequested => "Sharing stopped by presenter".to_string(),
            Self::CaptureEnded => "Screen capture ended".to_string(),
            Self::MeetingEnded => "Meeting ended".to_string(),
            Self::SessionError { message } => format!("Session error: {message}"),
        }
    }
}
