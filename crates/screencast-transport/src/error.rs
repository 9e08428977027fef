//! Transport errors.

use thiserror::Error;

/// Failures reported by a [`Transport`](crate::Transport) or its links.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The rendezvous refused the identity (already taken, banned, ...).
    #[error("Identity claim rejected: {0}")]
    IdentityUnavailable(String),

    #[error("Rendezvous unreachable: {0}")]
    RendezvousUnreachable(String),

    /// The target identity is not registered on the rendezvous.
    #[error("Peer {0} is not reachable")]
    PeerUnavailable(String),

    #[error("Link is not open")]
    LinkNotOpen,

    #[error("Gave up reconnecting after {0} attempts")]
    ReconnectExhausted(u32),

    /// A control payload could not be encoded or decoded.
    #[error("Malformed control message: {0}")]
    Protocol(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Protocol(err.to_string())
    }
}
