//! Peer transport interface and control-link protocol.
//!
//! The presenter core never negotiates peer connections itself. It talks
//! to a [`Transport`] that claims identities on the rendezvous, hands out
//! [`ControlLink`]s and [`MediaLink`]s, and reports everything that
//! happens to them as [`TransportEvent`]s on a channel.

mod connection;
mod control;
mod error;
mod link;

pub use connection::{ConnectionState, ReconnectPolicy, ScheduledAttempt};
pub use control::{ControlKind, ControlMessage, ViewerControlState};
pub use error::TransportError;
pub use link::{ControlLink, LinkId, MediaLink, Transport, TransportEvent};

use crossbeam_channel::{Receiver, Sender};

/// Channel capacity for transport events.
pub const TRANSPORT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Maximum reconnection attempts.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Base reconnect delay in milliseconds.
pub const BASE_RECONNECT_DELAY_MS: u64 = 1000;

/// Creates a bounded transport event channel.
pub fn transport_event_channel() -> (Sender<TransportEvent>, Receiver<TransportEvent>) {
    crossbeam_channel::bounded(TRANSPORT_EVENT_CHANNEL_CAPACITY)
}
