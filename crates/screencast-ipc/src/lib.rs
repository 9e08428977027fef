//! Typed UI<->Engine messages for the screencast presenter.
//!
//! This crate defines the message types exchanged between a presenter UI
//! and the session engine, plus the identity scheme shared with viewers.

mod commands;
mod events;
mod identity;
mod state;
mod types;

pub use commands::PresenterCommand;
pub use events::PresenterEvent;
pub use identity::{
    generate_viewer_identity, presenter_identity, room_id_from_link, shareable_link,
    validate_room_id, viewer_identity, IdentityError, PRESENTER_PREFIX, VIEWER_PREFIX,
};
pub use state::{SessionSnapshot, SessionStatus, StopReason};
pub use types::{
    ActivityEvent, ActivityKind, SessionConfig, SessionStats, ViewerSnapshot, WarningType,
};

use crossbeam_channel::{Receiver, Sender};

/// Channel capacity for commands (UI → Engine).
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Channel capacity for events (Engine → UI).
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Creates a bounded command channel.
pub fn command_channel() -> (Sender<PresenterCommand>, Receiver<PresenterCommand>) {
    crossbeam_channel::bounded(COMMAND_CHANNEL_CAPACITY)
}

/// Creates a bounded event channel.
pub fn event_channel() -> (Sender<PresenterEvent>, Receiver<PresenterEvent>) {
    crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY)
}
