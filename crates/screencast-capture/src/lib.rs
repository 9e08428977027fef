//! Local screen and microphone capture interface.
//!
//! The presenter engine does not capture media itself. It asks a
//! [`MediaCapture`] implementation for a display stream and a microphone
//! track and combines them into one [`OutboundStream`].

mod error;
mod track;

pub use error::CaptureError;
pub use track::{DisplayCapture, LocalTrack, OutboundStream, TrackKind};

use crossbeam_channel::{Receiver, Sender};

/// Channel capacity for capture events.
pub const CAPTURE_EVENT_CHANNEL_CAPACITY: usize = 16;

/// Result type for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Source of local media.
///
/// Both calls may block while the user answers a permission prompt; the
/// engine calls them from its own thread.
pub trait MediaCapture: Send {
    /// Acquire the screen. The video track may be missing if the
    /// environment granted audio only.
    fn acquire_display_stream(&mut self) -> CaptureResult<DisplayCapture>;

    /// Acquire the microphone.
    fn acquire_microphone(&mut self) -> CaptureResult<LocalTrack>;
}

/// Events raised by the capture environment outside of any engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// The user ended screen capture from the environment's own affordance.
    Ended { stream_id: u64 },
}

/// Creates a bounded capture event channel.
pub fn capture_event_channel() -> (Sender<CaptureEvent>, Receiver<CaptureEvent>) {
    crossbeam_channel::bounded(CAPTURE_EVENT_CHANNEL_CAPACITY)
}
