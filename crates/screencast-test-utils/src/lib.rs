//! # Screencast Test Utilities
//!
//! Mock collaborators for driving a presenter session without a real
//! transport, capture device or speaker.
//!
//! - `mock_transport` - transport, control links and media links that
//!   record every call
//! - `mock_capture` - configurable display/microphone source
//! - `mock_sink` - playback sink that records republished mixes
//! - `mock_viewer` - viewer end of a control link
//! - `fixtures` - room ids, viewer ids, audio tracks, config
//!
//! Every mock is a cheap clone over shared state: hand one clone to the
//! session and keep another to inspect what happened.

pub mod fixtures;
pub mod mock_capture;
pub mod mock_sink;
pub mod mock_transport;
pub mod mock_viewer;

pub use fixtures::*;
pub use mock_capture::*;
pub use mock_sink::*;
pub use mock_transport::*;
pub use mock_viewer::*;
