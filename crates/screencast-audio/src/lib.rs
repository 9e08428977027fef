//! Inbound viewer audio mixing.
//!
//! Every viewer that sends audio back to the presenter contributes one
//! [`InboundTrack`]. The [`InboundAudioMixer`] keeps the live set and
//! rebuilds a fresh [`MixedOutput`] whenever membership changes, then
//! hands it to the single [`PlaybackSink`].

mod error;
mod mixer;
mod sink;
mod track;

pub use error::AudioError;
pub use mixer::{rebuild_mix, InboundAudioMixer, MixInput, MixedOutput};
pub use sink::{ChannelSink, PlaybackSink};
pub use track::{AudioFrame, InboundTrack, MixedAudioChunk};

/// Result alias for this crate.
pub type AudioResult<T> = Result<T, AudioError>;

/// Playback is 48kHz interleaved stereo.
pub const CHANNELS: u16 = 2;

/// Frames per playback chunk, 10ms worth.
pub const SAMPLES_PER_CHUNK: usize = 480;

/// Playback chunks buffered before the pump starts dropping.
pub const AUDIO_CHANNEL_CAPACITY: usize = 8;

/// Frames buffered per inbound track.
pub const INBOUND_FRAME_CAPACITY: usize = 16;
