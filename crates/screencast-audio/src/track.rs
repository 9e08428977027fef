//! Inbound audio tracks and mixed output chunks.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::{BufMut, Bytes, BytesMut};
use crossbeam_channel::{Receiver, Sender};

use crate::INBOUND_FRAME_CAPACITY;

static NEXT_INBOUND_ID: AtomicU64 = AtomicU64::new(1);

/// One block of interleaved f32 stereo samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    pub samples: Vec<f32>,
}

impl AudioFrame {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// A frame with every sample set to `value`.
    pub fn constant(value: f32, len: usize) -> Self {
        Self {
            samples: vec![value; len],
        }
    }
}

/// Audio received from one viewer.
///
/// Cloning shares the underlying frame queue.
#[derive(Debug, Clone)]
pub struct InboundTrack {
    id: u64,
    label: String,
    frames: Receiver<AudioFrame>,
}

impl InboundTrack {
    /// Wrap an existing frame receiver.
    pub fn new(label: impl Into<String>, frames: Receiver<AudioFrame>) -> Self {
        Self {
            id: NEXT_INBOUND_ID.fetch_add(1, Ordering::Relaxed),
            label: label.into(),
            frames,
        }
    }

    /// Create a track together with the sender that feeds it.
    pub fn channel(label: impl Into<String>) -> (Sender<AudioFrame>, Self) {
        let (tx, rx) = crossbeam_channel::bounded(INBOUND_FRAME_CAPACITY);
        (tx, Self::new(label, rx))
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Take the next frame if one is queued.
    pub fn try_next(&self) -> Option<AudioFrame> {
        self.frames.try_recv().ok()
    }
}

/// Mixed audio output chunk.
#[derive(Debug, Clone)]
pub struct MixedAudioChunk {
    /// Interleaved f32 little-endian stereo samples.
    pub data: Bytes,

    /// Presentation timestamp in 100ns units.
    pub pts_100ns: u64,

    /// Sequence number.
    pub sequence: u64,
}

impl MixedAudioChunk {
    /// Serialize samples into a chunk.
    pub fn from_samples(samples: &[f32], pts_100ns: u64, sequence: u64) -> Self {
        let mut buf = BytesMut::with_capacity(samples.len() * std::mem::size_of::<f32>());
        for &sample in samples {
            buf.put_f32_le(sample);
        }

        Self {
            data: buf.freeze(),
            pts_100ns,
            sequence,
        }
    }

    /// Decode the samples back out of the chunk.
    pub fn samples(&self) -> Vec<f32> {
        self.data
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect()
    }
}
