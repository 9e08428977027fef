//! Playback sinks for the inbound mix.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, trace, warn};

use crate::mixer::MixedOutput;
use crate::track::MixedAudioChunk;
use crate::{AudioResult, AUDIO_CHANNEL_CAPACITY, CHANNELS, SAMPLES_PER_CHUNK};

/// The single consumer of the inbound mix.
pub trait PlaybackSink: Send {
    /// Replace whatever the sink was playing with `mix`.
    fn republish(&mut self, mix: MixedOutput);

    /// Mute or unmute playback.
    fn set_muted(&mut self, muted: bool);
}

/// Sink that pumps the current mix every 10ms on its own thread and
/// delivers interleaved chunks over a channel.
pub struct ChannelSink {
    shared: Arc<PumpShared>,
    pump: Option<JoinHandle<()>>,
}

/// State the pump thread reads on every chunk.
struct PumpShared {
    mix: RwLock<MixedOutput>,
    muted: AtomicBool,
    running: AtomicBool,
}

impl ChannelSink {
    /// Start the pump. Chunks stay silent until the sink is unmuted.
    #[instrument(name = "playback_start")]
    pub fn start() -> AudioResult<(Self, Receiver<MixedAudioChunk>)> {
        let (chunk_tx, chunk_rx) = crossbeam_channel::bounded(AUDIO_CHANNEL_CAPACITY);

        let shared = Arc::new(PumpShared {
            mix: RwLock::new(MixedOutput::empty()),
            muted: AtomicBool::new(true),
            running: AtomicBool::new(true),
        });

        let pump = thread::Builder::new()
            .name("screencast-playback".into())
            .spawn({
                let shared = Arc::clone(&shared);
                move || run_pump(&shared, &chunk_tx)
            })?;

        info!("Playback pump started");
        Ok((
            Self {
                shared,
                pump: Some(pump),
            },
            chunk_rx,
        ))
    }

    /// Stop the pump and wait for it to exit.
    pub fn stop(&mut self) {
        self.shared.running.store(false, Ordering::Release);

        let Some(pump) = self.pump.take() else {
            return;
        };
        if pump.join().is_err() {
            warn!("Playback pump panicked");
        } else {
            info!("Playback pump stopped");
        }
    }

    pub fn is_muted(&self) -> bool {
        self.shared.muted.load(Ordering::Acquire)
    }
}

impl PlaybackSink for ChannelSink {
    fn republish(&mut self, mix: MixedOutput) {
        debug!(contributors = mix.len(), "Republishing mix");
        *self.shared.mix.write() = mix;
    }

    fn set_muted(&mut self, muted: bool) {
        self.shared.muted.store(muted, Ordering::Release);
    }
}

impl Drop for ChannelSink {
    fn drop(&mut self) {
        self.stop();
    }
}

const CHUNK_PERIOD: Duration = Duration::from_millis(10);

fn run_pump(shared: &PumpShared, chunks: &Sender<MixedAudioChunk>) {
    debug!("Pump thread running");

    let mut buffer = vec![0.0f32; SAMPLES_PER_CHUNK * CHANNELS as usize];
    let origin = Instant::now();
    let mut deadline = origin;
    let mut produced = 0u64;

    while shared.running.load(Ordering::Acquire) {
        {
            let mix = shared.mix.read();
            if shared.muted.load(Ordering::Acquire) {
                // Inbound queues keep draining while muted.
                mix.drain_one();
                buffer.fill(0.0);
            } else {
                mix.mix_into(&mut buffer);
            }
        }

        let pts = pts_100ns(deadline - origin);
        let chunk = MixedAudioChunk::from_samples(&buffer, pts, produced);

        if let Err(e) = chunks.try_send(chunk) {
            if e.is_disconnected() {
                debug!("Playback receiver gone");
                break;
            }
            trace!(sequence = produced, "Playback backlog, chunk dropped");
        }

        produced += 1;
        deadline += CHUNK_PERIOD;
        if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
    }

    debug!(chunks = produced, "Pump thread exiting");
}

fn pts_100ns(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_nanos() / 100).unwrap_or(u64::MAX)
}
