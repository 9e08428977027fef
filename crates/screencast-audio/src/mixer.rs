//! Mix graph construction and the inbound track set.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument};

use crate::sink::PlaybackSink;
use crate::track::InboundTrack;

/// One contributor of a mix.
#[derive(Debug, Clone)]
pub struct MixInput {
    pub viewer_id: String,
    pub track: InboundTrack,
}

/// A summation graph over a fixed set of inbound tracks.
///
/// Never patched in place; a membership change produces a new value via
/// [`rebuild_mix`].
#[derive(Debug, Clone, Default)]
pub struct MixedOutput {
    inputs: Vec<MixInput>,
}

impl MixedOutput {
    /// The silent mix.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Viewer ids contributing to this mix, sorted.
    pub fn contributors(&self) -> Vec<String> {
        self.inputs.iter().map(|i| i.viewer_id.clone()).collect()
    }

    pub fn inputs(&self) -> &[MixInput] {
        &self.inputs
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Returns true when nothing feeds the mix.
    pub fn is_silent(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Mix one frame from every input into `buffer`.
    ///
    /// The buffer is zeroed first, so an empty mix yields silence. Inputs
    /// with no queued frame contribute nothing this round.
    pub fn mix_into(&self, buffer: &mut [f32]) {
        buffer.fill(0.0);

        for input in &self.inputs {
            if let Some(frame) = input.track.try_next() {
                for (out, &sample) in buffer.iter_mut().zip(frame.samples.iter()) {
                    *out += sample;
                }
            }
        }

        for sample in buffer.iter_mut() {
            *sample = soft_clip(*sample);
        }
    }

    /// Pull and discard one frame from every input.
    pub fn drain_one(&self) {
        for input in &self.inputs {
            let _ = input.track.try_next();
        }
    }
}

/// Build a fresh mix over exactly `tracks`.
pub fn rebuild_mix(tracks: &BTreeMap<String, InboundTrack>) -> MixedOutput {
    MixedOutput {
        inputs: tracks
            .iter()
            .map(|(viewer_id, track)| MixInput {
                viewer_id: viewer_id.clone(),
                track: track.clone(),
            })
            .collect(),
    }
}

/// Keeps the inbound audio set and republishes a rebuilt mix to the
/// playback sink on every membership change.
pub struct InboundAudioMixer {
    tracks: BTreeMap<String, InboundTrack>,
    current: MixedOutput,
    sink: Box<dyn PlaybackSink>,
    speaker_muted: bool,
    rebuilds: u64,
}

impl InboundAudioMixer {
    /// Create a mixer over an empty set. Playback starts muted.
    pub fn new(mut sink: Box<dyn PlaybackSink>) -> Self {
        sink.set_muted(true);
        sink.republish(MixedOutput::empty());

        Self {
            tracks: BTreeMap::new(),
            current: MixedOutput::empty(),
            sink,
            speaker_muted: true,
            rebuilds: 0,
        }
    }

    /// Record `viewer_id`'s audio and rebuild. Replaces any previous track
    /// of the same viewer.
    #[instrument(name = "mixer_add", skip(self, track))]
    pub fn add_track(&mut self, viewer_id: &str, track: InboundTrack) {
        if let Some(previous) = self.tracks.insert(viewer_id.to_string(), track) {
            debug!(previous = previous.id(), "Replacing inbound track");
        }
        self.rebuild();
    }

    /// Drop `viewer_id`'s audio. Rebuilds only if it was present.
    #[instrument(name = "mixer_remove", skip(self))]
    pub fn remove_track(&mut self, viewer_id: &str) -> bool {
        if self.tracks.remove(viewer_id).is_none() {
            return false;
        }
        self.rebuild();
        true
    }

    /// Drop every track.
    pub fn clear(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.tracks.clear();
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let mix = rebuild_mix(&self.tracks);
        self.rebuilds += 1;

        info!(
            contributors = mix.len(),
            rebuilds = self.rebuilds,
            "Inbound mix rebuilt"
        );

        self.sink.republish(mix.clone());
        self.current = mix;
    }

    /// Mute or unmute local playback. The graph is untouched.
    pub fn set_speaker_muted(&mut self, muted: bool) {
        self.speaker_muted = muted;
        self.sink.set_muted(muted);
    }

    pub fn is_speaker_muted(&self) -> bool {
        self.speaker_muted
    }

    pub fn contains(&self, viewer_id: &str) -> bool {
        self.tracks.contains_key(viewer_id)
    }

    /// Current contributors, sorted.
    pub fn contributors(&self) -> Vec<String> {
        self.current.contributors()
    }

    pub fn current(&self) -> &MixedOutput {
        &self.current
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

/// Bend samples past full scale back under it.
fn soft_clip(sample: f32) -> f32 {
    if sample > 1.0 {
        1.0 - (-sample + 1.0).exp() * 0.5
    } else if sample < -1.0 {
        -1.0 + (sample + 1.0).exp() * 0.5
    } else {
        sample
    }
}
