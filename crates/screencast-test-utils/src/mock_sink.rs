//! Playback sink that records what it was given.

use std::sync::Arc;

use parking_lot::Mutex;

use screencast_audio::{MixedOutput, PlaybackSink};

#[derive(Debug, Default)]
struct SinkInner {
    republished: Vec<Vec<String>>,
    muted: bool,
}

/// Records every republished mix as its contributor list.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<SinkInner>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Contributor lists of every republished mix, oldest first.
    #[must_use]
    pub fn republished(&self) -> Vec<Vec<String>> {
        self.inner.lock().republished.clone()
    }

    /// Contributors of the mix currently playing.
    #[must_use]
    pub fn current(&self) -> Vec<String> {
        self.inner.lock().republished.last().cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.inner.lock().muted
    }
}

impl PlaybackSink for RecordingSink {
    fn republish(&mut self, mix: MixedOutput) {
        self.inner.lock().republished.push(mix.contributors());
    }

    fn set_muted(&mut self, muted: bool) {
        self.inner.lock().muted = muted;
    }
}
