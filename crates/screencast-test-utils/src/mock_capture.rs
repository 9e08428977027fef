//! Mock media capture.
//!
//! ```rust,ignore
//! let capture = MockCapture::builder().deny_microphone().build();
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use screencast_capture::{
    CaptureError, CaptureResult, DisplayCapture, LocalTrack, MediaCapture, TrackKind,
};

#[derive(Debug, Default)]
struct CaptureInner {
    display_requests: u32,
    microphone_requests: u32,
    tracks: Vec<LocalTrack>,
}

/// Capture source with scripted outcomes.
#[derive(Debug, Clone)]
pub struct MockCapture {
    deny_video: bool,
    video_track: bool,
    display_audio: bool,
    deny_microphone: bool,
    inner: Arc<Mutex<CaptureInner>>,
}

impl Default for MockCapture {
    fn default() -> Self {
        Self {
            deny_video: false,
            video_track: true,
            display_audio: false,
            deny_microphone: false,
            inner: Arc::new(Mutex::new(CaptureInner::default())),
        }
    }
}

impl MockCapture {
    /// Grants screen and microphone.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> MockCaptureBuilder {
        MockCaptureBuilder::default()
    }

    #[must_use]
    pub fn display_requests(&self) -> u32 {
        self.inner.lock().display_requests
    }

    #[must_use]
    pub fn microphone_requests(&self) -> u32 {
        self.inner.lock().microphone_requests
    }

    /// Every track handed out so far.
    #[must_use]
    pub fn tracks(&self) -> Vec<LocalTrack> {
        self.inner.lock().tracks.clone()
    }

    /// Returns true if every track handed out has been stopped.
    #[must_use]
    pub fn all_stopped(&self) -> bool {
        self.inner.lock().tracks.iter().all(|t| !t.is_live())
    }

    fn issue(&self, kind: TrackKind, label: &str) -> LocalTrack {
        let track = LocalTrack::new(kind, label);
        self.inner.lock().tracks.push(track.clone());
        track
    }
}

impl MediaCapture for MockCapture {
    fn acquire_display_stream(&mut self) -> CaptureResult<DisplayCapture> {
        self.inner.lock().display_requests += 1;

        if self.deny_video {
            return Err(CaptureError::PermissionDenied("screen".to_string()));
        }

        let video = self
            .video_track
            .then(|| self.issue(TrackKind::Video, "screen"));
        let audio = self
            .display_audio
            .then(|| self.issue(TrackKind::Audio, "screen-audio"));

        Ok(DisplayCapture { video, audio })
    }

    fn acquire_microphone(&mut self) -> CaptureResult<LocalTrack> {
        self.inner.lock().microphone_requests += 1;

        if self.deny_microphone {
            return Err(CaptureError::PermissionDenied("microphone".to_string()));
        }

        Ok(self.issue(TrackKind::Audio, "microphone"))
    }
}

/// Builder for [`MockCapture`].
#[derive(Debug, Default)]
pub struct MockCaptureBuilder {
    capture: MockCapture,
}

impl MockCaptureBuilder {
    /// The screen prompt is denied.
    #[must_use]
    pub fn deny_video(mut self) -> Self {
        self.capture.deny_video = true;
        self
    }

    /// The screen prompt succeeds without a video track.
    #[must_use]
    pub fn without_video_track(mut self) -> Self {
        self.capture.video_track = false;
        self
    }

    /// The display stream carries its own audio track.
    #[must_use]
    pub fn with_display_audio(mut self) -> Self {
        self.capture.display_audio = true;
        self
    }

    #[must_use]
    pub fn deny_microphone(mut self) -> Self {
        self.capture.deny_microphone = true;
        self
    }

    #[must_use]
    pub fn build(self) -> MockCapture {
        self.capture
    }
}
