//! Error types for the capture module.

use thiserror::Error;

/// Errors that can occur while acquiring local media.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// The user or environment denied access.
    #[error("Permission denied for {0}")]
    PermissionDenied(String),

    /// No capture device is available.
    #[error("Capture device not found: {0}")]
    DeviceNotFound(String),

    /// The display stream came back without a video track.
    #[error("Display stream has no video track")]
    NoVideoTrack,

    /// The user dismissed the picker.
    #[error("Capture request aborted")]
    Aborted,

    /// Capture is not supported in this environment.
    #[error("Capture not supported: {0}")]
    NotSupported(String),
}
