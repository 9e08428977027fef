//! Commands sent from the UI to the engine.

use serde::{Deserialize, Serialize};

/// Commands that the presenter UI can send to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PresenterCommand {
    /// Bind the session to a room and claim the presenter identity.
    InitRoom { room_id: String },

    /// Acquire the display (and microphone) and fan the stream out to every viewer.
    StartSharing,

    /// Stop sharing and release the outbound stream.
    StopSharing,

    /// Ask one viewer to disable its outbound audio.
    MuteViewer { viewer_id: String },

    /// Release a previous presenter mute.
    UnmuteViewer { viewer_id: String },

    /// Notify every viewer that the meeting is over and drop all links.
    EndMeeting,

    /// Leave the error state and claim the identity again.
    Restart,

    /// Mute or unmute the mixed viewer audio played back locally.
    SetSpeakerMuted(bool),

    /// Request current session state.
    GetState,

    /// Tear everything down and stop the engine.
    Shutdown,
}
