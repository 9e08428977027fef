//! Transport traits and the events they report.

use std::fmt;

use screencast_audio::InboundTrack;
use screencast_capture::OutboundStream;

use crate::TransportResult;

/// Identifier of one media link, unique per transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u64);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link-{}", self.0)
    }
}

/// Low-bandwidth bidirectional channel to one peer.
pub trait ControlLink: Send + fmt::Debug {
    /// Identity of the remote peer.
    fn peer(&self) -> &str;

    /// Returns true while messages can be delivered.
    fn is_open(&self) -> bool;

    /// Send one text payload.
    fn send(&mut self, payload: &str) -> TransportResult<()>;

    /// Close the link. Closing twice is a no-op.
    fn close(&mut self);
}

/// Peer connection carrying audio/video to or from one peer.
pub trait MediaLink: Send + fmt::Debug {
    fn id(&self) -> LinkId;

    /// Identity of the remote peer.
    fn peer(&self) -> &str;

    /// Accept an incoming call, optionally sending `stream` back.
    fn answer(&mut self, _stream: Option<&OutboundStream>) -> TransportResult<()> {
        Ok(())
    }

    /// Hang up. Closing twice is a no-op.
    fn close(&mut self);
}

/// Peer-to-peer transport bound to one local identity.
///
/// Methods return as soon as the request is issued; completion and every
/// later lifecycle change is reported as a [`TransportEvent`].
pub trait Transport: Send {
    /// Claim `identity` on the rendezvous.
    fn claim_identity(&mut self, identity: &str) -> TransportResult<()>;

    /// Open a control link to `target`.
    fn connect(&mut self, target: &str) -> TransportResult<Box<dyn ControlLink>>;

    /// Start a media link sending `stream` to `target`.
    fn call(&mut self, target: &str, stream: &OutboundStream)
        -> TransportResult<Box<dyn MediaLink>>;

    /// Re-establish the rendezvous connection after a disconnect.
    fn reconnect(&mut self) -> TransportResult<()>;

    /// Drop the identity and every link.
    fn release(&mut self);
}

/// Lifecycle notifications from the transport.
#[derive(Debug)]
pub enum TransportEvent {
    /// The local identity is held. May differ from the one requested.
    IdentityClaimed { identity: String },

    /// The identity could not be claimed or was lost for good.
    IdentityFailed { message: String },

    /// Rendezvous connection dropped; links may survive.
    Disconnected,

    /// A viewer dialed in. The link is not usable before `ControlLinkOpened`.
    IncomingControlLink {
        viewer_id: String,
        link: Box<dyn ControlLink>,
    },

    ControlLinkOpened { viewer_id: String },

    ControlLinkClosed { viewer_id: String },

    ControlLinkErrored { viewer_id: String, message: String },

    /// Text received on a viewer's control link.
    ControlData { viewer_id: String, payload: String },

    /// A viewer started a media link to the presenter.
    IncomingMediaCall {
        viewer_id: String,
        link: Box<dyn MediaLink>,
    },

    /// Remote media arrived on a link. `audio` is `None` when the viewer
    /// sends no audio.
    StreamReceived {
        viewer_id: String,
        link_id: LinkId,
        audio: Option<InboundTrack>,
    },

    MediaLinkClosed { viewer_id: String, link_id: LinkId },

    MediaLinkErrored {
        viewer_id: String,
        link_id: LinkId,
        message: String,
    },
}

impl TransportEvent {
    /// The viewer this event concerns, if any.
    pub fn viewer_id(&self) -> Option<&str> {
        match self {
            Self::IdentityClaimed { .. } | Self::IdentityFailed { .. } | Self::Disconnected => None,
            Self::IncomingControlLink { viewer_id, .. }
            | Self::ControlLinkOpened { viewer_id }
            | Self::ControlLinkClosed { viewer_id }
            | Self::ControlLinkErrored { viewer_id, .. }
            | Self::ControlData { viewer_id, .. }
            | Self::IncomingMediaCall { viewer_id, .. }
            | Self::StreamReceived { viewer_id, .. }
            | Self::MediaLinkClosed { viewer_id, .. }
            | Self::MediaLinkErrored { viewer_id, .. } => Some(viewer_id),
        }
    }
}
