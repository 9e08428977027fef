//! Mock transport and links.
//!
//! ```rust,ignore
//! let transport = MockTransport::builder().fail_call("viewer-room1-bad").build();
//! let probe = transport.clone();
//! let session = PresenterSession::new(config, Box::new(transport), ...);
//! assert_eq!(probe.calls().len(), 2);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use screencast_capture::OutboundStream;
use screencast_transport::{
    ControlLink, ControlMessage, LinkId, MediaLink, Transport, TransportError, TransportResult,
};

/// One outgoing media call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub target: String,
    pub link_id: LinkId,
    pub stream_id: u64,
}

#[derive(Debug, Default)]
struct TransportInner {
    claims: Vec<String>,
    connects: Vec<String>,
    calls: Vec<RecordedCall>,
    reconnects: u32,
    released: bool,
    closed_media: Vec<LinkId>,
    answered_media: Vec<LinkId>,
    next_link: u64,
}

impl TransportInner {
    fn next_link_id(&mut self) -> LinkId {
        self.next_link += 1;
        LinkId(self.next_link)
    }
}

/// Transport that records requests and never touches the network.
///
/// Lifecycle events are not generated; tests feed them to the session.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    fail_claim: Option<String>,
    failing_targets: HashSet<String>,
    reconnect_failures: Arc<Mutex<u32>>,
    inner: Arc<Mutex<TransportInner>>,
}

impl MockTransport {
    /// A transport on which everything succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder::default()
    }

    /// Identities claimed, in order.
    #[must_use]
    pub fn claims(&self) -> Vec<String> {
        self.inner.lock().claims.clone()
    }

    #[must_use]
    pub fn connects(&self) -> Vec<String> {
        self.inner.lock().connects.clone()
    }

    /// Successful media calls, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().calls.clone()
    }

    /// Targets of successful media calls, in order.
    #[must_use]
    pub fn call_targets(&self) -> Vec<String> {
        self.inner.lock().calls.iter().map(|c| c.target.clone()).collect()
    }

    #[must_use]
    pub fn reconnects(&self) -> u32 {
        self.inner.lock().reconnects
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.inner.lock().released
    }

    /// Media links closed so far.
    #[must_use]
    pub fn closed_media(&self) -> Vec<LinkId> {
        self.inner.lock().closed_media.clone()
    }

    #[must_use]
    pub fn answered_media(&self) -> Vec<LinkId> {
        self.inner.lock().answered_media.clone()
    }

    /// A viewer-initiated media link, as delivered by an incoming call.
    #[must_use]
    pub fn incoming_media_link(&self, peer: &str) -> MockMediaLink {
        let id = self.inner.lock().next_link_id();
        MockMediaLink {
            id,
            peer: peer.to_string(),
            closed: false,
            transport: Arc::clone(&self.inner),
        }
    }
}

impl Transport for MockTransport {
    fn claim_identity(&mut self, identity: &str) -> TransportResult<()> {
        self.inner.lock().claims.push(identity.to_string());

        match &self.fail_claim {
            Some(reason) => Err(TransportError::IdentityUnavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn connect(&mut self, target: &str) -> TransportResult<Box<dyn ControlLink>> {
        self.inner.lock().connects.push(target.to_string());
        Ok(Box::new(MockControlLink::open(target)))
    }

    fn call(
        &mut self,
        target: &str,
        stream: &OutboundStream,
    ) -> TransportResult<Box<dyn MediaLink>> {
        if self.failing_targets.contains(target) {
            return Err(TransportError::PeerUnavailable(target.to_string()));
        }

        let mut inner = self.inner.lock();
        let link_id = inner.next_link_id();
        inner.calls.push(RecordedCall {
            target: target.to_string(),
            link_id,
            stream_id: stream.id(),
        });

        Ok(Box::new(MockMediaLink {
            id: link_id,
            peer: target.to_string(),
            closed: false,
            transport: Arc::clone(&self.inner),
        }))
    }

    fn reconnect(&mut self) -> TransportResult<()> {
        self.inner.lock().reconnects += 1;

        let mut failures = self.reconnect_failures.lock();
        if *failures > 0 {
            *failures -= 1;
            return Err(TransportError::RendezvousUnreachable(
                "no route to rendezvous".to_string(),
            ));
        }
        Ok(())
    }

    fn release(&mut self) {
        self.inner.lock().released = true;
    }
}

/// Builder for [`MockTransport`].
#[derive(Debug, Default)]
pub struct MockTransportBuilder {
    transport: MockTransport,
}

impl MockTransportBuilder {
    /// Identity claims are rejected synchronously.
    #[must_use]
    pub fn fail_claim(mut self, reason: &str) -> Self {
        self.transport.fail_claim = Some(reason.to_string());
        self
    }

    /// Calls to `target` are refused.
    #[must_use]
    pub fn fail_call(mut self, target: &str) -> Self {
        self.transport.failing_targets.insert(target.to_string());
        self
    }

    /// The next `count` reconnect requests fail.
    #[must_use]
    pub fn fail_reconnects(self, count: u32) -> Self {
        *self.transport.reconnect_failures.lock() = count;
        self
    }

    #[must_use]
    pub fn build(self) -> MockTransport {
        self.transport
    }
}

/// Media link handed out by [`MockTransport`].
#[derive(Debug)]
pub struct MockMediaLink {
    id: LinkId,
    peer: String,
    closed: bool,
    transport: Arc<Mutex<TransportInner>>,
}

impl MediaLink for MockMediaLink {
    fn id(&self) -> LinkId {
        self.id
    }

    fn peer(&self) -> &str {
        &self.peer
    }

    fn answer(&mut self, _stream: Option<&OutboundStream>) -> TransportResult<()> {
        self.transport.lock().answered_media.push(self.id);
        Ok(())
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.transport.lock().closed_media.push(self.id);
    }
}

#[derive(Debug)]
struct ControlInner {
    open: bool,
    closed: bool,
    sent: Vec<String>,
}

/// Control link whose clones share state, so a test can keep a probe.
#[derive(Debug, Clone)]
pub struct MockControlLink {
    peer: String,
    inner: Arc<Mutex<ControlInner>>,
}

impl MockControlLink {
    /// A link that accepts messages.
    #[must_use]
    pub fn open(peer: &str) -> Self {
        Self {
            peer: peer.to_string(),
            inner: Arc::new(Mutex::new(ControlInner {
                open: true,
                closed: false,
                sent: Vec::new(),
            })),
        }
    }

    /// Flip deliverability without closing.
    pub fn set_open(&self, open: bool) {
        self.inner.lock().open = open;
    }

    /// Returns true once the session closed the link.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Raw payloads delivered, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<String> {
        self.inner.lock().sent.clone()
    }

    /// Delivered payloads, decoded.
    ///
    /// # Panics
    ///
    /// Panics if a payload is not a known control message.
    #[must_use]
    pub fn sent_messages(&self) -> Vec<ControlMessage> {
        self.sent()
            .iter()
            .map(|payload| {
                ControlMessage::decode(payload)
                    .expect("control payload should decode")
                    .expect("control payload should be a known message")
            })
            .collect()
    }

    #[must_use]
    pub fn boxed(&self) -> Box<dyn ControlLink> {
        Box::new(self.clone())
    }
}

impl ControlLink for MockControlLink {
    fn peer(&self) -> &str {
        &self.peer
    }

    fn is_open(&self) -> bool {
        let inner = self.inner.lock();
        inner.open && !inner.closed
    }

    fn send(&mut self, payload: &str) -> TransportResult<()> {
        let mut inner = self.inner.lock();
        if !inner.open || inner.closed {
            return Err(TransportError::LinkNotOpen);
        }
        inner.sent.push(payload.to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.inner.lock().closed = true;
    }
}
