//! Fan-out of the outbound stream to every registered viewer.

use tracing::{debug, info, warn};

use screencast_capture::OutboundStream;
use screencast_transport::{LinkId, Transport};

use crate::error::EngineError;
use crate::metrics::StatsCollector;
use crate::registry::ViewerRegistry;
use crate::EngineResult;

/// What a call to one viewer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// The viewer's link already carries this stream.
    AlreadyCarrying,
    /// A new media link was opened.
    Opened,
    /// A new media link replaced one that carried no outbound stream.
    Replaced,
}

/// Result of one broadcast pass.
#[derive(Debug, Default)]
pub struct FanOutReport {
    /// Viewers a media link was opened to.
    pub called: Vec<String>,

    /// Subset of `called` whose previous link was hung up.
    pub replaced: Vec<String>,

    /// Viewers the transport refused, with the reason.
    pub failed: Vec<EngineError>,
}

/// Open a media link to every viewer whose link does not carry `stream`.
///
/// Viewers already carrying it are skipped, so repeated calls never
/// duplicate a link.
pub fn broadcast_stream(
    registry: &mut ViewerRegistry,
    transport: &mut dyn Transport,
    stream: &OutboundStream,
    stats: &StatsCollector,
) -> FanOutReport {
    let mut report = FanOutReport::default();

    for viewer_id in registry.ids_missing_stream(stream.id()) {
        match call_single_viewer(registry, transport, &viewer_id, stream, stats) {
            Ok(CallOutcome::AlreadyCarrying) => {}
            Ok(CallOutcome::Opened) => report.called.push(viewer_id),
            Ok(CallOutcome::Replaced) => {
                report.replaced.push(viewer_id.clone());
                report.called.push(viewer_id);
            }
            Err(e) => report.failed.push(e),
        }
    }

    info!(
        stream_id = stream.id(),
        called = report.called.len(),
        replaced = report.replaced.len(),
        failed = report.failed.len(),
        "Broadcast pass complete"
    );

    report
}

/// Open a media link carrying `stream` to one viewer.
///
/// A link the viewer opened without any outbound stream is hung up once
/// the new one is in place. On failure it is left alone.
pub fn call_single_viewer(
    registry: &mut ViewerRegistry,
    transport: &mut dyn Transport,
    viewer_id: &str,
    stream: &OutboundStream,
    stats: &StatsCollector,
) -> EngineResult<CallOutcome> {
    let record = registry
        .get_mut(viewer_id)
        .ok_or_else(|| EngineError::UnknownViewer(viewer_id.to_string()))?;

    if record.outbound_stream == Some(stream.id()) {
        debug!(viewer_id, "Viewer already receives this stream");
        return Ok(CallOutcome::AlreadyCarrying);
    }

    stats.record_media_attempt();

    match transport.call(viewer_id, stream) {
        Ok(link) => {
            let replaced = record.close_media_link();
            debug!(viewer_id, link = %link.id(), replaced, "Media link opened");
            record.media_link = Some(link);
            record.outbound_stream = Some(stream.id());
            Ok(if replaced {
                CallOutcome::Replaced
            } else {
                CallOutcome::Opened
            })
        }
        Err(source) => {
            stats.record_media_failure();
            warn!(viewer_id, "Media link failed: {}", source);
            Err(EngineError::Viewer {
                viewer_id: viewer_id.to_string(),
                source,
            })
        }
    }
}

/// Forget a media link after the transport reported it closed or errored.
///
/// Stale reports for a link that was already replaced are ignored. Returns
/// true if the record's link was removed.
pub fn detach_media_link(registry: &mut ViewerRegistry, viewer_id: &str, link_id: LinkId) -> bool {
    let Some(record) = registry.get_mut(viewer_id) else {
        return false;
    };

    if record.media_link_id() != Some(link_id) {
        debug!(viewer_id, link = %link_id, "Ignoring stale media link report");
        return false;
    }

    record.close_media_link()
}

/// Hang up every media link. Control links stay open.
pub fn close_all_media_links(registry: &mut ViewerRegistry) -> usize {
    registry
        .iter_mut()
        .map(|record| record.close_media_link())
        .filter(|closed| *closed)
        .count()
}
