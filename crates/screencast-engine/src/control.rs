//! Presenter side of the mute control protocol.

use tracing::{debug, info, warn};

use screencast_transport::ControlMessage;

use crate::error::EngineError;
use crate::metrics::StatsCollector;
use crate::registry::{ViewerRecord, ViewerRegistry};
use crate::EngineResult;

/// Send one message over a viewer's control link.
///
/// Best effort: a link that is not open drops the message silently and
/// nothing is queued. Returns true if the message was handed to the link.
pub fn send_control(
    record: &mut ViewerRecord,
    message: &ControlMessage,
    stats: &StatsCollector,
) -> bool {
    if !record.control_link.is_open() {
        debug!(
            viewer_id = %record.viewer_id,
            kind = message.kind.as_str(),
            "Control link not open, dropping"
        );
        stats.record_control_dropped();
        return false;
    }

    let payload = match message.encode() {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Failed to encode control message: {}", e);
            stats.record_control_dropped();
            return false;
        }
    };

    match record.control_link.send(&payload) {
        Ok(()) => {
            stats.record_control_sent();
            true
        }
        Err(e) => {
            debug!(viewer_id = %record.viewer_id, "Control send failed: {}", e);
            stats.record_control_dropped();
            false
        }
    }
}

/// Ask one viewer to mute and remember it.
pub fn mute_viewer(
    registry: &mut ViewerRegistry,
    viewer_id: &str,
    stats: &StatsCollector,
) -> EngineResult<()> {
    set_presenter_mute(registry, viewer_id, true, stats)
}

/// Release a presenter mute.
pub fn unmute_viewer(
    registry: &mut ViewerRegistry,
    viewer_id: &str,
    stats: &StatsCollector,
) -> EngineResult<()> {
    set_presenter_mute(registry, viewer_id, false, stats)
}

fn set_presenter_mute(
    registry: &mut ViewerRegistry,
    viewer_id: &str,
    muted: bool,
    stats: &StatsCollector,
) -> EngineResult<()> {
    let record = registry
        .get_mut(viewer_id)
        .ok_or_else(|| EngineError::UnknownViewer(viewer_id.to_string()))?;

    let message = if muted {
        ControlMessage::viewer_muted(viewer_id)
    } else {
        ControlMessage::viewer_unmuted(viewer_id)
    };

    send_control(record, &message, stats);
    record.muted_by_presenter = muted;

    info!(viewer_id, muted, "Presenter mute updated");
    Ok(())
}

/// Tell every registered viewer the meeting is over. Returns how many
/// messages were delivered to an open link.
pub fn broadcast_meeting_ended(registry: &mut ViewerRegistry, stats: &StatsCollector) -> usize {
    let message = ControlMessage::meeting_ended();

    registry
        .iter_mut()
        .map(|record| send_control(record, &message, stats))
        .filter(|sent| *sent)
        .count()
}
