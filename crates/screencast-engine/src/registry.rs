//! Viewer registry: the single source of truth for who is connected.

use std::collections::HashMap;

use tracing::debug;

use screencast_ipc::ViewerSnapshot;
use screencast_transport::{ControlLink, LinkId, MediaLink};

/// Everything the presenter tracks about one viewer.
#[derive(Debug)]
pub struct ViewerRecord {
    pub viewer_id: String,
    pub control_link: Box<dyn ControlLink>,
    pub media_link: Option<Box<dyn MediaLink>>,
    /// Outbound stream carried by `media_link`. `None` for a link the
    /// viewer opened before anything was shared.
    pub outbound_stream: Option<u64>,
    pub muted_by_presenter: bool,
    pub has_inbound_audio: bool,
}

impl ViewerRecord {
    pub fn new(viewer_id: &str, control_link: Box<dyn ControlLink>) -> Self {
        Self {
            viewer_id: viewer_id.to_string(),
            control_link,
            media_link: None,
            outbound_stream: None,
            muted_by_presenter: false,
            has_inbound_audio: false,
        }
    }

    /// Id of the current media link.
    pub fn media_link_id(&self) -> Option<LinkId> {
        self.media_link.as_ref().map(|link| link.id())
    }

    /// Hang up the media link, if any.
    pub fn close_media_link(&mut self) -> bool {
        match self.media_link.take() {
            Some(mut link) => {
                link.close();
                self.outbound_stream = None;
                self.has_inbound_audio = false;
                true
            }
            None => false,
        }
    }

    /// Close both links.
    pub fn close_links(&mut self) {
        self.close_media_link();
        self.control_link.close();
    }

    pub fn snapshot(&self) -> ViewerSnapshot {
        ViewerSnapshot {
            viewer_id: self.viewer_id.clone(),
            muted_by_presenter: self.muted_by_presenter,
            has_inbound_audio: self.has_inbound_audio,
            has_media_link: self.media_link.is_some(),
        }
    }
}

/// Viewer id → record. One record per open control link.
#[derive(Debug, Default)]
pub struct ViewerRegistry {
    viewers: HashMap<String, ViewerRecord>,
}

impl ViewerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one it replaced.
    pub fn insert(&mut self, record: ViewerRecord) -> Option<ViewerRecord> {
        debug!(viewer_id = %record.viewer_id, "Registering viewer");
        self.viewers.insert(record.viewer_id.clone(), record)
    }

    pub fn remove(&mut self, viewer_id: &str) -> Option<ViewerRecord> {
        self.viewers.remove(viewer_id)
    }

    pub fn get(&self, viewer_id: &str) -> Option<&ViewerRecord> {
        self.viewers.get(viewer_id)
    }

    pub fn get_mut(&mut self, viewer_id: &str) -> Option<&mut ViewerRecord> {
        self.viewers.get_mut(viewer_id)
    }

    pub fn contains(&self, viewer_id: &str) -> bool {
        self.viewers.contains_key(viewer_id)
    }

    pub fn len(&self) -> usize {
        self.viewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewers.is_empty()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.viewers.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Ids of viewers whose media link does not carry `stream_id`, sorted.
    pub fn ids_missing_stream(&self, stream_id: u64) -> Vec<String> {
        let mut ids: Vec<String> = self
            .viewers
            .values()
            .filter(|r| r.outbound_stream != Some(stream_id))
            .map(|r| r.viewer_id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ViewerRecord> {
        self.viewers.values_mut()
    }

    /// Remove and return every record, sorted by id.
    pub fn drain(&mut self) -> Vec<ViewerRecord> {
        let mut records: Vec<ViewerRecord> = self.viewers.drain().map(|(_, r)| r).collect();
        records.sort_by(|a, b| a.viewer_id.cmp(&b.viewer_id));
        records
    }

    /// Per-viewer view for the UI, sorted by id.
    pub fn snapshots(&self) -> Vec<ViewerSnapshot> {
        let mut snapshots: Vec<ViewerSnapshot> =
            self.viewers.values().map(ViewerRecord::snapshot).collect();
        snapshots.sort_by(|a, b| a.viewer_id.cmp(&b.viewer_id));
        snapshots
    }
}
