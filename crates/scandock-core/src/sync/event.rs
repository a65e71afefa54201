use serde::{Deserialize, Serialize};

use crate::session::ImageRecord;

/// Events delivered to a session's consumers.
///
/// The serialized form is the wire envelope consumed by viewer clients:
/// `{ "type": "init", "images": [...] }` or
/// `{ "type": "new-image", "image": {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SyncEvent {
    /// Full snapshot of the session's current image list.
    ///
    /// Sent on subscription start and whenever a consumer may have missed
    /// incremental events; merging a snapshot is how consumers recover
    /// without permanent desync.
    Init { images: Vec<ImageRecord> },
    /// A single image appended since the last delivery.
    NewImage { image: ImageRecord },
}
