//! Consumer-side gallery projection.

use std::collections::HashSet;

use crate::session::ImageRecord;
use crate::sync::SyncEvent;

/// A private, eventually-consistent projection of a session's image list.
///
/// Each consumer owns one of these and feeds it every event its
/// [`Subscription`](crate::sync::Subscription) yields. Merging is
/// idempotent: an image id is appended at most once, so at-least-once
/// transports are safe, and a snapshot delivered after incremental events
/// (or vice versa) converges to the same state. No image is ever reordered
/// after insertion; position is solely determined by first-observed order.
#[derive(Debug, Default)]
pub struct GalleryProjection {
    images: Vec<ImageRecord>,
    seen: HashSet<String>,
}

impl GalleryProjection {
    /// Creates an empty projection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a full snapshot into the projection.
    ///
    /// On an empty projection this populates it; on a populated one it
    /// appends only the ids not yet observed, preserving first-observed
    /// order for the rest.
    pub fn init(&mut self, snapshot: Vec<ImageRecord>) {
        for image in snapshot {
            self.insert(image);
        }
    }

    /// Applies a single sync event.
    pub fn on_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Init { images } => self.init(images),
            SyncEvent::NewImage { image } => {
                self.insert(image);
            }
        }
    }

    /// Removes an image locally.
    ///
    /// Removal is consumer-local curation before export; it is never
    /// propagated to other consumers. The id stays in the seen set so a
    /// late duplicate delivery cannot resurrect the image.
    ///
    /// Returns `true` if the image was present.
    pub fn remove(&mut self, image_id: &str) -> bool {
        let before = self.images.len();
        self.images.retain(|img| img.id != image_id);
        self.images.len() != before
    }

    /// The materialized ordered sequence, for rendering and PDF export.
    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    /// Number of images currently projected.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the projection holds no images.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Appends the image iff its id has not been observed before.
    fn insert(&mut self, image: ImageRecord) -> bool {
        if !self.seen.insert(image.id.clone()) {
            return false;
        }
        self.images.push(image);
        true
    }
}
