//! Sync channel trait and subscription handle.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::event::SyncEvent;
use crate::error::Result;
use crate::session::ImageRecord;

/// An abstract transport propagating image events for one session.
///
/// All implementations satisfy the same consumer-facing contract:
/// a consumer subscribed at time T eventually observes every image appended
/// at or after T, in append order, with at-least-once delivery (duplicates
/// possible, ordering preserved per-producer but not across racing
/// producers). Consumers merge events through a
/// [`GalleryProjection`](crate::gallery::GalleryProjection), which makes
/// duplicate delivery safe.
///
/// A consumer that reconnects or starts late must recover full state via
/// [`snapshot`](SyncChannel::snapshot) rather than rely solely on
/// incremental events; every subscription therefore begins with an
/// [`SyncEvent::Init`] carrying the current list.
#[async_trait]
pub trait SyncChannel: Send + Sync + std::fmt::Debug {
    /// Appends a captured image to the session and propagates it to
    /// consumers according to the transport's delivery trigger.
    async fn publish(&self, session_id: &str, image_data: String) -> Result<ImageRecord>;

    /// Opens an event feed for the session.
    ///
    /// The returned [`Subscription`] yields an initial snapshot followed by
    /// incremental events, until canceled or the channel shuts down.
    async fn subscribe(&self, session_id: &str) -> Result<Subscription>;

    /// Returns a full, current read of the session's image list.
    async fn snapshot(&self, session_id: &str) -> Result<Vec<ImageRecord>>;
}

/// A cancelable handle on a session's event feed.
///
/// Dropping the subscription tears the feed down; polling loops and
/// forwarding tasks observe the cancellation token and stop.
pub struct Subscription {
    events: mpsc::Receiver<SyncEvent>,
    cancel: CancellationToken,
}

impl Subscription {
    /// Wraps a receiver and the token controlling its producing task.
    pub fn new(events: mpsc::Receiver<SyncEvent>, cancel: CancellationToken) -> Self {
        Self { events, cancel }
    }

    /// Waits for the next event.
    ///
    /// Returns `None` once the feed is closed (cancellation or transport
    /// shutdown).
    pub async fn next_event(&mut self) -> Option<SyncEvent> {
        self.events.recv().await
    }

    /// Cancels the feed. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the feed has been canceled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ImageRecord;

    #[tokio::test]
    async fn test_subscription_yields_buffered_events() {
        let (tx, rx) = mpsc::channel(4);
        let mut sub = Subscription::new(rx, CancellationToken::new());

        let image = ImageRecord::new("data:,x".to_string());
        tx.send(SyncEvent::NewImage {
            image: image.clone(),
        })
        .await
        .unwrap();
        drop(tx);

        match sub.next_event().await {
            Some(SyncEvent::NewImage { image: got }) => assert_eq!(got.id, image.id),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(sub.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_drop_cancels_token() {
        let (_tx, rx) = mpsc::channel::<SyncEvent>(1);
        let cancel = CancellationToken::new();
        let sub = Subscription::new(rx, cancel.clone());

        assert!(!cancel.is_cancelled());
        drop(sub);
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_explicit_cancel() {
        let (_tx, rx) = mpsc::channel::<SyncEvent>(1);
        let cancel = CancellationToken::new();
        let sub = Subscription::new(rx, cancel.clone());

        sub.cancel();
        assert!(sub.is_cancelled());
    }
}
