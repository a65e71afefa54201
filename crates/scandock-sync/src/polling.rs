//! Poll-based pull transport.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use scandock_core::error::Result;
use scandock_core::session::{ImageRecord, SessionStore};
use scandock_core::sync::{Subscription, SyncChannel, SyncEvent};

/// Buffered events per subscription before backpressure applies.
const SUBSCRIPTION_BUFFER: usize = 32;

/// Pull transport: consumers poll the store on a timer.
///
/// Staleness is bounded by the poll interval. The store backend determines
/// the deployment shape: an in-process store gives the shared-store poll
/// variant, a [`DirSessionStore`](crate::DirSessionStore) gives same-device
/// cross-process sharing, and a
/// [`RemoteSessionStore`](crate::RemoteSessionStore) gives the remote
/// hybrid.
///
/// A failed tick is logged and skipped; the next tick proceeds
/// independently, and because every tick reads a full snapshot there is no
/// permanent desync from a missed delivery. A response that arrives late is
/// merged as stale-but-valid; the consumer-side projection de-duplicates.
#[derive(Debug)]
pub struct PollingChannel {
    store: Arc<dyn SessionStore>,
    interval: Duration,
}

impl PollingChannel {
    pub fn new(store: Arc<dyn SessionStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// The wrapped store, for operations outside the sync protocol.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }
}

#[async_trait]
impl SyncChannel for PollingChannel {
    async fn publish(&self, session_id: &str, image_data: String) -> Result<ImageRecord> {
        // Delivery trigger is consumer-side; appending to the shared store
        // is all a producer does here.
        self.store.append(session_id, image_data).await
    }

    async fn subscribe(&self, session_id: &str) -> Result<Subscription> {
        let snapshot = self.store.list(session_id).await?;
        let mut delivered: HashSet<String> =
            snapshot.iter().map(|img| img.id.clone()).collect();

        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let store = self.store.clone();
        let poll_interval = self.interval;
        let session_id = session_id.to_string();

        tokio::spawn(async move {
            if tx.send(SyncEvent::Init { images: snapshot }).await.is_err() {
                return;
            }

            let mut ticker = time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of tokio's interval fires immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let images = match store.list(&session_id).await {
                            Ok(images) => images,
                            Err(e) => {
                                tracing::warn!(%session_id, "poll tick failed: {}", e);
                                continue;
                            }
                        };
                        for image in images {
                            if delivered.contains(&image.id) {
                                continue;
                            }
                            delivered.insert(image.id.clone());
                            if tx.send(SyncEvent::NewImage { image }).await.is_err() {
                                return;
                            }
                        }
                    }
                }
            }
        });

        Ok(Subscription::new(rx, cancel))
    }

    async fn snapshot(&self, session_id: &str) -> Result<Vec<ImageRecord>> {
        self.store.list(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemorySessionStore;
    use tokio::time::timeout;

    const TEST_INTERVAL: Duration = Duration::from_millis(20);
    const WAIT: Duration = Duration::from_secs(2);

    fn channel(store: Arc<MemorySessionStore>) -> PollingChannel {
        PollingChannel::new(store, TEST_INTERVAL)
    }

    #[tokio::test]
    async fn test_init_then_polled_delivery() {
        let store = Arc::new(MemorySessionStore::new());
        let channel = channel(store);

        channel.publish("s1", "data:,a".to_string()).await.unwrap();
        let mut sub = channel.subscribe("s1").await.unwrap();

        match sub.next_event().await {
            Some(SyncEvent::Init { images }) => assert_eq!(images.len(), 1),
            other => panic!("expected init, got {:?}", other),
        }

        let published = channel.publish("s1", "data:,b".to_string()).await.unwrap();
        match timeout(WAIT, sub.next_event()).await.unwrap() {
            Some(SyncEvent::NewImage { image }) => assert_eq!(image.id, published.id),
            other => panic!("expected new-image, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_images_already_in_init_are_not_redelivered() {
        let store = Arc::new(MemorySessionStore::new());
        let channel = channel(store);

        channel.publish("s1", "data:,a".to_string()).await.unwrap();
        let mut sub = channel.subscribe("s1").await.unwrap();
        let _ = sub.next_event().await; // init with a

        let fresh = channel.publish("s1", "data:,b".to_string()).await.unwrap();

        // The next event must be b, never a re-delivery of a.
        match timeout(WAIT, sub.next_event()).await.unwrap() {
            Some(SyncEvent::NewImage { image }) => assert_eq!(image.id, fresh.id),
            other => panic!("expected new-image, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_appends_outside_the_channel_are_observed() {
        // A producer writing to the shared store through a different
        // channel instance still reaches this consumer.
        let store = Arc::new(MemorySessionStore::new());
        let consumer_side = channel(store.clone());

        let mut sub = consumer_side.subscribe("s1").await.unwrap();
        let _ = sub.next_event().await; // init (empty)

        let record = store.append("s1", "data:,x".to_string()).await.unwrap();
        match timeout(WAIT, sub.next_event()).await.unwrap() {
            Some(SyncEvent::NewImage { image }) => assert_eq!(image.id, record.id),
            other => panic!("expected new-image, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ordered_delivery_of_batched_appends() {
        let store = Arc::new(MemorySessionStore::new());
        let channel = channel(store);

        let mut sub = channel.subscribe("s1").await.unwrap();
        let _ = sub.next_event().await; // init

        let a = channel.publish("s1", "data:,a".to_string()).await.unwrap();
        let b = channel.publish("s1", "data:,b".to_string()).await.unwrap();

        // Both may arrive within one tick; order must be append order.
        let first = timeout(WAIT, sub.next_event()).await.unwrap().unwrap();
        let second = timeout(WAIT, sub.next_event()).await.unwrap().unwrap();
        match (first, second) {
            (
                SyncEvent::NewImage { image: first },
                SyncEvent::NewImage { image: second },
            ) => {
                assert_eq!(first.id, a.id);
                assert_eq!(second.id, b.id);
            }
            other => panic!("expected two new-image events, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancel_stops_polling() {
        let store = Arc::new(MemorySessionStore::new());
        let channel = channel(store);

        let mut sub = channel.subscribe("s1").await.unwrap();
        let _ = sub.next_event().await; // init

        sub.cancel();
        assert!(timeout(WAIT, sub.next_event()).await.unwrap().is_none());
    }
}
