//! In-process push transport.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use scandock_core::error::Result;
use scandock_core::session::{ImageRecord, SessionStore};
use scandock_core::sync::{Subscription, SyncChannel, SyncEvent};

/// Broadcast capacity per session topic. A subscriber that falls further
/// behind than this recovers through a fresh snapshot.
const TOPIC_CAPACITY: usize = 64;

/// Buffered events per subscription before backpressure applies.
const SUBSCRIPTION_BUFFER: usize = 32;

/// Push transport for consumers sharing the producing process.
///
/// Publish appends to the wrapped store and broadcasts the new record on a
/// per-session topic; delivery is immediate and totally ordered by the
/// store's single authoritative sequence. Each subscription starts with an
/// [`SyncEvent::Init`] snapshot, and a lagged subscriber is resynchronized
/// with a fresh snapshot instead of silently missing events.
#[derive(Debug)]
pub struct InProcessChannel {
    store: Arc<dyn SessionStore>,
    topics: RwLock<HashMap<String, broadcast::Sender<SyncEvent>>>,
}

impl InProcessChannel {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// The wrapped store, for operations outside the sync protocol
    /// (explicit session reset).
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    async fn topic(&self, session_id: &str) -> broadcast::Sender<SyncEvent> {
        {
            let topics = self.topics.read().await;
            if let Some(tx) = topics.get(session_id) {
                return tx.clone();
            }
        }
        let mut topics = self.topics.write().await;
        topics
            .entry(session_id.to_string())
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .clone()
    }
}

#[async_trait]
impl SyncChannel for InProcessChannel {
    async fn publish(&self, session_id: &str, image_data: String) -> Result<ImageRecord> {
        let record = self.store.append(session_id, image_data).await?;
        // No receivers is fine; late consumers recover via snapshot.
        let _ = self.topic(session_id).await.send(SyncEvent::NewImage {
            image: record.clone(),
        });
        Ok(record)
    }

    async fn subscribe(&self, session_id: &str) -> Result<Subscription> {
        let mut topic_rx = self.topic(session_id).await.subscribe();
        let snapshot = self.store.list(session_id).await?;

        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let store = self.store.clone();
        let session_id = session_id.to_string();

        tokio::spawn(async move {
            if tx.send(SyncEvent::Init { images: snapshot }).await.is_err() {
                return;
            }
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    received = topic_rx.recv() => match received {
                        Ok(event) => {
                            if tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(
                                %session_id,
                                skipped,
                                "subscriber lagged, resynchronizing from snapshot"
                            );
                            match store.list(&session_id).await {
                                Ok(images) => {
                                    if tx.send(SyncEvent::Init { images }).await.is_err() {
                                        break;
                                    }
                                }
                                Err(e) => {
                                    // Next successful broadcast or snapshot
                                    // attempt will catch the consumer up.
                                    tracing::warn!(%session_id, "snapshot recovery failed: {}", e);
                                }
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });

        Ok(Subscription::new(rx, cancel))
    }

    async fn snapshot(&self, session_id: &str) -> Result<Vec<ImageRecord>> {
        self.store.list(session_id).await
    }
}
