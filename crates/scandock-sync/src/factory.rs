//! Config-driven transport construction.

use std::sync::Arc;

use scandock_core::config::{SyncConfig, TransportKind};
use scandock_core::error::{Result, ScandockError};
use scandock_core::sync::SyncChannel;

use crate::dir_store::DirSessionStore;
use crate::in_process::InProcessChannel;
use crate::memory_store::MemorySessionStore;
use crate::polling::PollingChannel;
use crate::remote_store::RemoteSessionStore;

/// Builds the sync channel a deployment's configuration asks for.
///
/// # Errors
///
/// Returns a config error when the selected transport is missing its
/// required setting (`data_dir` for `local_dir`, `remote_base_url` for
/// `remote`), or an IO error when the local directory cannot be prepared.
pub async fn build_channel(config: &SyncConfig) -> Result<Arc<dyn SyncChannel>> {
    match config.transport {
        TransportKind::InProcess => {
            let store = Arc::new(MemorySessionStore::with_cap(config.image_cap));
            Ok(Arc::new(InProcessChannel::new(store)))
        }
        TransportKind::Poll => {
            let store = Arc::new(MemorySessionStore::with_cap(config.image_cap));
            Ok(Arc::new(PollingChannel::new(store, config.poll_interval())))
        }
        TransportKind::LocalDir => {
            let dir = config.data_dir.as_ref().ok_or_else(|| {
                ScandockError::config("local_dir transport requires data_dir")
            })?;
            let store = Arc::new(DirSessionStore::new(dir, config.image_cap).await?);
            Ok(Arc::new(PollingChannel::new(store, config.poll_interval())))
        }
        TransportKind::Remote => {
            let base_url = config.remote_base_url.as_ref().ok_or_else(|| {
                ScandockError::config("remote transport requires remote_base_url")
            })?;
            let store = Arc::new(RemoteSessionStore::new(base_url.clone()));
            Ok(Arc::new(PollingChannel::new(store, config.poll_interval())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scandock_core::sync::SyncEvent;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_default_config_builds_push_channel() {
        let channel = build_channel(&SyncConfig::default()).await.unwrap();

        // Push delivery: a live subscriber sees the publish without waiting
        // for any poll interval.
        let mut sub = channel.subscribe("s1").await.unwrap();
        assert!(matches!(
            sub.next_event().await,
            Some(SyncEvent::Init { .. })
        ));
        channel.publish("s1", "data:,x".to_string()).await.unwrap();
        assert!(matches!(
            sub.next_event().await,
            Some(SyncEvent::NewImage { .. })
        ));
    }

    #[tokio::test]
    async fn test_local_dir_requires_data_dir() {
        let config = SyncConfig {
            transport: TransportKind::LocalDir,
            ..Default::default()
        };
        let err = build_channel(&config).await.unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_remote_requires_base_url() {
        let config = SyncConfig {
            transport: TransportKind::Remote,
            ..Default::default()
        };
        let err = build_channel(&config).await.unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_local_dir_channel_shares_through_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config = SyncConfig {
            transport: TransportKind::LocalDir,
            data_dir: Some(temp_dir.path().to_path_buf()),
            poll_interval_ms: 20,
            ..Default::default()
        };

        // Two independently built channels over the same directory, as two
        // processes on one device would have.
        let producer = build_channel(&config).await.unwrap();
        let consumer = build_channel(&config).await.unwrap();

        producer.publish("s1", "data:,x".to_string()).await.unwrap();
        let snapshot = consumer.snapshot("s1").await.unwrap();
        assert_eq!(snapshot.len(), 1);
    }
}
