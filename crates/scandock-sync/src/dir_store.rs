//! Directory-backed session store.
//!
//! One JSON file per session under `<base>/sessions/`. Used for server
//! deployments that should survive a restart, and as the shared medium of
//! the same-device transport variant (two processes on one machine polling
//! the same directory).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use scandock_core::error::{Result, ScandockError};
use scandock_core::session::{ImageRecord, Session, SessionStore};

/// Filesystem session store.
///
/// Directory structure:
/// ```text
/// base_dir/
/// └── sessions/
///     ├── session-id-1.json
///     └── session-id-2.json
/// ```
///
/// Writes go through a uniquely named temp file + rename so a crashed
/// write never leaves a half-written session behind, and mutations are
/// serialized through a store-level lock so concurrent appends within one
/// process never lose each other's read-modify-write. Readers always see
/// a whole file thanks to the rename.
#[derive(Debug)]
pub struct DirSessionStore {
    sessions_dir: PathBuf,
    image_cap: Option<usize>,
    write_lock: Mutex<()>,
}

impl DirSessionStore {
    /// Creates a new store rooted at `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sessions directory cannot be created.
    pub async fn new(base_dir: impl AsRef<Path>, image_cap: Option<usize>) -> Result<Self> {
        let sessions_dir = base_dir.as_ref().join("sessions");
        fs::create_dir_all(&sessions_dir).await?;
        Ok(Self {
            sessions_dir,
            image_cap,
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the sessions directory path.
    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    fn session_path(&self, session_id: &str) -> Result<PathBuf> {
        // Ids become filenames directly; anything path-like is rejected
        // rather than escaping the sessions directory.
        if session_id.is_empty()
            || session_id.contains('/')
            || session_id.contains('\\')
            || session_id.contains("..")
        {
            return Err(ScandockError::invalid_session(format!(
                "session id not usable as a filename: '{}'",
                session_id
            )));
        }
        Ok(self.sessions_dir.join(format!("{}.json", session_id)))
    }

    async fn load_session(&self, session_id: &str) -> Result<Option<Session>> {
        let path = self.session_path(session_id)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let session = serde_json::from_slice(&bytes)?;
        Ok(Some(session))
    }

    async fn save_session(&self, session: &Session) -> Result<()> {
        let path = self.session_path(&session.id)?;
        // Unique per write; a shared temp name would let racing writers
        // (including a second process on the same directory) rename each
        // other's half-written files.
        let tmp = path.with_extension(format!("tmp-{}", Uuid::new_v4()));
        let bytes = serde_json::to_vec(session)?;
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for DirSessionStore {
    async fn get_or_create(&self, session_id: &str) -> Result<Session> {
        let _guard = self.write_lock.lock().await;
        if let Some(session) = self.load_session(session_id).await? {
            return Ok(session);
        }
        let session = Session::new(session_id);
        self.save_session(&session).await?;
        Ok(session)
    }

    async fn append(&self, session_id: &str, image_data: String) -> Result<ImageRecord> {
        let _guard = self.write_lock.lock().await;
        let mut session = self
            .load_session(session_id)
            .await?
            .unwrap_or_else(|| Session::new(session_id));

        let record = ImageRecord::new(image_data);
        session.images.push(record.clone());

        if let Some(cap) = self.image_cap {
            if session.images.len() > cap {
                let excess = session.images.len() - cap;
                session.images.drain(..excess);
            }
        }

        self.save_session(&session).await?;
        Ok(record)
    }

    async fn list(&self, session_id: &str) -> Result<Vec<ImageRecord>> {
        Ok(self
            .load_session(session_id)
            .await?
            .map(|s| s.images)
            .unwrap_or_default())
    }

    async fn clear(&self, session_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.session_path(session_id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_append_and_list_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirSessionStore::new(temp_dir.path(), None).await.unwrap();

        let a = store.append("s1", "data:,a".to_string()).await.unwrap();
        let b = store.append("s1", "data:,b".to_string()).await.unwrap();

        let images = store.list("s1").await.unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].id, a.id);
        assert_eq!(images[1].id, b.id);
        assert_eq!(images[0].data, "data:,a");
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = DirSessionStore::new(temp_dir.path(), None).await.unwrap();
            store.append("s1", "data:,a".to_string()).await.unwrap();
        }

        let reopened = DirSessionStore::new(temp_dir.path(), None).await.unwrap();
        let images = reopened.list("s1").await.unwrap();
        assert_eq!(images.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_session_lists_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirSessionStore::new(temp_dir.path(), None).await.unwrap();
        assert!(store.list("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_eviction_applies_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirSessionStore::new(temp_dir.path(), Some(3))
            .await
            .unwrap();

        for i in 0..5 {
            store.append("s1", format!("data:,{}", i)).await.unwrap();
        }

        let images = store.list("s1").await.unwrap();
        assert_eq!(images.len(), 3);
        assert_eq!(images[0].data, "data:,2");
        assert_eq!(images[2].data, "data:,4");
    }

    #[tokio::test]
    async fn test_clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirSessionStore::new(temp_dir.path(), None).await.unwrap();

        store.append("s1", "data:,a".to_string()).await.unwrap();
        store.clear("s1").await.unwrap();

        assert!(store.list("s1").await.unwrap().is_empty());
        // Clearing again is a no-op.
        store.clear("s1").await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_lose_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(
            DirSessionStore::new(temp_dir.path(), None).await.unwrap(),
        );

        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.append("s1", format!("data:,{}", i)).await.unwrap()
            }));
        }
        let mut appended = Vec::new();
        for task in tasks {
            appended.push(task.await.unwrap());
        }

        // Every append survived the read-modify-write, exactly once.
        let images = store.list("s1").await.unwrap();
        assert_eq!(images.len(), 16);
        for record in appended {
            assert_eq!(images.iter().filter(|i| i.id == record.id).count(), 1);
        }
    }

    #[tokio::test]
    async fn test_backing_store_failures_are_transient() {
        let temp_dir = TempDir::new().unwrap();
        // A plain file where the sessions directory should go makes every
        // filesystem operation fail.
        tokio::fs::write(temp_dir.path().join("sessions"), b"not a dir")
            .await
            .unwrap();

        let err = DirSessionStore::new(temp_dir.path(), None)
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_path_like_session_id_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = DirSessionStore::new(temp_dir.path(), None).await.unwrap();

        let err = store
            .append("../escape", "data:,a".to_string())
            .await
            .unwrap_err();
        assert!(err.is_invalid_session());
    }
}
