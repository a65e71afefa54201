//! In-process session store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use scandock_core::error::Result;
use scandock_core::session::{ImageRecord, Session, SessionStore};

/// Process-local session store backed by a map.
///
/// This is the explicit-object replacement for the ambient
/// process-wide session dictionary the original deployments used: it is
/// constructed at process start, injected where needed, and accessed only
/// through the [`SessionStore`] operations. State is lost on restart.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    image_cap: Option<usize>,
}

impl MemorySessionStore {
    /// Creates an unbounded store.
    pub fn new() -> Self {
        Self::with_cap(None)
    }

    /// Creates a store that keeps at most `image_cap` images per session,
    /// evicting oldest-first.
    pub fn with_cap(image_cap: Option<usize>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            image_cap,
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_or_create(&self, session_id: &str) -> Result<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id));
        Ok(session.clone())
    }

    async fn append(&self, session_id: &str, image_data: String) -> Result<ImageRecord> {
        let record = ImageRecord::new(image_data);

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id));
        session.images.push(record.clone());

        // Eviction is silent; consumers are never told truncation occurred.
        if let Some(cap) = self.image_cap {
            if session.images.len() > cap {
                let excess = session.images.len() - cap;
                session.images.drain(..excess);
            }
        }

        Ok(record)
    }

    async fn list(&self, session_id: &str) -> Result<Vec<ImageRecord>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_id)
            .map(|s| s.images.clone())
            .unwrap_or_default())
    }

    async fn clear(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
        Ok(())
    }
}
