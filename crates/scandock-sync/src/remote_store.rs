//! Remote session store over the wire API.

use async_trait::async_trait;

use scandock_core::error::{Result, ScandockError};
use scandock_core::session::{ImageRecord, Session, SessionStore};
use scandock_core::wire::{AppendRequest, AppendResponse, ListResponse};

/// [`SessionStore`] implemented against a scandock server's HTTP API.
///
/// The canonical list lives on the remote side; this client is what the
/// remote transport variant polls. All failures map to transient transport
/// errors: the caller's next poll or append proceeds independently, and
/// durability is whatever the remote deployment provides.
#[derive(Debug)]
pub struct RemoteSessionStore {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteSessionStore {
    /// Creates a client for the server at `base_url`
    /// (e.g. `http://192.168.1.2:3000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The normalized server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn images_url(&self, session_id: &str) -> String {
        format!("{}/api/images/{}", self.base_url, session_id)
    }

    fn check_status(resp: &reqwest::Response, operation: &str) -> Result<()> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(ScandockError::transport(format!(
            "{} failed with status {}",
            operation, status
        )))
    }
}

#[async_trait]
impl SessionStore for RemoteSessionStore {
    async fn get_or_create(&self, session_id: &str) -> Result<Session> {
        // The remote side creates sessions lazily; a list is all it takes.
        let images = self.list(session_id).await?;
        Ok(Session::from_images(session_id, images))
    }

    async fn append(&self, session_id: &str, image_data: String) -> Result<ImageRecord> {
        let resp = self
            .client
            .post(self.images_url(session_id))
            .json(&AppendRequest {
                image_data: image_data.clone(),
            })
            .send()
            .await
            .map_err(|e| ScandockError::transport(e.to_string()))?;
        Self::check_status(&resp, "append")?;

        let ack: AppendResponse = resp
            .json()
            .await
            .map_err(|e| ScandockError::transport(e.to_string()))?;

        // The acknowledgement is payload-free; reassemble the full record
        // from what we just sent.
        Ok(ImageRecord {
            id: ack.image.id,
            data: image_data,
            timestamp: ack.image.timestamp,
        })
    }

    async fn list(&self, session_id: &str) -> Result<Vec<ImageRecord>> {
        let resp = self
            .client
            .get(self.images_url(session_id))
            .send()
            .await
            .map_err(|e| ScandockError::transport(e.to_string()))?;
        Self::check_status(&resp, "list")?;

        let body: ListResponse = resp
            .json()
            .await
            .map_err(|e| ScandockError::transport(e.to_string()))?;
        Ok(body.images)
    }

    async fn clear(&self, session_id: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.images_url(session_id))
            .send()
            .await
            .map_err(|e| ScandockError::transport(e.to_string()))?;
        Self::check_status(&resp, "clear")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let store = RemoteSessionStore::new("http://192.168.1.2:3000/");
        assert_eq!(store.base_url(), "http://192.168.1.2:3000");
        assert_eq!(
            store.images_url("session-abc"),
            "http://192.168.1.2:3000/api/images/session-abc"
        );
    }
}
