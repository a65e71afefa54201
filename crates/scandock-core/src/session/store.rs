//! Session store trait.
//!
//! Defines the interface for the canonical per-session image list.

use super::model::{ImageRecord, Session};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract store owning the mapping from session id to an ordered list
/// of captured images.
///
/// This trait decouples the sync protocol from the specific storage
/// mechanism (in-process map, filesystem directory, remote HTTP store).
/// All backends are best-effort and ephemeral unless explicitly backed by
/// persistent storage; callers must not assume durability.
///
/// # Implementation Notes
///
/// Implementations should handle:
/// - Lazy session creation on first reference
/// - FIFO capacity eviction (keep the newest `cap` images) when configured
/// - Serialized access to the underlying list
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Returns the existing session or creates one with an empty image list.
    ///
    /// Never fails for in-memory backends; filesystem and remote backends
    /// surface transient errors.
    async fn get_or_create(&self, session_id: &str) -> Result<Session>;

    /// Constructs an [`ImageRecord`] with a fresh id and current timestamp,
    /// appends it to the session's list, and applies capacity eviction.
    ///
    /// Returns the stored record. Wire-facing callers trim it to an
    /// [`ImageReceipt`](super::ImageReceipt) for acknowledgements; the full
    /// record is returned here so push transports can broadcast the payload
    /// without a second read.
    ///
    /// # Errors
    ///
    /// Fails with a transient error when the backing store is unavailable.
    /// The caller must not retry; the next append proceeds independently.
    async fn append(&self, session_id: &str, image_data: String) -> Result<ImageRecord>;

    /// Returns the full ordered image list for a session.
    ///
    /// An unknown session id yields an empty list, never an error.
    async fn list(&self, session_id: &str) -> Result<Vec<ImageRecord>>;

    /// Discards the session's state entirely.
    ///
    /// User-initiated reset only; not part of the sync protocol and never
    /// broadcast to consumers.
    async fn clear(&self, session_id: &str) -> Result<()>;
}
