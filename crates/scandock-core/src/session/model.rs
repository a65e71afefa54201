//! Session domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default per-session image cap. Once exceeded, the oldest entries are
/// silently dropped (FIFO eviction, keep-newest).
pub const DEFAULT_IMAGE_CAP: usize = 20;

/// A captured-image sharing session.
///
/// Sessions are created lazily on first reference by either client and
/// destroyed explicitly (user reset) or implicitly (process restart, store
/// eviction). There is no guaranteed durability across transport restarts
/// unless the session is backed by a persistent store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session identifier, generated client-side
    pub id: String,
    /// Creation timestamp (unix millis)
    pub created_at: i64,
    /// Ordered list of captured images; position is insertion order
    pub images: Vec<ImageRecord>,
}

impl Session {
    /// Creates an empty session with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: now_millis(),
            images: Vec::new(),
        }
    }

    /// Creates a session from an already-known image list.
    ///
    /// Used by remote-backed stores where the canonical list lives on the
    /// other side of the wire and the local creation timestamp is moot.
    pub fn from_images(id: impl Into<String>, images: Vec<ImageRecord>) -> Self {
        Self {
            id: id.into(),
            created_at: now_millis(),
            images,
        }
    }
}

/// A single captured image as stored in a session's ordered list.
///
/// The payload is a data-URI-encoded JPEG, directly decodable by the
/// rendering and PDF-export collaborators without further transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Opaque image identifier, unique within the session
    pub id: String,
    /// Data-URI-encoded payload
    pub data: String,
    /// Capture timestamp (unix millis). Producer-assigned: monotonic per
    /// producer, not globally monotonic across concurrent producers.
    pub timestamp: i64,
}

impl ImageRecord {
    /// Constructs a record with a fresh id and current timestamp.
    pub fn new(data: String) -> Self {
        Self {
            id: format!("img-{}", Uuid::new_v4()),
            data,
            timestamp: now_millis(),
        }
    }

    /// Returns the payload-free acknowledgement shape for this record.
    pub fn receipt(&self) -> ImageReceipt {
        ImageReceipt {
            id: self.id.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// Payload-free descriptor returned to a producer after an append.
///
/// Keeps acknowledgement responses small; the producer already holds the
/// payload it just sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReceipt {
    pub id: String,
    pub timestamp: i64,
}

/// Generates a fresh session id.
///
/// Globally unique with high probability; there is no collision-recovery
/// mechanism anywhere in the system.
pub fn new_session_id() -> String {
    format!("session-{}", Uuid::new_v4())
}

/// Current unix time in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
