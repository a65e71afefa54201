//! Wire DTOs for the HTTP surface.
//!
//! These shapes are preserved for compatibility with existing viewer and
//! capture clients; field names are part of the contract.

use serde::{Deserialize, Serialize};

use crate::session::{ImageReceipt, ImageRecord};

/// Append request body: `{ "imageData": "<data-URI string>" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendRequest {
    pub image_data: String,
}

/// Append acknowledgement: `{ "success": true, "image": { "id", "timestamp" } }`.
///
/// Deliberately payload-free; the producer already holds the image it sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendResponse {
    pub success: bool,
    pub image: ImageReceipt,
}

/// List response: `{ "images": [ { "id", "data", "timestamp" }, ... ], "count": n }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub images: Vec<ImageRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Clear acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    pub success: bool,
}

/// Error body: `{ "error": "<message>" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Mobile entry-point info for the QR collaborator:
/// `{ "mobileUrl": "...", "localIP": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryUrlResponse {
    #[serde(rename = "mobileUrl")]
    pub mobile_url: String,
    #[serde(rename = "localIP")]
    pub local_ip: String,
}

/// Builds the URL a phone opens after scanning the desktop QR code.
///
/// The QR collaborator reads only the session id; this is its single point
/// of coupling with the core.
pub fn mobile_entry_url(origin: &str, session_id: &str) -> String {
    format!(
        "{}/mobile?session={}",
        origin.trim_end_matches('/'),
        session_id
    )
}
