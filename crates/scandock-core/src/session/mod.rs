//! Session domain module.
//!
//! A session is the unit of sharing between one producer (the phone
//! capture client) and one or more consumers (desktop viewers), identified
//! by an opaque id embedded in a URL.
//!
//! # Module Structure
//!
//! - `model`: Core domain types (`Session`, `ImageRecord`, `ImageReceipt`)
//! - `store`: Storage trait for the canonical image list (`SessionStore`)

mod model;
mod store;

// Re-export public API
pub use model::{DEFAULT_IMAGE_CAP, ImageReceipt, ImageRecord, Session, new_session_id, now_millis};
pub use store::SessionStore;
