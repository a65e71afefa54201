//! Core domain layer for scandock.
//!
//! Scandock synchronizes an ordered list of captured images between a phone
//! capture client (the producer) and one or more desktop viewer clients
//! (the consumers), scoped to an ephemeral session id. This crate defines
//! the domain model and the seams everything else plugs into:
//!
//! - [`session::SessionStore`]: ownership of the canonical ordered image
//!   list per session, with capacity eviction.
//! - [`sync::SyncChannel`]: transport-agnostic propagation of image events
//!   from producer to consumers, with snapshot-based recovery.
//! - [`gallery::GalleryProjection`]: the consumer-side read model that
//!   merges events and snapshots into a de-duplicated, insertion-ordered
//!   view.
//!
//! Concrete store and channel backends live in `scandock-sync`; the HTTP
//! surface lives in `scandock-server`.

pub mod config;
pub mod error;
pub mod gallery;
pub mod session;
pub mod sync;
pub mod wire;

// Re-export common error type
pub use error::{Result, ScandockError};
