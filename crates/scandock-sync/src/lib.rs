//! Concrete store and transport backends for scandock.
//!
//! This crate provides the infrastructure side of the sync core:
//!
//! - [`MemorySessionStore`]: in-process map, the default backend.
//! - [`DirSessionStore`]: one JSON file per session, for persistence and
//!   for same-device cross-process sharing.
//! - [`InProcessChannel`]: push delivery over a per-session broadcast.
//! - [`PollingChannel`]: timer-driven pull over any [`SessionStore`],
//!   which yields the shared-store, local-directory, and remote variants.
//! - [`RemoteSessionStore`]: the wire API re-exposed as a `SessionStore`.
//!
//! [`build_channel`] maps a [`SyncConfig`](scandock_core::config::SyncConfig)
//! to the right combination.
//!
//! [`SessionStore`]: scandock_core::session::SessionStore

mod dir_store;
mod factory;
mod in_process;
mod memory_store;
mod polling;
mod remote_store;

pub use dir_store::DirSessionStore;
pub use factory::build_channel;
pub use in_process::InProcessChannel;
pub use memory_store::MemorySessionStore;
pub use polling::PollingChannel;
pub use remote_store::RemoteSessionStore;
