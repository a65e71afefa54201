//! Synchronization module.
//!
//! The [`SyncChannel`] trait propagates "image added" / "session snapshot"
//! events between a producer and consumers scoped to one session id.
//! Concrete transports live in `scandock-sync` and are selected via
//! configuration, all satisfying the same consumer-facing contract:
//! a consumer that subscribes at time T eventually observes every image
//! appended at or after T, in append order, at-least-once.
//!
//! # Module Structure
//!
//! - `event`: Wire-compatible event envelope (`SyncEvent`)
//! - `channel`: Transport trait and the cancelable `Subscription` handle

mod channel;
mod event;

// Re-export public API
pub use channel::{Subscription, SyncChannel};
pub use event::SyncEvent;
