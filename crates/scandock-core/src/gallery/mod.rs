//! Gallery read model.
//!
//! Consumer-side projection of a session's image list, materialized from
//! sync events and snapshots for the rendering and PDF-export
//! collaborators.

mod projection;

pub use projection::GalleryProjection;
