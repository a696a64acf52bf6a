//! Outputs for the external renderers.
//!
//! * [`RenderInputBuilder`]: flat JSON for the video renderer.
//! * [`CoverBuilder`] / [`Thumbnailer`]: cover thumbnail request and upload.

pub mod cover;
pub mod input;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use cover::{cover_request, CoverBuilder, HttpThumbnailer, Thumbnailer, COVER_CONTENT_TYPE};
pub use input::RenderInputBuilder;
