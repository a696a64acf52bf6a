//! Narration: speech synthesis, blob upload and audio attachment.
//!
//! * [`Speaker`] / [`ApiSpeaker`]: text + voice to audio bytes.
//! * [`BlobStore`] / [`HttpBlobStore`] / [`LocalBlobStore`]: bytes to URL.
//! * [`NarrationAttacher`]: fills `audio_ref` on every slide that lacks it.

pub mod attacher;
pub mod speaker;
pub mod store;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use attacher::{NarrationAttacher, AUDIO_CONTENT_TYPE};
pub use speaker::{ApiSpeaker, Speaker};
pub use store::{store_from_config, BlobStore, HttpBlobStore, LocalBlobStore};
