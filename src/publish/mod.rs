//! Publishing: slugs and canonical URLs, resized cover links, the final
//! submission page, its metadata document and the downloadable bundle.

pub mod bundle;
pub mod images;
pub mod metadata;
pub mod slug;
pub mod submission;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use bundle::{BundleError, StoryBundle};
pub use images::{resized_cover_urls, RESIZE_PRESETS};
pub use metadata::{category_id, StoryMetadata};
pub use slug::{random_nano, slugify, SlugError, StoryUrls};
pub use submission::{fill_submission, pick_user, ContentType, Submission, DEFAULT_USER};
