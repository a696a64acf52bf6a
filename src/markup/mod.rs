//! AMP story markup.
//!
//! * [`MarkupAssembler`]: fills the template's title/hook blocks and
//!   splices one page per body slide into the slide placeholder.
//! * [`PageFragment`]: one `<amp-story-page>`.
//! * [`text`]: shortening and escaping of slide text.

pub mod assembler;
pub mod fragment;
pub mod text;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use assembler::{fill_story_blocks, MarkupAssembler};
pub use fragment::PageFragment;
