//! Slide model and its stage-specific wire formats.
//!
//! * [`SlideIndex`] / [`Slide`] / [`Role`]: the ordered, contiguously
//!   numbered slide sequence every stage works on.
//! * [`codec`]: decode/encode between a [`SlideIndex`] and the sparse
//!   string-keyed JSON each stage exchanges (`slide3`, `s2paragraph1`,
//!   `audio_url4`, …).  Key naming never leaks past this module.
//! * [`renumber`]: position conventions between stages (markup re-basing,
//!   render ordering with the trailing call-to-action slide).
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use web_story::slide::{codec, renumber, Role, StageSchema};
//!
//! let raw = json!({
//!     "storytitle": "A",
//!     "hookline": "B",
//!     "s1paragraph1": "C",
//!     "s2paragraph1": "D"
//! });
//!
//! let script = codec::decode(&raw, StageSchema::Script);
//! assert_eq!(script.len(), 4);
//! assert_eq!(script.get(1).unwrap().role, Role::Title);
//!
//! let markup = renumber::for_markup(&script);
//! assert_eq!(markup.positions(), vec![2, 3]);
//! ```

pub mod codec;
pub mod model;
pub mod renumber;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use codec::StageSchema;
pub use model::{CallToAction, Role, Slide, SlideIndex, SlideIndexBuilder, SlideIndexError};
