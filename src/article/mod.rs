//! Article intake: download a page and pull out its title and body text.
//!
//! * [`Fetcher`]: async capability returning the text of a URL.
//! * [`HttpFetcher`]: reqwest implementation with content-type check.
//! * [`Article`]: title, full text and summary extracted from HTML.

pub mod extract;
pub mod fetch;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use extract::Article;
pub use fetch::{Fetcher, HttpFetcher};
