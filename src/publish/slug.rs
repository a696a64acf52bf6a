//! URL slugs and canonical story URLs.

use rand::Rng;
use thiserror::Error;

use crate::config::PublishConfig;

/// Alphabet of the random story id.
const NANO_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-";
const NANO_LEN: usize = 10;
const NANO_SUFFIX: &str = "_G";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("story title is empty")]
    EmptyTitle,
}

/// Identifiers and URLs of one published story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryUrls {
    /// Random story id, e.g. `aB3_x-9QzK_G`.
    pub nano: String,
    /// `{slug}_{nano}`.
    pub slug_nano: String,
    /// Story page URL.
    pub canonical_url: String,
    /// Static HTML URL.
    pub html_url: String,
}

impl StoryUrls {
    /// Fresh id and URLs for `title`.
    pub fn generate(title: &str, config: &PublishConfig) -> Result<Self, SlugError> {
        Self::with_nano(title, random_nano(&mut rand::thread_rng()), config)
    }

    /// URLs for `title` with a caller-chosen id.
    pub fn with_nano(title: &str, nano: String, config: &PublishConfig) -> Result<Self, SlugError> {
        if title.trim().is_empty() {
            return Err(SlugError::EmptyTitle);
        }
        let slug_nano = format!("{}_{nano}", slugify(title));
        Ok(Self {
            canonical_url: format!("{}{slug_nano}", config.story_base_url),
            html_url: format!("{}{slug_nano}.html", config.html_base_url),
            nano,
            slug_nano,
        })
    }
}

/// Lower-case ASCII slug: spaces and underscores become `-`, anything
/// outside `[a-z0-9-]` is dropped, leading/trailing `-` trimmed.
pub fn slugify(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    slug.trim_matches('-').to_string()
}

/// Ten random characters followed by `_G`.
pub fn random_nano<R: Rng>(rng: &mut R) -> String {
    let mut nano: String = (0..NANO_LEN)
        .map(|_| NANO_ALPHABET[rng.gen_range(0..NANO_ALPHABET.len())] as char)
        .collect();
    nano.push_str(NANO_SUFFIX);
    nano
}
