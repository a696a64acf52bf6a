//! Resized cover URLs through the media image handler.
//!
//! The handler takes a base64url-encoded JSON edit request appended to the
//! CDN base:
//!
//! ```json
//! {"bucket":"…","key":"media/x.png","edits":{"resize":{"width":640,"height":853,"fit":"cover"}}}
//! ```

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde_json::json;

use crate::config::PublishConfig;

/// Template placeholder and target size of each resized variant.
pub const RESIZE_PRESETS: [(&str, u32, u32); 2] =
    [("potraitcoverurl", 640, 853), ("msthumbnailcoverurl", 300, 300)];

/// `(placeholder, url)` for each preset, or nothing when `image_url` is not
/// served by the configured media CDN.
pub fn resized_cover_urls(image_url: &str, config: &PublishConfig) -> Vec<(&'static str, String)> {
    let Some(key) = cdn_key(image_url, &config.media_cdn) else {
        log::debug!("images: {image_url} is not on the media CDN, no resized variants");
        return Vec::new();
    };

    RESIZE_PRESETS
        .iter()
        .map(|&(label, width, height)| {
            let request = json!({
                "bucket": config.media_bucket,
                "key": key,
                "edits": { "resize": { "width": width, "height": height, "fit": "cover" } },
            });
            let encoded = URL_SAFE.encode(request.to_string());
            (label, format!("{}{encoded}", config.media_cdn))
        })
        .collect()
}

/// Object key of `url` when it lives on `cdn` (http or https).
fn cdn_key<'a>(url: &'a str, cdn: &str) -> Option<&'a str> {
    let host = cdn
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?
        .strip_prefix(host)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }
    let key = rest.split(['?', '#']).next().unwrap_or_default();
    Some(key.trim_start_matches('/'))
}
