//! Final story page: fills the submission template's `{{…}}` fields.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, SecondsFormat, Utc};
use rand::seq::IteratorRandom;
use regex::Regex;

use super::images::resized_cover_urls;
use super::slug::StoryUrls;
use crate::config::PublishConfig;
use crate::llm::Language;

/// Attribution used when no configured user is available.
pub const DEFAULT_USER: &str = "Suvichaar";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentType {
    #[default]
    News,
    Article,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentType::News => "News",
            ContentType::Article => "Article",
        })
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "news" => Ok(ContentType::News),
            "article" => Ok(ContentType::Article),
            other => Err(format!("unknown content type `{other}` (expected News or Article)")),
        }
    }
}

/// Everything the submission template needs besides the generated URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub story_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub content_type: ContentType,
    pub language: Language,
    /// Cover image shown on the page (`{{image0}}`).
    pub image_url: String,
    /// Attribution user; must be a key of [`PublishConfig::users`] to get a
    /// profile link.
    pub user: String,
}

impl Submission {
    pub fn page_title(&self) -> String {
        format!("{} | {DEFAULT_USER}", self.story_title)
    }
}

/// Random attribution user from the configured list.
pub fn pick_user(config: &PublishConfig) -> String {
    config
        .users
        .keys()
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_else(|| DEFAULT_USER.to_string())
}

/// Fill `template` for `submission`, stamping both publish and modify time
/// with `now`.
pub fn fill_submission(
    template: &str,
    submission: &Submission,
    urls: &StoryUrls,
    config: &PublishConfig,
    now: DateTime<Utc>,
) -> String {
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Secs, false);
    let profile = config.users.get(&submission.user).cloned().unwrap_or_default();

    let mut fields: Vec<(&str, String)> = vec![
        ("{{user}}", submission.user.clone()),
        ("{{userprofileurl}}", profile),
        ("{{publishedtime}}", timestamp.clone()),
        ("{{modifiedtime}}", timestamp),
        ("{{storytitle}}", submission.story_title.clone()),
        ("{{metadescription}}", submission.meta_description.clone()),
        ("{{metakeywords}}", submission.meta_keywords.clone()),
        ("{{contenttype}}", submission.content_type.to_string()),
        ("{{lang}}", submission.language.code().to_string()),
        ("{{pagetitle}}", submission.page_title()),
        ("{{canurl}}", urls.canonical_url.clone()),
        ("{{canurl1}}", urls.html_url.clone()),
    ];
    if !submission.image_url.is_empty() {
        fields.push(("{{image0}}", submission.image_url.clone()));
    }

    let mut html = template.to_string();
    for (placeholder, value) in &fields {
        html = html.replace(placeholder, value);
    }
    for (label, url) in resized_cover_urls(&submission.image_url, config) {
        html = html.replace(&format!("{{{{{label}}}}}"), &url);
    }

    let html = wrapped_href_re().replace_all(&html, r#"href="$1""#);
    wrapped_src_re().replace_all(&html, r#"src="$1""#).into_owned()
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

// Templates sometimes wrap a URL placeholder in braces: `href="{https://…}"`.

fn wrapped_href_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"href="\{(https://[^}]+)\}""#).expect("href regex should compile"))
}

fn wrapped_src_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"src="\{(https://[^}]+)\}""#).expect("src regex should compile"))
}
