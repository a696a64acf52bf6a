//! Minimal HTML to [`Article`] extraction.
//!
//! Title from `<title>`, body from the first `<article>` or `<main>` element,
//! else every `<p>` joined.  Tags are stripped, common entities decoded and
//! whitespace collapsed.  Good enough to feed the scripting prompts; it is
//! not a readability engine.

use std::sync::OnceLock;

use regex::Regex;

const UNTITLED: &str = "Untitled Article";
const NO_CONTENT: &str = "No article content available.";

/// Characters kept in [`Article::summary`].
pub const SUMMARY_CHARS: usize = 300;

/// Text pulled from one article page.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub text: String,
}

impl Article {
    /// Extract title and body text from raw HTML.
    pub fn from_html(url: &str, html: &str) -> Self {
        let cleaned = noise_re().replace_all(html, " ");

        let title = title_re()
            .captures(&cleaned)
            .map(|c| to_plain_text(&c[1]))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let container = container_re()
            .captures(&cleaned)
            .map(|c| to_plain_text(&c[2]))
            .filter(|t| !t.is_empty());

        let text = container
            .or_else(|| {
                let paragraphs: Vec<String> = paragraph_re()
                    .captures_iter(&cleaned)
                    .map(|c| to_plain_text(&c[1]))
                    .filter(|p| !p.is_empty())
                    .collect();
                (!paragraphs.is_empty()).then(|| paragraphs.join(" "))
            })
            .unwrap_or_else(|| NO_CONTENT.to_string());

        log::debug!(
            "article: extracted \"{title}\" ({} chars) from {url}",
            text.chars().count()
        );

        Self {
            url: url.to_string(),
            title,
            text,
        }
    }

    /// First [`SUMMARY_CHARS`] characters of the text, with `...` appended
    /// when cut.
    pub fn summary(&self) -> String {
        match self.text.char_indices().nth(SUMMARY_CHARS) {
            Some((byte, _)) => format!("{}...", &self.text[..byte]),
            None => self.text.clone(),
        }
    }

    /// Headline used for the opening slide: the title without quotes.
    pub fn headline(&self) -> String {
        self.title.replace('"', "")
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn noise_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<(script|style|noscript)[^>]*>.*?</(script|style|noscript)>|<!--.*?-->")
            .expect("noise regex should compile")
    })
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex should compile"))
}

fn container_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<(article|main)[^>]*>(.*?)</(article|main)>")
            .expect("container regex should compile")
    })
}

fn paragraph_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<p[^>]*>(.*?)</p>").expect("paragraph regex should compile"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag regex should compile"))
}

/// Strip tags, decode the usual entities and collapse whitespace.
fn to_plain_text(fragment: &str) -> String {
    let stripped = tag_re().replace_all(fragment, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
