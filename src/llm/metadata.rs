//! SEO metadata for a story title.
//!
//! The model is asked for labelled lines (`Description:`, `Keywords:`,
//! `Filter Tags:`).  Parsing tries the labels first, then a numbered list,
//! then fills anything still missing from the title.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use serde::Serialize;

use super::generator::TextGenerator;
use super::prompt::{Language, PromptBuilder};
use crate::pipeline::error::{with_timeout, ExternalError, StageError};
use crate::pipeline::stage::Stage;

/// Description, keywords and filter tags of one story.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeoMetadata {
    pub description: String,
    pub keywords: String,
    pub filter_tags: String,
}

impl SeoMetadata {
    /// Parse a model reply; fields that cannot be found stay empty.
    pub fn parse(reply: &str) -> Self {
        let [description_re, keywords_re, tags_re] = label_res();
        let [first_re, second_re, third_re] = numbered_res();

        let pick = |labelled: &Regex, numbered: &Regex| {
            capture(labelled, reply).or_else(|| capture(numbered, reply)).unwrap_or_default()
        };

        Self {
            description: pick(description_re, first_re),
            keywords: pick(keywords_re, second_re),
            filter_tags: pick(tags_re, third_re),
        }
    }

    /// Fill empty fields with deterministic values derived from `title`.
    pub fn with_fallbacks(mut self, title: &str) -> Self {
        if self.description.is_empty() {
            self.description = format!(
                "Latest news and updates about {title}. Stay informed with comprehensive coverage and analysis."
            );
        }
        if self.keywords.is_empty() {
            self.keywords = format!("{}, news, updates, latest, information", title.to_lowercase());
        }
        if self.filter_tags.is_empty() {
            self.filter_tags = format!("{title}, News, Updates");
        }
        self
    }

    /// Filter tags as a trimmed list.
    pub fn tag_list(&self) -> Vec<String> {
        self.filter_tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Asks a [`TextGenerator`] for [`SeoMetadata`].
pub struct MetadataGenerator {
    generator: Arc<dyn TextGenerator>,
    prompts: PromptBuilder,
    timeout: Duration,
}

impl MetadataGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self {
            generator,
            prompts: PromptBuilder::new(Language::English),
            timeout,
        }
    }

    pub async fn generate(&self, story_title: &str) -> Result<SeoMetadata, StageError> {
        let prompt = self.prompts.metadata(story_title);
        let reply = with_timeout(self.timeout, async {
            self.generator
                .generate(&prompt)
                .await
                .map_err(ExternalError::from)
        })
        .await
        .map_err(|e| StageError::external(Stage::Publish, e))?;

        let parsed = SeoMetadata::parse(&reply);
        if parsed.description.is_empty() || parsed.keywords.is_empty() || parsed.filter_tags.is_empty() {
            log::warn!("metadata: incomplete reply, filling gaps from the title");
        }
        Ok(parsed.with_fallbacks(story_title))
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn capture(re: &Regex, text: &str) -> Option<String> {
    let value = re.captures(text)?.get(1)?.as_str();
    let value = value.trim_matches(|c: char| c == '*' || c == '[' || c == ']' || c.is_whitespace());
    (!value.is_empty()).then(|| value.to_string())
}

fn label_res() -> &'static [Regex; 3] {
    static RES: OnceLock<[Regex; 3]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            Regex::new(r"(?im)(?:meta\s*)?description\**\s*[:\-]\s*(.+)$"),
            Regex::new(r"(?im)(?:meta\s*)?keywords\**\s*[:\-]\s*(.+)$"),
            Regex::new(r"(?im)(?:filter\s*)?tags\**\s*[:\-]\s*(.+)$"),
        ]
        .map(|re| re.expect("metadata label regex should compile"))
    })
}

fn numbered_res() -> &'static [Regex; 3] {
    static RES: OnceLock<[Regex; 3]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            Regex::new(r"(?m)^\s*1[.)]?\s+(.+)$"),
            Regex::new(r"(?m)^\s*2[.)]?\s+(.+)$"),
            Regex::new(r"(?m)^\s*3[.)]?\s+(.+)$"),
        ]
        .map(|re| re.expect("metadata list regex should compile"))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
