//! Assemble the final AMP story from a template and a narrated index.
//!
//! ```text
//! template ──▶ placeholder check ──▶ title/hook blocks ──▶ splice pages ──▶ HTML
//!                                                             ▲
//! narrated index ──▶ for_markup ──▶ PageFragment per body slide
//! ```
//!
//! The title and hook are rendered by fixed template blocks
//! (`{{storytitle}}`, `{{storytitle_audiourl}}`, `{{hookline}}`,
//! `{{hookline_audiourl}}`); only body slides become generated pages.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::fragment::{escape_attr, PageFragment};
use super::text::{display_text, escape_html};
use crate::config::{AssetsConfig, MarkupConfig};
use crate::pipeline::error::StageError;
use crate::slide::renumber::for_markup;
use crate::slide::{Slide, SlideIndex};

pub struct MarkupAssembler {
    placeholder: String,
    max_text_chars: usize,
    slide_image: String,
}

impl MarkupAssembler {
    pub fn new(placeholder: impl Into<String>, max_text_chars: usize, slide_image: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            max_text_chars,
            slide_image: slide_image.into(),
        }
    }

    pub fn from_config(markup: &MarkupConfig, assets: &AssetsConfig) -> Self {
        Self::new(&markup.placeholder, markup.max_text_chars, &assets.slide_image)
    }

    /// Full story HTML for a narrated (TTS-annotated) index.
    ///
    /// Fails with [`StageError::TemplateConfiguration`] before touching the
    /// template when the placeholder is missing.
    pub fn assemble(&self, template: &str, narrated: &SlideIndex) -> Result<String, StageError> {
        self.check_template(template)?;

        let with_blocks = fill_story_blocks(template, narrated);
        let pages = self.render_pages(&for_markup(narrated));
        Ok(self.splice(&with_blocks, &pages))
    }

    /// Splice pages for an index that is already in markup numbering
    /// (decoded from markup-input JSON).  The title and hook blocks are left
    /// for the caller.
    pub fn assemble_bodies(&self, template: &str, markup_index: &SlideIndex) -> Result<String, StageError> {
        self.check_template(template)?;
        Ok(self.splice(template, &self.render_pages(markup_index)))
    }

    /// Concatenated pages, ascending position.  Slides without text or
    /// audio are skipped.
    pub fn render_pages(&self, markup_index: &SlideIndex) -> String {
        let mut pages = String::new();
        let mut rendered = 0usize;

        for slide in markup_index {
            let Some(audio_url) = renderable_audio(slide) else {
                log::debug!("markup: skipping slide {} (missing text or audio)", slide.position());
                continue;
            };

            let text = display_text(&slide.text, self.max_text_chars);
            let page = PageFragment {
                position: slide.position(),
                text: &text,
                audio_url,
                image_url: slide.image_ref.as_deref().unwrap_or(&self.slide_image),
            };
            pages.push_str(&page.render());
            rendered += 1;
        }

        log::info!("markup: rendered {rendered} of {} page(s)", markup_index.len());
        pages
    }

    fn check_template(&self, template: &str) -> Result<(), StageError> {
        if template.contains(&self.placeholder) {
            Ok(())
        } else {
            Err(StageError::TemplateConfiguration {
                placeholder: self.placeholder.clone(),
            })
        }
    }

    fn splice(&self, template: &str, pages: &str) -> String {
        if template.matches(&self.placeholder).count() > 1 {
            log::warn!("markup: template has several placeholders; filling only the first");
        }
        template.replacen(&self.placeholder, pages, 1)
    }
}

/// Replace the fixed title and hook tokens in a single pass, so inserted
/// text is never scanned for tokens again.  Missing roles leave empty
/// strings behind.
pub fn fill_story_blocks(template: &str, narrated: &SlideIndex) -> String {
    let text_of = |slide: Option<&Slide>| slide.map(|s| escape_html(&s.text)).unwrap_or_default();
    let audio_of = |slide: Option<&Slide>| {
        slide
            .and_then(|s| s.audio_ref.as_deref())
            .map(escape_attr)
            .unwrap_or_default()
    };

    story_block_re()
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "storytitle" => text_of(narrated.title()),
            "storytitle_audiourl" => audio_of(narrated.title()),
            "hookline" => text_of(narrated.hook()),
            _ => audio_of(narrated.hook()),
        })
        .into_owned()
}

fn story_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{(storytitle_audiourl|storytitle|hookline_audiourl|hookline)\}\}")
            .expect("story block regex should compile")
    })
}

fn renderable_audio(slide: &Slide) -> Option<&str> {
    if slide.text.trim().is_empty() {
        return None;
    }
    slide.audio_ref.as_deref().filter(|url| !url.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
