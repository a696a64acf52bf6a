//! Story scripting: article in, script [`SlideIndex`] out.
//!
//! ```text
//! Article ──▶ classify ──▶ outline ──▶ intro + per-slide narration
//!    │                                          │
//!    ├──▶ storytitle ──┐                        │
//!    └──▶ hookline ────┴──────▶ StoryScript ◀───┘ ──▶ SlideIndex (Script)
//! ```
//!
//! Classification, hookline, storytitle and individual narrations degrade to
//! fixed values when the model fails; the outline and intro calls abort the
//! stage.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::generator::{strip_code_fence, ChatPrompt, TextGenerator};
use super::prompt::{Language, PromptBuilder};
use crate::article::Article;
use crate::pipeline::error::{with_timeout, ExternalError, StageError};
use crate::pipeline::policy::OnFailure;
use crate::pipeline::stage::Stage;
use crate::slide::{Slide, SlideIndex};

/// Articles shorter than this are not worth classifying.
const MIN_CLASSIFY_CHARS: usize = 50;

/// Characters of the headline kept as the intro slide title.
const INTRO_TITLE_CHARS: usize = 80;

const NARRATION_UNAVAILABLE: &str = "Unable to generate narration for this slide.";
const CONTENT_UNAVAILABLE: &str = "Content unavailable";

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Category, subcategory and emotion of an article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub subcategory: String,
    pub emotion: String,
}

impl Classification {
    /// Value used when the article is too short or the model fails.
    pub fn fallback() -> Self {
        Self {
            category: "Unknown".into(),
            subcategory: "General".into(),
            emotion: "Neutral".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SlidePlan / StoryScript
// ---------------------------------------------------------------------------

/// One scripted slide before it enters a [`SlideIndex`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlidePlan {
    pub title: String,
    pub prompt: String,
    pub image_prompt: String,
    pub script: String,
}

impl SlidePlan {
    /// Narration text, falling back to the title, then the prompt, then a
    /// fixed placeholder when the script is blank.
    pub fn narration_text(&self) -> String {
        let script = self.script.trim();
        if !script.is_empty() {
            return script.to_string();
        }

        let fallback = [self.title.trim(), self.prompt.trim()]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or(CONTENT_UNAVAILABLE);
        log::warn!("script: empty narration for \"{}\", using \"{fallback}\"", self.title);
        fallback.to_string()
    }
}

#[derive(Deserialize)]
struct Outline {
    slides: Vec<OutlineSlide>,
}

#[derive(Deserialize)]
struct OutlineSlide {
    title: String,
    #[serde(default)]
    prompt: String,
}

/// Everything the scripting step produced for one article.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryScript {
    pub classification: Classification,
    pub storytitle: String,
    pub hookline: String,
    pub slides: Vec<SlidePlan>,
}

impl StoryScript {
    /// Title, hook and at most `number_of_slides` body slides.
    pub fn to_index(&self, number_of_slides: usize) -> SlideIndex {
        let mut builder = SlideIndex::builder(1);
        builder.push_lenient(Slide::title(self.storytitle.clone()));
        builder.push_lenient(Slide::hook(self.hookline.clone()));

        if self.slides.len() > number_of_slides {
            log::info!(
                "script: keeping {number_of_slides} of {} scripted slides",
                self.slides.len()
            );
        }
        for plan in self.slides.iter().take(number_of_slides) {
            builder.push_lenient(Slide::body(plan.narration_text()));
        }
        builder.build()
    }
}

// ---------------------------------------------------------------------------
// StoryScripter
// ---------------------------------------------------------------------------

/// Drives a [`TextGenerator`] through the scripting prompts.
pub struct StoryScripter {
    generator: Arc<dyn TextGenerator>,
    prompts: PromptBuilder,
    timeout: Duration,
}

impl StoryScripter {
    pub fn new(generator: Arc<dyn TextGenerator>, language: Language, timeout: Duration) -> Self {
        Self {
            generator,
            prompts: PromptBuilder::new(language),
            timeout,
        }
    }

    pub fn language(&self) -> Language {
        self.prompts.language()
    }

    /// Full script for `article` with at most `number_of_slides` body slides.
    pub async fn write(
        &self,
        article: &Article,
        number_of_slides: usize,
    ) -> Result<StoryScript, StageError> {
        let summary = article.summary();

        let classification = self.classify(&article.text).await?;
        log::info!(
            "script: classified as {}/{} ({})",
            classification.category,
            classification.subcategory,
            classification.emotion
        );

        let hookline = self.hookline(&article.title, &summary).await?;
        let storytitle = self.storytitle(&article.title, &summary).await?;
        let slides = self
            .slides(&classification, article, number_of_slides)
            .await?;

        log::info!("script: {} slide(s) scripted", slides.len());
        Ok(StoryScript {
            classification,
            storytitle,
            hookline,
            slides,
        })
    }

    pub async fn classify(&self, article_text: &str) -> Result<Classification, StageError> {
        if article_text.trim().chars().count() < MIN_CLASSIFY_CHARS {
            log::debug!("script: article too short to classify");
            return Ok(Classification::fallback());
        }

        let parsed = self
            .call(self.prompts.classify(article_text))
            .await
            .and_then(|reply| {
                serde_json::from_str::<Classification>(strip_code_fence(&reply))
                    .map_err(|e| ExternalError::Parse(e.to_string()))
            });

        OnFailure::Fallback(Classification::fallback()).resolve(Stage::Classify, parsed)
    }

    pub async fn hookline(&self, title: &str, summary: &str) -> Result<String, StageError> {
        let fallback = match self.language() {
            Language::Hindi => "यह खबर आपको चौंका सकती है!",
            Language::English => "This story might surprise you!",
        };
        let reply = self
            .call(self.prompts.hookline(title, summary))
            .await
            .map(|text| unquote(&text));

        OnFailure::Fallback(fallback.to_string()).resolve(Stage::Script, reply)
    }

    /// Localised story title; English stories keep the article title.
    pub async fn storytitle(&self, title: &str, summary: &str) -> Result<String, StageError> {
        let Some(prompt) = self.prompts.storytitle(title, summary) else {
            return Ok(title.trim().to_string());
        };
        let reply = self.call(prompt).await.map(|text| unquote(&text));
        OnFailure::Fallback(title.trim().to_string()).resolve(Stage::Script, reply)
    }

    /// Intro slide followed by one narrated slide per outline entry.
    async fn slides(
        &self,
        classification: &Classification,
        article: &Article,
        number_of_slides: usize,
    ) -> Result<Vec<SlidePlan>, StageError> {
        let outline_count = number_of_slides.saturating_sub(1).max(1);
        let outline = self.outline(classification, &article.text, outline_count).await?;

        let headline = article.headline();
        let intro = self
            .call(self.prompts.intro(&headline))
            .await
            .map_err(|e| StageError::external(Stage::Script, e))?;

        let mut slides = vec![SlidePlan {
            title: headline.chars().take(INTRO_TITLE_CHARS).collect(),
            prompt: "Intro slide with greeting and headline.".into(),
            image_prompt: format!("Vector-style illustration of Polaris presenting news: {headline}"),
            script: intro,
        }];

        let sketch = self.prompts.default_character_sketch();
        let narrations = join_all(outline.iter().map(|entry| {
            let prompt = self.prompts.narration(&entry.prompt, &sketch);
            async move {
                let reply = self.call(prompt).await;
                OnFailure::Fallback(NARRATION_UNAVAILABLE.to_string()).resolve(Stage::Script, reply)
            }
        }))
        .await;

        for (entry, narration) in outline.into_iter().zip(narrations) {
            slides.push(SlidePlan {
                image_prompt: format!("Modern vector-style visual for: {}", entry.title),
                title: entry.title,
                prompt: entry.prompt,
                script: narration?,
            });
        }

        Ok(slides)
    }

    /// Outline entries; an unparseable reply yields no entries.
    async fn outline(
        &self,
        classification: &Classification,
        article_text: &str,
        count: usize,
    ) -> Result<Vec<OutlineSlide>, StageError> {
        let prompt = self.prompts.outline(
            &classification.category,
            &classification.subcategory,
            &classification.emotion,
            article_text,
            count,
        );
        let reply = self
            .call(prompt)
            .await
            .map_err(|e| StageError::external(Stage::Script, e))?;

        match serde_json::from_str::<Outline>(strip_code_fence(&reply)) {
            Ok(outline) => Ok(outline.slides),
            Err(e) => {
                log::warn!("script: outline reply is not valid JSON ({e}); no slides outlined");
                Ok(Vec::new())
            }
        }
    }

    async fn call(&self, prompt: ChatPrompt) -> Result<String, ExternalError> {
        with_timeout(self.timeout, async {
            self.generator
                .generate(&prompt)
                .await
                .map_err(ExternalError::from)
        })
        .await
    }
}

fn unquote(text: &str) -> String {
    text.trim().trim_matches('"').trim().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
