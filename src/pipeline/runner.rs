//! Story pipeline: wires the stages to their collaborators.
//!
//! [`StoryPipeline`] owns one `Arc<dyn …>` per external capability plus the
//! immutable [`AppConfig`].  Each public method is one stage (or a short run
//! of stages) and reports failures as [`StageError`] naming that stage.
//!
//! # Flow
//!
//! ```text
//! script_from_url ─▶ fetch ─▶ Article ─▶ StoryScripter ─▶ (Transliterator) ─▶ SlideIndex
//! narrate         ─▶ NarrationAttacher                                         ─▶ SlideIndex
//! markup          ─▶ MarkupAssembler                                           ─▶ HTML
//! render_input    ─▶ RenderInputBuilder                                        ─▶ flat JSON
//! cover           ─▶ CoverBuilder                                              ─▶ cover URL
//! publish         ─▶ slug + submission page + StoryMetadata ─▶ BlobStore       ─▶ PublishedStory
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};

use super::error::{with_timeout, StageError};
use super::policy::OnFailure;
use super::stage::Stage;
use crate::article::{Article, Fetcher, HttpFetcher};
use crate::config::AppConfig;
use crate::llm::{
    ApiTextGenerator, Classification, Language, MetadataGenerator, SeoMetadata, StoryScripter,
    TextGenerator, Transliterator,
};
use crate::markup::MarkupAssembler;
use crate::narration::{store_from_config, ApiSpeaker, BlobStore, NarrationAttacher, Speaker};
use crate::publish::{category_id, fill_submission, pick_user, ContentType, StoryMetadata, StoryUrls, Submission};
use crate::render::{CoverBuilder, HttpThumbnailer, RenderInputBuilder, Thumbnailer};
use crate::slide::renumber::for_markup;
use crate::slide::{codec, SlideIndex, StageSchema};

const HTML_CONTENT_TYPE: &str = "text/html";
const JSON_CONTENT_TYPE: &str = "application/json";

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// Result of the scripting stages.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedStory {
    pub article: Article,
    pub classification: Classification,
    /// Script-stage index: title at 1, hook at 2, bodies from 3.
    pub index: SlideIndex,
}

/// What the caller supplies to publish a finished story.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Submission template (the assembled story page).
    pub template: String,
    pub story_title: String,
    pub seo: SeoMetadata,
    pub content_type: ContentType,
    pub language: Language,
    /// Category name, looked up in the configured category table.
    pub category: String,
    /// Page image (`{{image0}}` and resized variants).
    pub image_url: String,
    /// Cover advertised in the metadata; defaults to `image_url`.
    pub cover_image_url: Option<String>,
}

/// A published story and where its pieces were stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedStory {
    pub urls: StoryUrls,
    pub html: String,
    pub metadata: StoryMetadata,
    pub html_url: String,
    pub metadata_url: String,
}

// ---------------------------------------------------------------------------
// StoryPipeline
// ---------------------------------------------------------------------------

pub struct StoryPipeline {
    config: AppConfig,
    generator: Arc<dyn TextGenerator>,
    speaker: Arc<dyn Speaker>,
    store: Arc<dyn BlobStore>,
    fetcher: Arc<dyn Fetcher>,
    thumbnailer: Arc<dyn Thumbnailer>,
}

impl StoryPipeline {
    pub fn new(
        config: AppConfig,
        generator: Arc<dyn TextGenerator>,
        speaker: Arc<dyn Speaker>,
        store: Arc<dyn BlobStore>,
        fetcher: Arc<dyn Fetcher>,
        thumbnailer: Arc<dyn Thumbnailer>,
    ) -> Self {
        Self {
            config,
            generator,
            speaker,
            store,
            fetcher,
            thumbnailer,
        }
    }

    /// Pipeline backed by the HTTP collaborators named in `config`.
    pub fn from_config(config: AppConfig) -> Self {
        let generator = Arc::new(ApiTextGenerator::from_config(&config.llm));
        let speaker = Arc::new(ApiSpeaker::from_config(&config.tts));
        let store = store_from_config(&config.storage);
        let fetcher = Arc::new(HttpFetcher::from_config(&config.fetch));
        let thumbnailer = Arc::new(HttpThumbnailer::from_config(&config.assets));
        Self::new(config, generator, speaker, store, fetcher, thumbnailer)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Scripting
    // -----------------------------------------------------------------------

    pub async fn fetch_article(&self, url: &str) -> Result<Article, StageError> {
        log::info!("{}: {url}", Stage::Fetch);
        let html = self.fetch(url).await?;
        Ok(Article::from_html(url, &html))
    }

    /// Script `article` into a title, a hook and up to `number_of_slides`
    /// bodies; Hindi scripts are transliterated to Devanagari.
    pub async fn script(
        &self,
        article: Article,
        language: Language,
        number_of_slides: usize,
    ) -> Result<ScriptedStory, StageError> {
        if number_of_slides == 0 {
            return Err(StageError::malformed(Stage::Script, "number of slides must be at least 1"));
        }

        let scripter = StoryScripter::new(self.generator.clone(), language, self.config.llm.timeout());
        let script = scripter.write(&article, number_of_slides).await?;
        let mut index = script.to_index(number_of_slides);

        if language == Language::Hindi {
            let transliterator = Transliterator::new(self.generator.clone(), self.config.llm.timeout());
            index = transliterator.transliterate_index(&index).await?;
        }

        log::info!("{}: {} slide(s)", Stage::Script, index.len());
        Ok(ScriptedStory {
            article,
            classification: script.classification,
            index,
        })
    }

    pub async fn script_from_url(
        &self,
        url: &str,
        language: Language,
        number_of_slides: usize,
    ) -> Result<ScriptedStory, StageError> {
        let article = self.fetch_article(url).await?;
        self.script(article, language, number_of_slides).await
    }

    // -----------------------------------------------------------------------
    // Narration and outputs
    // -----------------------------------------------------------------------

    pub async fn narrate(&self, index: &SlideIndex, voice: &str) -> Result<SlideIndex, StageError> {
        if index.is_empty() {
            return Err(StageError::malformed(Stage::Narration, "script has no slides"));
        }
        if !self.config.tts.is_known_voice(voice) {
            return Err(StageError::malformed(
                Stage::Narration,
                format!("unknown voice `{voice}`"),
            ));
        }

        NarrationAttacher::new(
            self.speaker.clone(),
            self.store.clone(),
            self.config.storage.media_prefix.clone(),
            self.config.tts.timeout(),
        )
        .attach(index, voice)
        .await
    }

    pub async fn fetch_template(&self, url: &str) -> Result<String, StageError> {
        log::info!("{}: template {url}", Stage::Fetch);
        self.fetch(url).await
    }

    pub fn markup(&self, template: &str, narrated: &SlideIndex) -> Result<String, StageError> {
        MarkupAssembler::from_config(&self.config.markup, &self.config.assets).assemble(template, narrated)
    }

    /// Body slides of a narrated index re-based for the markup stage, as
    /// markup-input JSON.
    pub fn markup_input(&self, narrated: &SlideIndex) -> Map<String, Value> {
        codec::encode(&for_markup(narrated), StageSchema::MarkupInput)
    }

    /// Splice pages from a markup-input index; title and hook blocks stay.
    pub fn markup_bodies(&self, template: &str, markup_index: &SlideIndex) -> Result<String, StageError> {
        MarkupAssembler::from_config(&self.config.markup, &self.config.assets)
            .assemble_bodies(template, markup_index)
    }

    pub fn render_input(&self, narrated: &SlideIndex) -> Map<String, Value> {
        RenderInputBuilder::from_config(&self.config.assets).build(narrated)
    }

    pub async fn cover(&self, narrated: &SlideIndex) -> Result<String, StageError> {
        CoverBuilder::new(
            self.thumbnailer.clone(),
            self.store.clone(),
            self.config.assets.clone(),
            self.config.storage.media_prefix.clone(),
            self.config.storage.timeout(),
        )
        .build(narrated)
        .await
    }

    // -----------------------------------------------------------------------
    // Publishing
    // -----------------------------------------------------------------------

    pub async fn metadata(&self, story_title: &str) -> Result<SeoMetadata, StageError> {
        MetadataGenerator::new(self.generator.clone(), self.config.llm.timeout())
            .generate(story_title)
            .await
    }

    /// Fill the submission page, then upload it and its metadata document
    /// as `{slug}.html` and `{slug}_metadata.json`.
    pub async fn publish(&self, request: PublishRequest) -> Result<PublishedStory, StageError> {
        let publish = &self.config.publish;

        let category = category_id(publish, &request.category).ok_or_else(|| {
            StageError::malformed(Stage::Publish, format!("unknown category `{}`", request.category))
        })?;
        let urls = StoryUrls::generate(&request.story_title, publish)
            .map_err(|e| StageError::malformed(Stage::Publish, e.to_string()))?;

        let submission = Submission {
            story_title: request.story_title.clone(),
            meta_description: request.seo.description.clone(),
            meta_keywords: request.seo.keywords.clone(),
            content_type: request.content_type,
            language: request.language,
            image_url: request.image_url.clone(),
            user: pick_user(publish),
        };
        let html = fill_submission(&request.template, &submission, &urls, publish, chrono::Utc::now());

        let cover = request.cover_image_url.as_deref().unwrap_or(&request.image_url);
        let metadata = StoryMetadata::new(
            &request.story_title,
            category,
            &request.seo,
            &urls,
            cover,
            request.language,
            publish,
        );
        let json = serde_json::to_vec_pretty(&metadata)
            .map_err(|e| StageError::malformed(Stage::Publish, e.to_string()))?;

        let html_key = format!("{}.html", urls.slug_nano);
        let json_key = format!("{}_metadata.json", urls.slug_nano);
        let html_url = self.upload(html.clone().into_bytes(), &html_key, HTML_CONTENT_TYPE).await?;
        let metadata_url = self.upload(json, &json_key, JSON_CONTENT_TYPE).await?;

        log::info!("{}: {} -> {html_url}", Stage::Publish, urls.canonical_url);
        Ok(PublishedStory {
            urls,
            html,
            metadata,
            html_url,
            metadata_url,
        })
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    async fn fetch(&self, url: &str) -> Result<String, StageError> {
        let result = with_timeout(self.config.fetch.timeout(), self.fetcher.fetch(url)).await;
        OnFailure::Propagate.resolve(Stage::Fetch, result)
    }

    async fn upload(&self, bytes: Vec<u8>, key: &str, content_type: &str) -> Result<String, StageError> {
        let result = with_timeout(
            self.config.storage.timeout(),
            self.store.put(bytes, key, content_type),
        )
        .await;
        OnFailure::Propagate.resolve(Stage::Publish, result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
