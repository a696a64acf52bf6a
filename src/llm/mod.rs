//! Text generation for story scripting.
//!
//! This module provides:
//! * [`TextGenerator`]: async trait implemented by all generator backends.
//! * [`ApiTextGenerator`]: OpenAI-compatible REST API backend.
//! * [`PromptBuilder`]: builds the English/Hindi scripting prompts.
//! * [`StoryScripter`]: classification, hookline, storytitle and slide
//!   narrations for one article.
//! * [`Transliterator`]: Latin-script Hindi to Devanagari.
//! * [`MetadataGenerator`]: SEO description, keywords and filter tags.
//! * [`LlmError`]: error variants for LLM operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use web_story::article::Article;
//! use web_story::config::AppConfig;
//! use web_story::llm::{ApiTextGenerator, Language, StoryScripter};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let generator = Arc::new(ApiTextGenerator::from_config(&config.llm));
//!     let scripter = StoryScripter::new(generator, Language::English, config.llm.timeout());
//!
//!     let article = Article::from_html("https://example.com", "<title>Hi</title><p>Body</p>");
//!     let script = scripter.write(&article, 5).await.unwrap();
//!     println!("{} slides", script.to_index(5).len());
//! }
//! ```

pub mod generator;
pub mod metadata;
pub mod prompt;
pub mod script;
pub mod transliterate;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use generator::{ApiTextGenerator, ChatPrompt, LlmError, TextGenerator};
pub use metadata::{MetadataGenerator, SeoMetadata};
pub use prompt::{Language, PromptBuilder};
pub use script::{Classification, SlidePlan, StoryScript, StoryScripter};
pub use transliterate::Transliterator;
