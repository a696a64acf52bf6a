//! Latin-script Hindi to Devanagari for script slides.
//!
//! Only body narrations are converted; title and hook are generated in the
//! target script already.  A failed call keeps the original text.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use super::generator::TextGenerator;
use super::prompt::{Language, PromptBuilder};
use crate::pipeline::error::{with_timeout, ExternalError, StageError};
use crate::pipeline::policy::OnFailure;
use crate::pipeline::stage::Stage;
use crate::slide::{Role, SlideIndex};

pub struct Transliterator {
    generator: Arc<dyn TextGenerator>,
    prompts: PromptBuilder,
    timeout: Duration,
}

impl Transliterator {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self {
            generator,
            prompts: PromptBuilder::new(Language::Hindi),
            timeout,
        }
    }

    /// Convert one text; returns `text` unchanged on failure.
    pub async fn transliterate(&self, text: &str) -> Result<String, StageError> {
        let prompt = self.prompts.transliterate(text);
        let reply = with_timeout(self.timeout, async {
            self.generator
                .generate(&prompt)
                .await
                .map_err(ExternalError::from)
        })
        .await;

        OnFailure::Fallback(text.to_string()).resolve(Stage::Transliterate, reply)
    }

    /// New index with every non-blank body slide transliterated.
    pub async fn transliterate_index(&self, index: &SlideIndex) -> Result<SlideIndex, StageError> {
        let targets: Vec<_> = index
            .iter()
            .filter(|s| s.role == Role::Body && !s.text.trim().is_empty())
            .collect();

        let converted = join_all(targets.iter().map(|s| self.transliterate(&s.text))).await;

        let mut by_position = HashMap::with_capacity(targets.len());
        for (slide, text) in targets.iter().zip(converted) {
            by_position.insert(slide.position(), text?);
        }
        log::info!("transliterate: {} slide(s) converted", by_position.len());

        Ok(index.map_content(|slide| {
            let mut out = slide.clone();
            if let Some(text) = by_position.remove(&slide.position()) {
                out.text = text;
            }
            out
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatPrompt, LlmError};
    use crate::slide::Slide;
    use async_trait::async_trait;

    /// Upper-cases the text after the last blank line; fails on "fail".
    struct Shouting;

    #[async_trait]
    impl TextGenerator for Shouting {
        async fn generate(&self, prompt: &ChatPrompt) -> Result<String, LlmError> {
            let text = prompt.user.rsplit("\n\n").next().unwrap_or_default();
            if text == "fail" {
                Err(LlmError::EmptyResponse)
            } else {
                Ok(text.to_uppercase())
            }
        }
    }

    fn transliterator() -> Transliterator {
        Transliterator::new(Arc::new(Shouting), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn converts_bodies_only() {
        let mut b = SlideIndex::builder(1);
        b.push(Slide::title("shirshak")).unwrap();
        b.push(Slide::hook("hook")).unwrap();
        b.push(Slide::body("namaste")).unwrap();
        b.push(Slide::body("  ")).unwrap();
        let index = b.build();

        let out = transliterator().transliterate_index(&index).await.unwrap();

        assert_eq!(out.get(1).unwrap().text, "shirshak");
        assert_eq!(out.get(2).unwrap().text, "hook");
        assert_eq!(out.get(3).unwrap().text, "NAMASTE");
        assert_eq!(out.get(4).unwrap().text, "  ");
        assert_eq!(out.positions(), index.positions());
    }

    #[tokio::test]
    async fn failure_keeps_original_text() {
        let out = transliterator().transliterate("fail").await.unwrap();
        assert_eq!(out, "fail");
    }
}
