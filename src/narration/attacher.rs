//! Attach synthesized narration to every slide that lacks it.
//!
//! ```text
//! SlideIndex ──▶ [slides without audio] ──▶ Speaker::speak ──▶ BlobStore::put
//!      │                                     (concurrent, each call bounded)
//!      └────────────── map_content by position ◀──────────── audio URLs
//! ```
//!
//! One failed call fails the whole stage; a partially narrated index is
//! never returned.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;

use super::speaker::Speaker;
use super::store::BlobStore;
use crate::pipeline::error::{with_timeout, ExternalError, StageError};
use crate::pipeline::policy::OnFailure;
use crate::pipeline::stage::Stage;
use crate::slide::{Slide, SlideIndex};

/// Content type of narration uploads.
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

pub struct NarrationAttacher {
    speaker: Arc<dyn Speaker>,
    store: Arc<dyn BlobStore>,
    media_prefix: String,
    timeout: Duration,
}

impl NarrationAttacher {
    /// `timeout` bounds each synthesis call and each upload separately.
    pub fn new(
        speaker: Arc<dyn Speaker>,
        store: Arc<dyn BlobStore>,
        media_prefix: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            speaker,
            store,
            media_prefix: media_prefix.into(),
            timeout,
        }
    }

    /// New index where every slide carries audio narrated with `voice`.
    ///
    /// Slides that already have audio are kept as they are and cost no call.
    pub async fn attach(&self, index: &SlideIndex, voice: &str) -> Result<SlideIndex, StageError> {
        if voice.trim().is_empty() {
            return Err(StageError::malformed(Stage::Narration, "no voice selected"));
        }

        let pending: Vec<&Slide> = index.iter().filter(|s| !s.is_narrated()).collect();
        log::info!(
            "narration: {} of {} slide(s) need audio (voice {voice})",
            pending.len(),
            index.len()
        );

        let narrated = try_join_all(pending.iter().map(|slide| async move {
            let result = self.narrate(slide, voice).await;
            OnFailure::Propagate
                .resolve(Stage::Narration, result)
                .map(|url| (slide.position(), url))
        }))
        .await?;

        let mut audio: HashMap<u32, String> = narrated.into_iter().collect();
        let out = index.map_content(|slide| match audio.remove(&slide.position()) {
            Some(url) => slide.clone().with_audio(url, voice),
            None => slide.clone(),
        });

        log::info!("narration: done");
        Ok(out)
    }

    /// Synthesize and upload one slide; no audio or a blank URL is an error.
    async fn narrate(&self, slide: &Slide, voice: &str) -> Result<String, ExternalError> {
        let bytes = with_timeout(self.timeout, self.speaker.speak(&slide.text, voice)).await?;
        if bytes.is_empty() {
            return Err(ExternalError::EmptyResponse);
        }

        let key = format!("{}tts_{}.mp3", self.media_prefix, uuid::Uuid::new_v4().simple());
        let url = with_timeout(self.timeout, self.store.put(bytes, &key, AUDIO_CONTENT_TYPE)).await?;
        if url.trim().is_empty() {
            return Err(ExternalError::EmptyResponse);
        }

        log::debug!("narration: slide {} -> {url}", slide.position());
        Ok(url)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
