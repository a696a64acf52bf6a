//! Flat render-input JSON for the external video renderer.
//!
//! Every slide gets `s{p}paragraph1`, `s{p}audio1`, `s{p}image1` and
//! `s{p}paragraph2`; the last slide is always the call-to-action.

use serde_json::{Map, Value};

use crate::config::AssetsConfig;
use crate::slide::codec::encode;
use crate::slide::renumber::for_render;
use crate::slide::{CallToAction, SlideIndex, StageSchema};

pub struct RenderInputBuilder {
    default_image: String,
    caption: String,
    cta: CallToAction,
}

impl RenderInputBuilder {
    pub fn new(default_image: impl Into<String>, caption: impl Into<String>, cta: CallToAction) -> Self {
        Self {
            default_image: default_image.into(),
            caption: caption.into(),
            cta,
        }
    }

    pub fn from_config(assets: &AssetsConfig) -> Self {
        Self::new(&assets.cover_image, assets.caption(), assets.call_to_action())
    }

    /// Renderer ordering with platform defaults applied: title, bodies,
    /// hook, call-to-action.
    pub fn build_index(&self, narrated: &SlideIndex) -> SlideIndex {
        let with_defaults = narrated.map_content(|slide| {
            let mut out = slide.clone();
            if out.image_ref.is_none() {
                out.image_ref = Some(self.default_image.clone());
            }
            if out.caption.is_none() {
                out.caption = Some(self.caption.clone());
            }
            out
        });
        for_render(&with_defaults, &self.cta)
    }

    /// Flat JSON object, keys in slide order.
    pub fn build(&self, narrated: &SlideIndex) -> Map<String, Value> {
        let index = self.build_index(narrated);
        log::info!("render-input: {} slide(s) including call-to-action", index.len());
        encode(&index, StageSchema::RenderInput)
    }
}
