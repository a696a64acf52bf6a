//! Pipeline stages.
//!
//! [`Stage`] names each step of a story run.  Errors carry it so a caller can
//! tell which step failed, and the orchestrator logs every transition.
//!
//! ```text
//! Fetch ──▶ Classify ──▶ Script ──▶ (Transliterate) ──▶ Narration
//!                                                        │
//!                               ┌────────────────────────┤
//!                               ▼                        ▼
//!                             Markup                RenderInput ──▶ Cover
//!                               │
//!                               ▼
//!                            Publish
//! ```

use std::fmt;

/// One step of the story pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Download article HTML or a template.
    Fetch,
    /// Category / subcategory / emotion detection.
    Classify,
    /// Storytitle, hookline and slide narration scripts.
    Script,
    /// Latin-script Hindi to Devanagari.
    Transliterate,
    /// Per-slide TTS and audio upload.
    Narration,
    /// AMP story markup assembly.
    Markup,
    /// Flat render-input JSON for the video renderer.
    RenderInput,
    /// Cover thumbnail request and upload.
    Cover,
    /// SEO metadata, final HTML and bundle upload.
    Publish,
}

impl Stage {
    /// Every stage in pipeline order.
    pub const ALL: [Stage; 9] = [
        Stage::Fetch,
        Stage::Classify,
        Stage::Script,
        Stage::Transliterate,
        Stage::Narration,
        Stage::Markup,
        Stage::RenderInput,
        Stage::Cover,
        Stage::Publish,
    ];

    /// Short label used in logs and error messages.
    ///
    /// ```
    /// use web_story::pipeline::Stage;
    ///
    /// assert_eq!(Stage::Narration.label(), "narration");
    /// assert_eq!(Stage::RenderInput.label(), "render-input");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Classify => "classify",
            Stage::Script => "script",
            Stage::Transliterate => "transliterate",
            Stage::Narration => "narration",
            Stage::Markup => "markup",
            Stage::RenderInput => "render-input",
            Stage::Cover => "cover",
            Stage::Publish => "publish",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
