//! Narrated web-story pipeline.
//!
//! Turns a news article into a multi-slide narrated story: scripted slides,
//! per-slide TTS audio, AMP story markup, a flat render-input document for the
//! video renderer, and the publishing bundle around them.
//!
//! The slide model and its wire formats live in [`slide`]; everything that
//! talks to the outside world sits behind the async capability traits in
//! [`article`], [`llm`] and [`narration`].

pub mod article;
pub mod config;
pub mod llm;
pub mod markup;
pub mod narration;
pub mod pipeline;
pub mod publish;
pub mod render;
pub mod slide;
