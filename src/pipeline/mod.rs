//! Stage plumbing and the story orchestrator.
//!
//! * [`error`]: [`ExternalError`], [`StageError`] and [`with_timeout`].
//! * [`stage`]: [`Stage`], the name every error carries.
//! * [`policy`]: [`OnFailure`], propagate or fall back per call site.
//! * [`runner`]: [`StoryPipeline`], one method per stage.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use web_story::config::AppConfig;
//! use web_story::llm::Language;
//! use web_story::pipeline::StoryPipeline;
//!
//! # async fn example() -> Result<(), web_story::pipeline::StageError> {
//! let pipeline = StoryPipeline::from_config(AppConfig::default());
//! let story = pipeline
//!     .script_from_url("https://news.example/article", Language::English, 5)
//!     .await?;
//! let narrated = pipeline.narrate(&story.index, "alloy").await?;
//! let render = pipeline.render_input(&narrated);
//! # let _ = render;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod policy;
pub mod runner;
pub mod stage;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use error::{with_timeout, ExternalError, StageError};
pub use policy::OnFailure;
pub use runner::{PublishRequest, PublishedStory, ScriptedStory, StoryPipeline};
pub use stage::Stage;
