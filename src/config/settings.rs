//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to each stage
//! at construction time.  Nothing in the pipeline reads configuration from
//! global state.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::slide::CallToAction;

/// Environment variable overriding [`LlmConfig::api_key`].
pub const ENV_LLM_API_KEY: &str = "WEB_STORY_LLM_API_KEY";
/// Environment variable overriding [`TtsConfig::api_key`].
pub const ENV_TTS_API_KEY: &str = "WEB_STORY_TTS_API_KEY";
/// Environment variable overriding [`StorageConfig::token`].
pub const ENV_STORAGE_TOKEN: &str = "WEB_STORY_STORAGE_TOKEN";

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the text-generation endpoint (classification, scripting,
/// transliteration, SEO metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API (`{base_url}/v1/chat/completions`).
    pub base_url: String,
    /// API key: `None` for local providers.
    pub api_key: Option<String>,
    /// Model / deployment name.
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for one completion.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            api_key: None,
            model: "gpt-4".into(),
            temperature: 0.5,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for the speech-synthesis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Full URL of the TTS endpoint (OpenAI-style `audio/speech`).
    pub url: String,
    /// Sent as the `api-key` header when present.
    pub api_key: Option<String>,
    /// TTS model identifier.
    pub model: String,
    /// Voice used when the caller does not pick one.
    pub default_voice: String,
    /// Voices offered to users.
    pub voices: Vec<String>,
    /// Maximum seconds for one synthesis call.
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/v1/audio/speech".into(),
            api_key: None,
            model: "tts-1-hd".into(),
            default_voice: "alloy".into(),
            voices: ["alloy", "echo", "fable", "onyx", "nova", "shimmer"]
                .iter()
                .map(|v| v.to_string())
                .collect(),
            timeout_secs: 60,
        }
    }
}

impl TtsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `true` when `voice` is one of the configured voices.
    pub fn is_known_voice(&self, voice: &str) -> bool {
        self.voices.iter().any(|v| v == voice)
    }
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

/// Where uploaded bytes go.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StorageBackend {
    /// Write under [`StorageConfig::local_dir`].
    Local,
    /// `PUT {upload_url}/{key}` over HTTP.
    Http,
}

/// Settings for the blob store holding audio, HTML and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Upload endpoint for [`StorageBackend::Http`].
    pub upload_url: String,
    /// Bearer token for the upload endpoint.
    pub token: Option<String>,
    /// Root directory for [`StorageBackend::Local`].
    pub local_dir: String,
    /// Public base URL; an object `key` is served at `{cdn_base}{key}`.
    pub cdn_base: String,
    /// Key prefix for narration audio and thumbnails.
    pub media_prefix: String,
    /// Maximum seconds for one upload.
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            upload_url: "http://localhost:9000/upload".into(),
            token: None,
            local_dir: "output".into(),
            cdn_base: "https://cdn.suvichaar.org/".into(),
            media_prefix: "media/".into(),
            timeout_secs: 30,
        }
    }
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// FetchConfig
// ---------------------------------------------------------------------------

/// Settings for article and template downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// AssetsConfig
// ---------------------------------------------------------------------------

/// Fixed platform assets used by the markup and render stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Background image of every AMP body slide.
    pub slide_image: String,
    /// Image used by render-input and cover slides without their own image.
    pub cover_image: String,
    /// Author named in the `- {author}` caption.
    pub author_name: String,
    /// Closing call-to-action text.
    pub cta_text: String,
    /// Closing call-to-action caption.
    pub cta_caption: String,
    /// Pre-recorded narration for the call-to-action slide.
    pub cta_audio: String,
    /// Image of the call-to-action slide.
    pub cta_image: String,
    /// Thumbnail service endpoint for cover images.
    pub thumbnail_url: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        let cta = CallToAction::default();
        Self {
            slide_image: "https://media.suvichaar.org/upload/polaris/polarisslide.png".into(),
            cover_image: "https://media.suvichaar.org/upload/polaris/polariscover.png".into(),
            author_name: "Suvichaar".into(),
            cta_text: cta.text,
            cta_caption: cta.caption,
            cta_audio: cta.audio_ref,
            cta_image: cta.image_ref,
            thumbnail_url: "https://remotion.suvichaar.org/api/generate-news-thumbnail".into(),
        }
    }
}

impl AssetsConfig {
    /// The configured closing slide.
    pub fn call_to_action(&self) -> CallToAction {
        CallToAction {
            text: self.cta_text.clone(),
            caption: self.cta_caption.clone(),
            audio_ref: self.cta_audio.clone(),
            image_ref: self.cta_image.clone(),
        }
    }

    /// Attribution caption for render-input and cover slides.
    pub fn caption(&self) -> String {
        format!("- {}", self.author_name)
    }
}

// ---------------------------------------------------------------------------
// MarkupConfig
// ---------------------------------------------------------------------------

/// AMP markup assembly settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Marker replaced by the concatenated slide pages.
    pub placeholder: String,
    /// Maximum visible characters of slide text.
    pub max_text_chars: usize,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            placeholder: "<!--INSERT_SLIDES_HERE-->".into(),
            max_text_chars: 180,
        }
    }
}

// ---------------------------------------------------------------------------
// PublishConfig
// ---------------------------------------------------------------------------

/// Publishing settings: URLs, attribution users, categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Canonical story page base (`{story_base_url}{slug}`).
    pub story_base_url: String,
    /// Static HTML base (`{html_base_url}{slug}.html`).
    pub html_base_url: String,
    /// Image-handler CDN base used for resized cover URLs.
    pub media_cdn: String,
    /// Bucket named inside image-handler requests.
    pub media_bucket: String,
    /// Logo advertised in story metadata.
    pub story_logo: String,
    /// Publisher id written into metadata.
    pub publisher_id: u32,
    /// Attribution users and their profile URLs.
    pub users: BTreeMap<String, String>,
    /// Category name to numeric id.
    pub categories: BTreeMap<String, u32>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        let users = [
            (
                "Mayank",
                "https://www.instagram.com/iamkrmayank?igsh=eW82NW1qbjh4OXY2&utm_source=qr",
            ),
            (
                "Onip",
                "https://www.instagram.com/onip.mathur/profilecard/?igsh=MW5zMm5qMXhybGNmdA==",
            ),
            ("Naman", "https://njnaman.in/"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let categories = [
            "Art",
            "Travel",
            "Entertainment",
            "Literature",
            "Books",
            "Sports",
            "History",
            "Culture",
            "Wildlife",
            "Spiritual",
            "Food",
        ]
        .into_iter()
        .zip(1u32..)
        .map(|(name, id)| (name.to_string(), id))
        .collect();

        Self {
            story_base_url: "https://suvichaar.org/stories/".into(),
            html_base_url: "https://stories.suvichaar.org/".into(),
            media_cdn: "https://media.suvichaar.org/".into(),
            media_bucket: "suvichaarapp".into(),
            story_logo:
                "https://media.suvichaar.org/filters:resize/96x96/media/brandasset/suvichaariconblack.png"
                    .into(),
            publisher_id: 1,
            users,
            categories,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use web_story::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// assert_eq!(config.markup.max_text_chars, 180);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub tts: TtsConfig,
    pub storage: StorageConfig,
    pub fetch: FetchConfig,
    pub assets: AssetsConfig,
    pub markup: MarkupConfig,
    pub publish: PublishConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`,
    /// then apply environment overrides for secrets.
    ///
    /// Returns the defaults when the file does not exist yet.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&AppPaths::new().settings_file)?;
        config.apply_env();
        Ok(config)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns `true` when no `settings.toml` file exists yet.
    pub fn is_first_run() -> bool {
        !AppPaths::new().settings_file.exists()
    }

    /// Override secrets from the environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(key) = non_empty(ENV_LLM_API_KEY) {
            self.llm.api_key = Some(key);
        }
        if let Some(key) = non_empty(ENV_TTS_API_KEY) {
            self.tts.api_key = Some(key);
        }
        if let Some(token) = non_empty(ENV_STORAGE_TOKEN) {
            self.storage.token = Some(token);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// A default `AppConfig` survives a TOML round trip.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.llm.base_url, loaded.llm.base_url);
        assert_eq!(original.llm.model, loaded.llm.model);
        assert_eq!(original.tts.voices, loaded.tts.voices);
        assert_eq!(original.storage.backend, loaded.storage.backend);
        assert_eq!(original.assets.cta_audio, loaded.assets.cta_audio);
        assert_eq!(original.markup.placeholder, loaded.markup.placeholder);
        assert_eq!(original.publish.users, loaded.publish.users);
        assert_eq!(original.publish.categories, loaded.publish.categories);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.tts.default_voice, "alloy");
        assert_eq!(config.markup.max_text_chars, 180);
    }

    /// A partial file keeps defaults for everything it leaves out.
    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[tts]\ndefault_voice = \"nova\"\n").unwrap();

        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config.tts.default_voice, "nova");
        assert_eq!(config.tts.model, "tts-1-hd");
        assert_eq!(config.publish.publisher_id, 1);
    }

    #[test]
    fn default_values_match_platform_constants() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.tts.voices.len(), 6);
        assert!(cfg.tts.is_known_voice("shimmer"));
        assert!(!cfg.tts.is_known_voice("robot"));
        assert_eq!(cfg.publish.categories["Art"], 1);
        assert_eq!(cfg.publish.categories["Food"], 11);
        assert_eq!(cfg.publish.users.len(), 3);
        assert_eq!(cfg.assets.caption(), "- Suvichaar");
        assert_eq!(cfg.assets.call_to_action(), CallToAction::default());
    }

    #[test]
    fn env_overrides_apply_only_non_empty_values() {
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(|name| match name {
            ENV_LLM_API_KEY => Some("sk-test".into()),
            ENV_TTS_API_KEY => Some(String::new()),
            _ => None,
        });

        assert_eq!(cfg.llm.api_key.as_deref(), Some("sk-test"));
        assert!(cfg.tts.api_key.is_none());
        assert!(cfg.storage.token.is_none());
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.llm.base_url = "https://api.openai.com".into();
        cfg.llm.api_key = Some("sk-test".into());
        cfg.storage.backend = StorageBackend::Http;
        cfg.markup.max_text_chars = 120;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.llm.base_url, "https://api.openai.com");
        assert_eq!(loaded.llm.api_key, Some("sk-test".into()));
        assert_eq!(loaded.storage.backend, StorageBackend::Http);
        assert_eq!(loaded.markup.max_text_chars, 120);
    }
}
