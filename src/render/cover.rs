//! Cover thumbnail: request JSON, thumbnail service call and upload.
//!
//! The thumbnail service takes one `slide{p}` object per narrated slide:
//!
//! ```json
//! { "slide1": { "s1paragraph1": "…", "s1audio1": "…", "s1image1": "…", "s1paragraph2": "Suvichaar" } }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::AssetsConfig;
use crate::narration::BlobStore;
use crate::pipeline::error::{with_timeout, ExternalError, StageError};
use crate::pipeline::policy::OnFailure;
use crate::pipeline::stage::Stage;
use crate::slide::SlideIndex;

pub const COVER_CONTENT_TYPE: &str = "image/png";

/// Thumbnail request for a narrated index, slides in position order.
pub fn cover_request(narrated: &SlideIndex, assets: &AssetsConfig) -> Map<String, Value> {
    let mut out = Map::new();
    for slide in narrated {
        let p = slide.position();
        let mut entry = Map::new();
        entry.insert(format!("s{p}paragraph1"), Value::String(slide.text.clone()));
        entry.insert(
            format!("s{p}audio1"),
            Value::String(slide.audio_ref.clone().unwrap_or_default()),
        );
        entry.insert(
            format!("s{p}image1"),
            Value::String(slide.image_ref.clone().unwrap_or_else(|| assets.cover_image.clone())),
        );
        entry.insert(format!("s{p}paragraph2"), Value::String(assets.author_name.clone()));
        out.insert(format!("slide{p}"), Value::Object(entry));
    }
    out
}

// ---------------------------------------------------------------------------
// Thumbnailer
// ---------------------------------------------------------------------------

/// Async capability: cover request in, PNG bytes out.
#[async_trait]
pub trait Thumbnailer: Send + Sync {
    async fn render(&self, request: &Map<String, Value>) -> Result<Vec<u8>, ExternalError>;
}

/// POSTs the request to the thumbnail service.
pub struct HttpThumbnailer {
    client: reqwest::Client,
    url: String,
}

impl HttpThumbnailer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn from_config(assets: &AssetsConfig) -> Self {
        Self::new(&assets.thumbnail_url)
    }
}

#[async_trait]
impl Thumbnailer for HttpThumbnailer {
    async fn render(&self, request: &Map<String, Value>) -> Result<Vec<u8>, ExternalError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ExternalError::EmptyResponse);
        }
        Ok(bytes.to_vec())
    }
}

// ---------------------------------------------------------------------------
// CoverBuilder
// ---------------------------------------------------------------------------

/// Renders the cover and uploads it as `{prefix}cover_{timestamp}.png`.
pub struct CoverBuilder {
    thumbnailer: Arc<dyn Thumbnailer>,
    store: Arc<dyn BlobStore>,
    assets: AssetsConfig,
    media_prefix: String,
    timeout: Duration,
}

impl CoverBuilder {
    pub fn new(
        thumbnailer: Arc<dyn Thumbnailer>,
        store: Arc<dyn BlobStore>,
        assets: AssetsConfig,
        media_prefix: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            thumbnailer,
            store,
            assets,
            media_prefix: media_prefix.into(),
            timeout,
        }
    }

    /// Public URL of the uploaded cover.
    pub async fn build(&self, narrated: &SlideIndex) -> Result<String, StageError> {
        if narrated.is_empty() {
            return Err(StageError::malformed(Stage::Cover, "no slides to build a cover from"));
        }

        let request = cover_request(narrated, &self.assets);
        let result = self.render_and_upload(&request).await;

        let url = OnFailure::Propagate.resolve(Stage::Cover, result)?;
        log::info!("cover: uploaded {url}");
        Ok(url)
    }

    async fn render_and_upload(&self, request: &Map<String, Value>) -> Result<String, ExternalError> {
        let png = with_timeout(self.timeout, self.thumbnailer.render(request)).await?;
        let key = format!(
            "{}cover_{}.png",
            self.media_prefix,
            chrono::Utc::now().timestamp()
        );
        with_timeout(self.timeout, self.store.put(png, &key, COVER_CONTENT_TYPE)).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::Slide;
    use httpmock::prelude::*;
    use std::sync::Mutex;

    struct FixedThumbnailer(Option<Vec<u8>>);

    #[async_trait]
    impl Thumbnailer for FixedThumbnailer {
        async fn render(&self, _request: &Map<String, Value>) -> Result<Vec<u8>, ExternalError> {
            self.0.clone().ok_or(ExternalError::Status(502))
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        keys: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BlobStore for MemoryStore {
        async fn put(&self, _bytes: Vec<u8>, key: &str, _content_type: &str) -> Result<String, ExternalError> {
            self.keys.lock().unwrap().push(key.to_string());
            Ok(format!("https://cdn/{key}"))
        }
    }

    fn narrated() -> SlideIndex {
        let mut b = SlideIndex::builder(1);
        b.push(Slide::title("Title").with_audio("https://cdn/t.mp3", "nova")).unwrap();
        b.push(Slide::hook("Hook")).unwrap();
        b.build()
    }

    #[test]
    fn request_has_one_object_per_slide() {
        let assets = AssetsConfig::default();
        let req = cover_request(&narrated(), &assets);

        assert_eq!(req.len(), 2);
        assert_eq!(req["slide1"]["s1paragraph1"], "Title");
        assert_eq!(req["slide1"]["s1audio1"], "https://cdn/t.mp3");
        assert_eq!(req["slide1"]["s1image1"], Value::String(assets.cover_image.clone()));
        assert_eq!(req["slide2"]["s2audio1"], "");
        assert_eq!(req["slide2"]["s2paragraph2"], "Suvichaar");
    }

    #[tokio::test]
    async fn cover_is_uploaded_under_media_prefix() {
        let store = Arc::new(MemoryStore::default());
        let builder = CoverBuilder::new(
            Arc::new(FixedThumbnailer(Some(vec![0x89, b'P', b'N', b'G']))),
            store.clone(),
            AssetsConfig::default(),
            "media/",
            Duration::from_secs(1),
        );

        let url = builder.build(&narrated()).await.unwrap();
        assert!(url.starts_with("https://cdn/media/cover_"));
        assert!(url.ends_with(".png"));
        assert_eq!(store.keys.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn thumbnail_failure_is_a_cover_error() {
        let builder = CoverBuilder::new(
            Arc::new(FixedThumbnailer(None)),
            Arc::new(MemoryStore::default()),
            AssetsConfig::default(),
            "media/",
            Duration::from_secs(1),
        );
        let err = builder.build(&narrated()).await.unwrap_err();
        assert_eq!(
            err,
            StageError::ExternalCall {
                stage: Stage::Cover,
                source: ExternalError::Status(502)
            }
        );
    }

    #[tokio::test]
    async fn http_thumbnailer_posts_request_json() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate-news-thumbnail")
                    .json_body_partial(r#"{ "slide1": { "s1paragraph1": "Title" } }"#);
                then.status(200).body(vec![1, 2, 3]);
            })
            .await;

        let thumbnailer = HttpThumbnailer::new(server.url("/api/generate-news-thumbnail"));
        let png = thumbnailer
            .render(&cover_request(&narrated(), &AssetsConfig::default()))
            .await
            .unwrap();

        assert_eq!(png, vec![1, 2, 3]);
        mock.assert_async().await;
    }
}
