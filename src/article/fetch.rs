//! `Fetcher` trait and its HTTP implementation.
//!
//! Used for both article pages and remote AMP templates.  Anything that is
//! not served as HTML is rejected before the body is read.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::FetchConfig;
use crate::pipeline::error::{with_timeout, ExternalError};

/// Content types accepted as HTML.
const HTML_CONTENT_TYPES: [&str; 2] = ["text/html", "application/xhtml"];

/// Async capability: URL in, page text out.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ExternalError>;
}

/// Downloads pages with `reqwest`, bounded by a per-call timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: config.timeout(),
        }
    }

    async fn fetch_inner(&self, url: &str) -> Result<String, ExternalError> {
        let response = self.client.get(url).send().await?.error_for_status()?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if !HTML_CONTENT_TYPES.iter().any(|t| content_type.contains(t)) {
            return Err(ExternalError::ContentType(content_type));
        }

        let body = response.text().await?;
        log::debug!("fetch: {url} returned {} bytes", body.len());
        Ok(body)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ExternalError> {
        with_timeout(self.timeout, self.fetch_inner(url)).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::from_config(&FetchConfig { timeout_secs: 5 })
    }

    #[tokio::test]
    async fn returns_html_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/story");
                then.status(200)
                    .header("content-type", "text/html; charset=utf-8")
                    .body("<html><title>Hi</title></html>");
            })
            .await;

        let body = fetcher().fetch(&server.url("/story")).await.unwrap();
        assert!(body.contains("<title>Hi</title>"));
    }

    #[tokio::test]
    async fn rejects_non_html_content() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data");
                then.status(200)
                    .header("content-type", "application/json")
                    .body("{}");
            })
            .await;

        let err = fetcher().fetch(&server.url("/data")).await.unwrap_err();
        assert_eq!(err, ExternalError::ContentType("application/json".into()));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let err = fetcher().fetch(&server.url("/missing")).await.unwrap_err();
        assert_eq!(err, ExternalError::Status(404));
    }
}
