//! `Speaker` trait and the HTTP text-to-speech backend.

use async_trait::async_trait;

use crate::config::TtsConfig;
use crate::pipeline::error::ExternalError;

/// Async capability: text and voice in, encoded audio out.
///
/// Implementors must be `Send + Sync` so one speaker can serve concurrent
/// slide requests.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str, voice: &str) -> Result<Vec<u8>, ExternalError>;
}

/// Calls an OpenAI-style `audio/speech` endpoint and returns MP3 bytes.
///
/// The key is sent as an `api-key` header, the form Azure deployments
/// expect.
pub struct ApiSpeaker {
    client: reqwest::Client,
    config: TtsConfig,
}

impl ApiSpeaker {
    pub fn from_config(config: &TtsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Speaker for ApiSpeaker {
    async fn speak(&self, text: &str, voice: &str) -> Result<Vec<u8>, ExternalError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "input": text,
            "voice": voice
        });

        let mut req = self.client.post(&self.config.url).json(&body);
        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            req = req.header("api-key", key);
        }

        let response = req.send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ExternalError::EmptyResponse);
        }

        log::debug!("tts: {} bytes for {} chars ({voice})", bytes.len(), text.chars().count());
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config(url: String, api_key: Option<&str>) -> TtsConfig {
        TtsConfig {
            url,
            api_key: api_key.map(str::to_string),
            ..TtsConfig::default()
        }
    }

    #[tokio::test]
    async fn posts_model_input_and_voice() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/speech")
                    .header("api-key", "secret")
                    .json_body(json!({ "model": "tts-1-hd", "input": "Hello", "voice": "nova" }));
                then.status(200).body(vec![0xFF, 0xFB, 0x90]);
            })
            .await;

        let speaker = ApiSpeaker::from_config(&config(server.url("/speech"), Some("secret")));
        let audio = speaker.speak("Hello", "nova").await.unwrap();

        assert_eq!(audio, vec![0xFF, 0xFB, 0x90]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/speech");
                then.status(500);
            })
            .await;

        let speaker = ApiSpeaker::from_config(&config(server.url("/speech"), None));
        let err = speaker.speak("Hello", "nova").await.unwrap_err();
        assert_eq!(err, ExternalError::Status(500));
    }

    #[tokio::test]
    async fn empty_audio_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/speech");
                then.status(200).body("");
            })
            .await;

        let speaker = ApiSpeaker::from_config(&config(server.url("/speech"), None));
        let err = speaker.speak("Hello", "nova").await.unwrap_err();
        assert_eq!(err, ExternalError::EmptyResponse);
    }
}
