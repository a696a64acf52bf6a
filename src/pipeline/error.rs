//! Error types shared by every stage.
//!
//! * [`ExternalError`]: a collaborator call (TTS, blob store, fetch, LLM,
//!   thumbnail service) failed.
//! * [`StageError`]: what a stage reports to its caller; always names the
//!   failing [`Stage`].

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use super::stage::Stage;
use crate::llm::LlmError;

// ---------------------------------------------------------------------------
// ExternalError
// ---------------------------------------------------------------------------

/// Failure of one call to an external collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExternalError {
    /// Transport or connection error.
    #[error("request failed: {0}")]
    Request(String),

    /// The call did not finish within the caller's timeout.
    #[error("call timed out")]
    Timeout,

    /// The collaborator answered with a non-success HTTP status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The response body had the wrong content type (e.g. a template URL
    /// that does not serve HTML).
    #[error("unexpected content type: {0}")]
    ContentType(String),

    /// The response could not be parsed.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The collaborator returned nothing usable.
    #[error("empty response")]
    EmptyResponse,

    /// Local I/O failed (filesystem blob store, temp files).
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for ExternalError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ExternalError::Timeout
        } else if let Some(status) = e.status() {
            ExternalError::Status(status.as_u16())
        } else {
            ExternalError::Request(e.to_string())
        }
    }
}

impl From<std::io::Error> for ExternalError {
    fn from(e: std::io::Error) -> Self {
        ExternalError::Io(e.to_string())
    }
}

impl From<LlmError> for ExternalError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Request(msg) => ExternalError::Request(msg),
            LlmError::Timeout => ExternalError::Timeout,
            LlmError::Status(code) => ExternalError::Status(code),
            LlmError::Parse(msg) => ExternalError::Parse(msg),
            LlmError::EmptyResponse => ExternalError::EmptyResponse,
        }
    }
}

/// Run `call`, failing with [`ExternalError::Timeout`] once `limit` elapses.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, ExternalError>
where
    F: Future<Output = Result<T, ExternalError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_elapsed) => Err(ExternalError::Timeout),
    }
}

// ---------------------------------------------------------------------------
// StageError
// ---------------------------------------------------------------------------

/// Failure reported by a pipeline stage.
///
/// Malformed slide mappings are normally absorbed by the codec into a
/// shorter index; [`StageError::MalformedInput`] is only raised when a stage
/// has nothing left to work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    #[error("{stage} stage: malformed input: {detail}")]
    MalformedInput { stage: Stage, detail: String },

    #[error("{stage} stage: external call failed: {source}")]
    ExternalCall {
        stage: Stage,
        #[source]
        source: ExternalError,
    },

    /// The markup template has no slide placeholder; nothing was substituted.
    #[error("template configuration error: placeholder `{placeholder}` not found in template")]
    TemplateConfiguration { placeholder: String },
}

impl StageError {
    pub fn external(stage: Stage, source: impl Into<ExternalError>) -> Self {
        StageError::ExternalCall {
            stage,
            source: source.into(),
        }
    }

    pub fn malformed(stage: Stage, detail: impl Into<String>) -> Self {
        StageError::MalformedInput {
            stage,
            detail: detail.into(),
        }
    }

    /// Stage that raised the error, when the error is tied to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            StageError::MalformedInput { stage, .. } | StageError::ExternalCall { stage, .. } => {
                Some(*stage)
            }
            StageError::TemplateConfiguration { .. } => Some(Stage::Markup),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_timeout_passes_result_through() {
        let out = with_timeout(Duration::from_secs(1), async { Ok::<_, ExternalError>(7) }).await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test]
    async fn with_timeout_fails_slow_calls() {
        let out = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ExternalError>(())
        })
        .await;
        assert_eq!(out, Err(ExternalError::Timeout));
    }

    #[test]
    fn llm_errors_map_one_to_one() {
        assert_eq!(ExternalError::from(LlmError::Timeout), ExternalError::Timeout);
        assert_eq!(
            ExternalError::from(LlmError::Status(429)),
            ExternalError::Status(429)
        );
    }

    #[test]
    fn stage_error_names_the_stage() {
        let err = StageError::external(Stage::Narration, ExternalError::Status(500));
        assert_eq!(err.stage(), Some(Stage::Narration));
        assert!(err.to_string().contains("narration"));

        let tmpl = StageError::TemplateConfiguration {
            placeholder: "<!--INSERT_SLIDES_HERE-->".into(),
        };
        assert_eq!(tmpl.stage(), Some(Stage::Markup));
        assert!(tmpl.to_string().contains("INSERT_SLIDES_HERE"));
    }
}
