//! Per-stage failure policy.
//!
//! Some stages must surface collaborator failures (narration: a story with a
//! silent slide is broken), others degrade to a known value (transliteration
//! keeps the original text, classification falls back to a neutral label).
//! Each call site states its policy explicitly with [`OnFailure`] instead of
//! swallowing errors ad hoc.

use super::error::{ExternalError, StageError};
use super::stage::Stage;

/// What to do when an external call fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnFailure<T> {
    /// Abort the stage and report [`StageError::ExternalCall`].
    Propagate,
    /// Log the failure and continue with this value.
    Fallback(T),
}

impl<T> OnFailure<T> {
    /// Apply the policy to the outcome of one call made by `stage`.
    pub fn resolve<E>(self, stage: Stage, result: Result<T, E>) -> Result<T, StageError>
    where
        E: Into<ExternalError>,
    {
        let err: ExternalError = match result {
            Ok(value) => return Ok(value),
            Err(e) => e.into(),
        };

        match self {
            OnFailure::Propagate => Err(StageError::external(stage, err)),
            OnFailure::Fallback(value) => {
                log::warn!("{stage}: {err}; continuing with fallback value");
                Ok(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_ignores_policy() {
        let ok: Result<&str, ExternalError> = Ok("value");
        assert_eq!(OnFailure::Propagate.resolve(Stage::Narration, ok), Ok("value"));
        assert_eq!(
            OnFailure::Fallback("fallback").resolve(Stage::Transliterate, Ok::<_, ExternalError>("value")),
            Ok("value")
        );
    }

    #[test]
    fn propagate_reports_stage() {
        let failed: Result<String, ExternalError> = Err(ExternalError::Timeout);
        let err = OnFailure::Propagate
            .resolve(Stage::Narration, failed)
            .unwrap_err();
        assert_eq!(
            err,
            StageError::ExternalCall {
                stage: Stage::Narration,
                source: ExternalError::Timeout
            }
        );
    }

    #[test]
    fn fallback_substitutes_value() {
        let failed: Result<String, ExternalError> = Err(ExternalError::Status(503));
        let out = OnFailure::Fallback("original".to_string()).resolve(Stage::Transliterate, failed);
        assert_eq!(out, Ok("original".to_string()));
    }
}
