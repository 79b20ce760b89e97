use std::fmt;

use async_trait::async_trait;

use crate::core::state::Question;

/// Errors that can occur while generating a quiz.
/// Variants carry enough structure to classify failures without string
/// matching on messages.
#[derive(Debug)]
pub enum GenerationError {
    /// Client misconfigured (missing API key). Fails before any request.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// An endpoint returned an error response.
    Api { status: u16, message: String },
    /// A reply arrived but no usable JSON could be extracted from it.
    Parse(String),
    /// The reply parsed as JSON but failed quiz shape validation.
    Validation(String),
    /// Every configured endpoint failed; `last` is the final endpoint's error.
    Exhausted {
        attempts: usize,
        last: Box<GenerationError>,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Config(msg) => write!(f, "configuration error: {msg}"),
            GenerationError::Network(msg) => write!(f, "network error: {msg}"),
            GenerationError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            GenerationError::Parse(msg) => write!(f, "parse error: {msg}"),
            GenerationError::Validation(msg) => write!(f, "invalid quiz format: {msg}"),
            GenerationError::Exhausted { attempts, last } => match last.as_ref() {
                GenerationError::Api { status: 404, .. } => {
                    write!(f, "Gemini model not found. Please check the configured model names.")
                }
                GenerationError::Api { status: 403, .. } => {
                    write!(f, "API access denied. Please verify your API key permissions.")
                }
                other => {
                    write!(f, "All {attempts} endpoints failed. Last error: {other}")
                }
            },
        }
    }
}

impl std::error::Error for GenerationError {}

/// Anything that can produce a quiz for a topic. The TUI only ever talks to
/// this trait, so tests can swap in a canned source.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Returns the name of the source.
    fn name(&self) -> &str;

    /// Produce exactly [`crate::core::state::QUESTION_COUNT`] validated
    /// questions about `topic`. Repeat calls for the same topic may be
    /// served from a cache.
    async fn generate(&self, topic: &str) -> Result<Vec<Question>, GenerationError>;

    /// Forget every cached question set.
    fn clear_cache(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_display_classifies_not_found() {
        let err = GenerationError::Exhausted {
            attempts: 4,
            last: Box::new(GenerationError::Api {
                status: 404,
                message: "model missing".to_string(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "Gemini model not found. Please check the configured model names."
        );
    }

    #[test]
    fn test_exhausted_display_classifies_access_denied() {
        let err = GenerationError::Exhausted {
            attempts: 2,
            last: Box::new(GenerationError::Api {
                status: 403,
                message: "forbidden".to_string(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "API access denied. Please verify your API key permissions."
        );
    }

    #[test]
    fn test_exhausted_display_generic_includes_last_error() {
        let err = GenerationError::Exhausted {
            attempts: 3,
            last: Box::new(GenerationError::Network("connection refused".to_string())),
        };
        assert_eq!(
            err.to_string(),
            "All 3 endpoints failed. Last error: network error: connection refused"
        );
    }

    #[test]
    fn test_exhausted_display_other_api_statuses_are_generic() {
        let err = GenerationError::Exhausted {
            attempts: 1,
            last: Box::new(GenerationError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        };
        assert!(err.to_string().starts_with("All 1 endpoints failed."));
    }
}
