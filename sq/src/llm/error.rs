//! Text-generation failures

use std::time::Duration;
use thiserror::Error;

use super::StopReason;

/// Why a generation call produced no usable text
///
/// Every variant ends up as the fixed error digest in a plan; the split only
/// matters for logs and for deciding whether trying again later could help.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key for the configured provider
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Unsupported LLM provider '{0}' (expected \"gemini\")")]
    UnsupportedProvider(String),

    /// 429 carrying a `retry-after` hint
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("No response within {0:?}")]
    Timeout(Duration),

    /// The provider withheld the output (safety or recitation filters)
    #[error("Suggestions were blocked by the provider")]
    Blocked,

    /// The call succeeded but carried no text
    #[error("Empty completion (stop reason: {0:?})")]
    EmptyCompletion(StopReason),
}

impl LlmError {
    /// Whether the same prompt could succeed on a later attempt
    ///
    /// Configuration problems and blocked output are permanent for a prompt.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } | LlmError::Network(_) | LlmError::Timeout(_) => true,
            LlmError::ApiError { status, .. } => *status == 408 || *status == 429 || *status >= 500,
            LlmError::EmptyCompletion(reason) => *reason == StopReason::MaxTokens,
            LlmError::MissingCredentials(_) | LlmError::UnsupportedProvider(_) | LlmError::Blocked => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_outages_are_transient() {
        assert!(LlmError::Timeout(Duration::from_secs(30)).is_transient());
        assert!(
            LlmError::ApiError {
                status: 503,
                message: "model overloaded".to_string()
            }
            .is_transient()
        );
        assert!(
            LlmError::RateLimited {
                retry_after: Duration::from_secs(5)
            }
            .is_transient()
        );
    }

    #[test]
    fn test_configuration_and_content_failures_are_permanent() {
        assert!(!LlmError::MissingCredentials("GEMINI_API_KEY".to_string()).is_transient());
        assert!(!LlmError::UnsupportedProvider("openai".to_string()).is_transient());
        assert!(!LlmError::Blocked.is_transient());
        assert!(!LlmError::EmptyCompletion(StopReason::EndTurn).is_transient());
        assert!(
            !LlmError::ApiError {
                status: 400,
                message: "API key not valid".to_string()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_truncated_empty_completion_is_transient() {
        assert!(LlmError::EmptyCompletion(StopReason::MaxTokens).is_transient());
    }

    #[test]
    fn test_unsupported_provider_message_names_provider() {
        assert!(LlmError::UnsupportedProvider("openai".to_string()).to_string().contains("'openai'"));
    }
}
