//! LlmClient trait definition

use async_trait::async_trait;
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, LlmError, StopReason};

/// Default response budget for [`LlmClient::generate`]
pub const DEFAULT_GENERATE_MAX_TOKENS: u32 = 1024;

/// Stateless text-generation client - each call is independent
///
/// Implementations own their provider's wire format; callers only see
/// prompt in, text out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Generate text for a single prompt
    ///
    /// No text is an error: `Blocked` when the provider filtered the output,
    /// `EmptyCompletion` otherwise.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(prompt_len = prompt.len(), "generate: called");
        let response = self
            .complete(CompletionRequest::prompt(prompt, DEFAULT_GENERATE_MAX_TOKENS))
            .await?;

        match response.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => {
                debug!(stop_reason = ?response.stop_reason, "generate: empty completion");
                match response.stop_reason {
                    StopReason::Blocked => Err(LlmError::Blocked),
                    reason => Err(LlmError::EmptyCompletion(reason)),
                }
            }
        }
    }
}
