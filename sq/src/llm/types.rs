//! Text-generation request/response types
//!
//! Provider-agnostic shapes; each client maps them onto its own wire format.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completion request - everything needed for one generation call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Optional system instruction
    pub system_prompt: Option<String>,

    /// Conversation turns (typically a single user prompt)
    pub messages: Vec<Message>,

    /// Max tokens for response (capped by client config)
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Single-turn request with no system instruction
    pub fn prompt(text: impl Into<String>, max_tokens: u32) -> Self {
        debug!(%max_tokens, "CompletionRequest::prompt: called");
        Self {
            system_prompt: None,
            messages: vec![Message::user(text)],
            max_tokens,
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    /// Token usage
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Plain text response that ended normally
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    /// Output withheld by the provider's content filter
    Blocked,
}

impl StopReason {
    /// Parse from Gemini API finishReason string
    pub fn from_gemini(s: &str) -> Self {
        debug!(%s, "StopReason::from_gemini: called");
        match s {
            "MAX_TOKENS" => {
                debug!("StopReason::from_gemini: MaxTokens");
                StopReason::MaxTokens
            }
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => {
                debug!("StopReason::from_gemini: Blocked");
                StopReason::Blocked
            }
            _ => {
                debug!("StopReason::from_gemini: defaulting to EndTurn");
                StopReason::EndTurn
            }
        }
    }
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_request() {
        let req = CompletionRequest::prompt("Plan a picnic", 256);
        assert!(req.system_prompt.is_none());
        assert_eq!(req.messages, vec![Message::user("Plan a picnic")]);
        assert_eq!(req.max_tokens, 256);
    }

    #[test]
    fn test_message_roles() {
        assert_eq!(Message::user("hi").role, Role::User);
        assert_eq!(serde_json::to_value(Role::Assistant).unwrap(), "assistant");
    }

    #[test]
    fn test_stop_reason_from_gemini() {
        assert_eq!(StopReason::from_gemini("STOP"), StopReason::EndTurn);
        assert_eq!(StopReason::from_gemini("MAX_TOKENS"), StopReason::MaxTokens);
        assert_eq!(StopReason::from_gemini("SAFETY"), StopReason::Blocked);
        assert_eq!(StopReason::from_gemini("FINISH_REASON_UNSPECIFIED"), StopReason::EndTurn);
    }
}
