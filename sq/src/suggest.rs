//! Hangout suggestions from the text-generation backend
//!
//! [`TextSuggestionClient::suggest`] is a thin wrapper around one backend call;
//! all shaping of the raw output happens in the pure [`digest`] function.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm::{LlmClient, LlmError};

/// Instruction appended to every user query
pub const SUGGESTION_INSTRUCTION: &str = "Please provide 2-3 suggestions in bullet points.";

/// Bullet lines kept from a bulleted response
pub const MAX_BULLETS: usize = 3;

/// Bulleted output needs at least this many bullet lines
pub const MIN_BULLETS: usize = 2;

/// Characters kept from free text before truncation
pub const MAX_DIGEST_CHARS: usize = 300;

const TRUNCATION_MARKER: &str = "...";

/// Errors from the suggestion step
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Text generation failed: {0}")]
    Backend(#[from] LlmError),
}

/// Bounded suggestion text shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SuggestionDigest(String);

impl SuggestionDigest {
    /// Wrap text that is already bounded (e.g. a fixed error message)
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SuggestionDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reduce raw generated text to a short digest
///
/// With two or more bullet lines (`*` or `-` after trimming) the first three are
/// returned verbatim, newline-joined. Otherwise the first 300 characters of the
/// raw text, with `...` appended only when something was cut.
pub fn digest(raw: &str) -> SuggestionDigest {
    debug!(raw_len = raw.len(), "digest: called");
    let bullets: Vec<&str> = raw
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| line.starts_with('*') || line.starts_with('-'))
        .collect();

    if bullets.len() >= MIN_BULLETS {
        debug!(bullets = bullets.len(), "digest: bulleted response");
        return SuggestionDigest(bullets[..bullets.len().min(MAX_BULLETS)].join("\n"));
    }

    match raw.char_indices().nth(MAX_DIGEST_CHARS) {
        Some((cut, _)) => {
            debug!("digest: truncating free text");
            SuggestionDigest(format!("{}{}", &raw[..cut], TRUNCATION_MARKER))
        }
        None => SuggestionDigest(raw.to_string()),
    }
}

/// Build the generation prompt for a user query
pub fn build_prompt(query: &str) -> String {
    format!("{}\n\n{}", query, SUGGESTION_INSTRUCTION)
}

/// Client producing suggestion digests for free-text activity queries
#[derive(Clone)]
pub struct TextSuggestionClient {
    llm: Arc<dyn LlmClient>,
}

impl TextSuggestionClient {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Ask the backend for suggestions and digest the reply
    pub async fn suggest(&self, query: &str) -> Result<SuggestionDigest, GenerationError> {
        debug!(%query, "suggest: called");
        let raw = self.llm.generate(&build_prompt(query)).await.map_err(|e| {
            warn!(error = %e, transient = e.is_transient(), "suggest: generation failed");
            GenerationError::Backend(e)
        })?;
        info!(raw_len = raw.len(), "suggest: received generated text");
        debug!(%raw, "suggest: raw response");
        Ok(digest(&raw))
    }
}
