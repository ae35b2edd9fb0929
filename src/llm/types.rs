//! LLM request/response types

/// A single completion request
///
/// One request per generation call, no conversation state — the scheduling
/// exchange is a single prompt/response round trip.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction; may be empty when the instructions live in the prompt
    pub system_prompt: String,
    /// User prompt text
    pub prompt: String,
    /// Maximum tokens in the response
    pub max_tokens: u32,
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// A completed response
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Response text; `None` when the model produced no content
    pub content: Option<String>,
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Convenience constructor for tests and mocks
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            usage: TokenUsage::default(),
        }
    }
}
