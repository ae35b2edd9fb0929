//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client — each call is independent
///
/// The scheduling pipeline makes exactly one completion call per generation;
/// there is no conversation state, no streaming, and no retry at this layer.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request, blocking until complete
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
